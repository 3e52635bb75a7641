//! Algorithm 3: recursive symmetry breaking. When the fixed-point hasher
//! leaves blank nodes with colliding hashes, pick one blank node at a time
//! from the lowest non-trivial partition group, artificially distinguish it,
//! re-hash, and recurse until trivial — then keep the lexicographically
//! minimal candidate relabeling.
//!
//! Grounded on the teacher's `hash_n_degree_quads` (`canon.rs`): that
//! algorithm's per-permutation `issuer_copy` clone and running
//! `chosen_path`/`chosen_issuer` minimum is the same shape as this
//! algorithm's per-candidate `HashTable` clone and running `Gmin` minimum,
//! generalized from "pick the best permutation of a mention set" to "pick
//! the best choice of which blank node to distinguish first".

use crate::counter::DistinguishBudget;
use crate::error::CanonicalizationError;
use crate::hash::{hash_tuple, Role};
use crate::hasher::{hash_bnodes, HasherOptions};
use crate::rdf::{Dataset, Term};
use crate::table::HashTable;
use digest::Digest;
use tracing::trace;

/// Runs Algorithm 3. `table` must not be trivial (callers check this via
/// the top-level driver); calling this on a trivial table is an assertion
/// failure, not a defined outcome.
pub fn distinguish<D: Digest, B: DistinguishBudget>(
    dataset: &Dataset,
    table: &HashTable,
    mut g_min: Option<Dataset>,
    options: HasherOptions,
    budget: &mut B,
) -> Result<Dataset, CanonicalizationError> {
    let partition = table.blank_node_partition();
    let lowest_non_trivial = partition
        .iter()
        .find(|group| group.len() > 1)
        .ok_or_else(|| {
            CanonicalizationError::InternalInvariantViolated(
                "distinguish invoked on a trivial hash table".to_string(),
            )
        })?;

    for b in lowest_non_trivial {
        budget.tick()?;

        let mut h_prime = table.clone();
        let term = Term::BlankNode(b.clone());
        let current = table
            .get_hash(&term)
            .ok_or_else(|| CanonicalizationError::InternalInvariantViolated(format!("blank node {} missing from hash table", b.value)))?
            .clone();
        let perturbed = hash_tuple::<D>(&[&current], Role::Distinguish);
        h_prime.set_hash(term, perturbed);

        trace!(blank_node = %b.value, "distinguish: perturbing candidate");
        let h_double_prime = hash_bnodes::<D>(dataset, Some(h_prime), options)?;

        if h_double_prime.is_trivial() {
            let candidate = dataset.relabel(&h_double_prime.ordered_blank_ids());
            g_min = Some(match g_min {
                Some(current_min) if !candidate.is_smaller(&current_min) => current_min,
                _ => candidate,
            });
        } else {
            g_min = Some(distinguish::<D, B>(dataset, &h_double_prime, g_min, options, budget)?);
        }
    }

    g_min.ok_or_else(|| {
        CanonicalizationError::InternalInvariantViolated(
            "distinguish's non-trivial group was unexpectedly empty".to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::SimpleDistinguishBudget;
    use crate::hash::BagRealization;
    use crate::rdf::{BlankNode, GraphName, NamedNode, Quad};
    use sha2::Sha256;

    fn bn(v: &str) -> Term {
        Term::BlankNode(BlankNode::new(v))
    }
    fn nn(v: &str) -> Term {
        Term::NamedNode(NamedNode::new(v))
    }

    #[test]
    fn symmetric_pair_resolves_to_isomorphic_minimum() {
        // S5: _:a <p> _:b . _:b <p> _:a .
        let ds = Dataset::new(vec![
            Quad::new(bn("a"), nn("http://example.com/#p"), bn("b"), GraphName::DefaultGraph),
            Quad::new(bn("b"), nn("http://example.com/#p"), bn("a"), GraphName::DefaultGraph),
        ]);
        let options = HasherOptions::for_digest::<Sha256>(BagRealization::SortedTuple);
        let table = hash_bnodes::<Sha256>(&ds, None, options).unwrap();
        assert!(!table.is_trivial());

        let mut budget = SimpleDistinguishBudget::new(None);
        let result = distinguish::<Sha256, _>(&ds, &table, None, options, &mut budget).unwrap();

        let mut lines = result.sorted_nquads();
        lines.sort();
        assert_eq!(
            lines,
            vec![
                "_:c14n_0 <http://example.com/#p> _:c14n_1 .\n".to_string(),
                "_:c14n_1 <http://example.com/#p> _:c14n_0 .\n".to_string(),
            ]
        );
    }

    #[test]
    fn distinguish_on_trivial_table_is_invariant_violation() {
        let ds = Dataset::new(vec![Quad::new(nn("http://ex/#s"), nn("http://ex/#p"), nn("http://ex/#o"), GraphName::DefaultGraph)]);
        let options = HasherOptions::for_digest::<Sha256>(BagRealization::SortedTuple);
        let table = hash_bnodes::<Sha256>(&ds, None, options).unwrap();
        let mut budget = SimpleDistinguishBudget::new(None);
        let result = distinguish::<Sha256, _>(&ds, &table, None, options, &mut budget);
        assert!(matches!(result, Err(CanonicalizationError::InternalInvariantViolated(_))));
    }

    #[test]
    fn budget_exhaustion_surfaces_as_error() {
        let ds = Dataset::new(vec![
            Quad::new(bn("a"), nn("http://example.com/#p"), bn("b"), GraphName::DefaultGraph),
            Quad::new(bn("b"), nn("http://example.com/#p"), bn("a"), GraphName::DefaultGraph),
        ]);
        let options = HasherOptions::for_digest::<Sha256>(BagRealization::SortedTuple);
        let table = hash_bnodes::<Sha256>(&ds, None, options).unwrap();
        let mut budget = SimpleDistinguishBudget::new(Some(0));
        let result = distinguish::<Sha256, _>(&ds, &table, None, options, &mut budget);
        assert!(matches!(result, Err(CanonicalizationError::ComputationBudgetExceeded(0))));
    }
}
