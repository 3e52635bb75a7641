//! The bidirectional mapping between terms and hash values, plus the
//! partition-refinement bookkeeping (grouping, fixed-point testing,
//! ordering) the hasher and distinguish search need.
//!
//! Grounded on the dual-representation shape of the teacher's
//! `CanonicalizationState` (`blank_node_to_quads_map` / `hash_to_blank_node_map`
//! in `canon.rs`): a forward map plus an inverse grouping view, kept
//! consistent on every write (spec.md §9's "dual representation is
//! load-bearing" design note).

use crate::hash::{hash_term, HashValue};
use crate::rdf::{BlankNode, Dataset, GraphName, Term};
use digest::Digest;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A mutable Term → HashValue mapping with an inverse grouping view.
#[derive(Clone, Debug)]
pub struct HashTable {
    forward: HashMap<Term, HashValue>,
    /// Inverse view: HashValue → terms currently holding that value.
    /// Kept in sync with `forward` by every mutator.
    groups: BTreeMap<HashValue, BTreeSet<Term>>,
}

impl HashTable {
    /// Builds the initial table for a dataset: every blank node maps to the
    /// zero `HashValue`; every other term maps to `hashTerm(term)`.
    pub fn initial<D: Digest>(dataset: &Dataset, hash_len: usize) -> Self {
        let mut table = HashTable {
            forward: HashMap::new(),
            groups: BTreeMap::new(),
        };
        for term in dataset.terms() {
            let value = if term.is_blank() {
                HashValue::zero(hash_len)
            } else {
                hash_term::<D>(hash_len, Some(term.to_nquads().as_bytes()))
            };
            table.set_hash(term, value);
        }
        // Blank-node graph names are not quad-position Terms (GraphName is a
        // separate type) but are blank nodes in every sense the algorithm
        // cares about; make sure they have an entry too.
        for quad in dataset.quads() {
            if let GraphName::BlankNode(b) = &quad.graph {
                let term = Term::BlankNode(b.clone());
                if !table.forward.contains_key(&term) {
                    table.set_hash(term, HashValue::zero(hash_len));
                }
            }
        }
        table
    }

    pub fn set_hash(&mut self, term: Term, value: HashValue) {
        if let Some(old) = self.forward.get(&term) {
            if let Some(set) = self.groups.get_mut(old) {
                set.remove(&term);
                if set.is_empty() {
                    self.groups.remove(old);
                }
            }
        }
        self.groups
            .entry(value.clone())
            .or_default()
            .insert(term.clone());
        self.forward.insert(term, value);
    }

    pub fn get_hash(&self, term: &Term) -> Option<&HashValue> {
        self.forward.get(term)
    }

    /// The blank-node-restricted partition: groups of blank nodes currently
    /// sharing a `HashValue`, ordered first by ascending group size, then by
    /// ascending `HashValue`. Groups of size 1 sort first.
    pub fn blank_node_partition(&self) -> Vec<Vec<BlankNode>> {
        let mut groups: Vec<(HashValue, Vec<BlankNode>)> = self
            .groups
            .iter()
            .filter_map(|(hash, terms)| {
                let blanks: Vec<BlankNode> = terms
                    .iter()
                    .filter_map(|t| t.as_blank().cloned())
                    .collect();
                if blanks.is_empty() {
                    None
                } else {
                    Some((hash.clone(), blanks))
                }
            })
            .collect();
        groups.sort_by(|(h1, g1), (h2, g2)| g1.len().cmp(&g2.len()).then_with(|| h1.cmp(h2)));
        groups.into_iter().map(|(_, g)| g).collect()
    }

    /// True iff every `HashValue` is held by exactly one blank node (all
    /// blank nodes distinguished).
    pub fn is_trivial(&self) -> bool {
        self.blank_node_partition().iter().all(|g| g.len() == 1)
    }

    /// True iff either `is_trivial()`, or the "same hash" equivalence
    /// relation on blank nodes is identical between `self` and `previous`.
    /// Comparing the partition relation (not raw hash values) is what makes
    /// this correct in the presence of blank-node cycles (spec.md §9).
    pub fn is_fixed_point(&self, previous: &HashTable) -> bool {
        if self.is_trivial() {
            return true;
        }
        same_partition(&self.blank_node_partition(), &previous.blank_node_partition())
    }

    /// Blank-node identifiers ordered by ascending current `HashValue`.
    /// Defines the canonical labels once the table is trivial.
    pub fn ordered_blank_ids(&self) -> Vec<BlankNode> {
        self.blank_node_partition().into_iter().flatten().collect()
    }
}

fn same_partition(a: &[Vec<BlankNode>], b: &[Vec<BlankNode>]) -> bool {
    let class_of = |groups: &[Vec<BlankNode>]| -> HashMap<BlankNode, usize> {
        let mut map = HashMap::new();
        for (i, group) in groups.iter().enumerate() {
            for node in group {
                map.insert(node.clone(), i);
            }
        }
        map
    };
    let ca = class_of(a);
    let cb = class_of(b);
    if ca.len() != cb.len() {
        return false;
    }
    for (node, &class_a) in &ca {
        let Some(&class_b) = cb.get(node) else {
            return false;
        };
        // two nodes share a class in `a` iff they share a class in `b`:
        // check by comparing, for every pair, membership consistency via a
        // canonical representative per class.
        for (other, &other_class_a) in &ca {
            let same_in_a = class_a == other_class_a;
            let same_in_b = cb.get(other) == Some(&class_b);
            if same_in_a != same_in_b {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{GraphName, NamedNode, Quad};
    use sha2::Sha256;

    fn bn(v: &str) -> Term {
        Term::BlankNode(BlankNode::new(v))
    }
    fn nn(v: &str) -> Term {
        Term::NamedNode(NamedNode::new(v))
    }

    #[test]
    fn initial_table_blank_nodes_are_zero() {
        let ds = Dataset::new(vec![Quad::new(bn("a"), nn("http://ex/#p"), nn("http://ex/#o"), GraphName::DefaultGraph)]);
        let table = HashTable::initial::<Sha256>(&ds, 32);
        assert!(table.get_hash(&bn("a")).unwrap().is_zero());
        assert!(!table.get_hash(&nn("http://ex/#p")).unwrap().is_zero());
    }

    #[test]
    fn partition_groups_equal_hashes() {
        let ds = Dataset::new(vec![
            Quad::new(bn("a"), nn("http://ex/#p"), nn("http://ex/#o"), GraphName::DefaultGraph),
            Quad::new(bn("b"), nn("http://ex/#p"), nn("http://ex/#o"), GraphName::DefaultGraph),
        ]);
        let table = HashTable::initial::<Sha256>(&ds, 32);
        let partition = table.blank_node_partition();
        assert_eq!(partition.len(), 1);
        assert_eq!(partition[0].len(), 2);
        assert!(!table.is_trivial());
    }

    #[test]
    fn distinguishing_hashes_makes_table_trivial() {
        let ds = Dataset::new(vec![
            Quad::new(bn("a"), nn("http://ex/#p"), nn("http://ex/#o"), GraphName::DefaultGraph),
            Quad::new(bn("b"), nn("http://ex/#p"), nn("http://ex/#o"), GraphName::DefaultGraph),
        ]);
        let mut table = HashTable::initial::<Sha256>(&ds, 32);
        table.set_hash(bn("a"), HashValue::from_bytes(vec![1u8; 32]));
        assert!(table.is_trivial());
        let ordered = table.ordered_blank_ids();
        assert_eq!(ordered, vec![BlankNode::new("b"), BlankNode::new("a")]);
    }

    #[test]
    fn fixed_point_detects_unchanged_partition() {
        let ds = Dataset::new(vec![
            Quad::new(bn("a"), nn("http://ex/#p"), nn("http://ex/#o"), GraphName::DefaultGraph),
            Quad::new(bn("b"), nn("http://ex/#p"), nn("http://ex/#o"), GraphName::DefaultGraph),
        ]);
        let table = HashTable::initial::<Sha256>(&ds, 32);
        let clone = table.clone();
        assert!(table.is_fixed_point(&clone));
    }
}
