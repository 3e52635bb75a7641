//! Algorithm 1: the iterative blank-node hasher. Repeatedly refines every
//! blank node's hash by mixing in the hashes of its neighborhood, until the
//! blank-node partition stops changing.

use crate::error::CanonicalizationError;
use crate::hash::{hash_bag, hash_tuple, BagRealization, HashValue, Role};
use crate::rdf::{BlankNode, Dataset, GraphName, Term};
use crate::table::HashTable;
use digest::Digest;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Knobs that affect the byte-exact output: which hash function and which
/// bag realization the fixed-point hasher uses.
#[derive(Clone, Copy, Debug)]
pub struct HasherOptions {
    pub bag_realization: BagRealization,
    pub hash_len: usize,
}

impl HasherOptions {
    pub fn for_digest<D: Digest>(bag_realization: BagRealization) -> Self {
        HasherOptions {
            bag_realization,
            hash_len: <D as Digest>::output_size(),
        }
    }
}

fn graph_hash(table: &HashTable, hash_len: usize, graph: &GraphName) -> HashValue {
    match graph {
        GraphName::DefaultGraph => HashValue::zero(hash_len),
        GraphName::NamedNode(n) => table
            .get_hash(&Term::NamedNode(n.clone()))
            .cloned()
            .unwrap_or_else(|| HashValue::zero(hash_len)),
        GraphName::BlankNode(b) => table
            .get_hash(&Term::BlankNode(b.clone()))
            .cloned()
            .unwrap_or_else(|| HashValue::zero(hash_len)),
    }
}

fn term_hash<'a>(table: &'a HashTable, term: &Term) -> &'a HashValue {
    table
        .get_hash(term)
        .expect("every dataset term has an entry in a table initialized from that dataset")
}

/// Runs Algorithm 1 to a fixed point, starting from `initial` (or a freshly
/// initialized table, mapping every blank node to zero and every other term
/// to `hashTerm(term)`, if `initial` is absent).
///
/// Terminates in at most `2 * |blank nodes|` iterations; exceeding that
/// bound raises `HashCollision` (spec.md §4.4, §7) since it indicates a
/// `hashBag` collision rather than a dataset the algorithm can't handle.
pub fn hash_bnodes<D: Digest>(
    dataset: &Dataset,
    initial: Option<HashTable>,
    options: HasherOptions,
) -> Result<HashTable, CanonicalizationError> {
    let blank_count = dataset.blank_nodes().len();
    let mut h = initial.unwrap_or_else(|| HashTable::initial::<D>(dataset, options.hash_len));

    if blank_count == 0 {
        return Ok(h);
    }

    let max_iterations = 2 * blank_count.max(1);
    let mut iterations = 0usize;

    loop {
        let prev = h.clone();
        let mut next = h.clone();
        let mut bag: HashMap<BlankNode, Vec<HashValue>> = HashMap::new();

        for quad in dataset.quads() {
            if let Term::BlankNode(s) = &quad.subject {
                let c = if !matches!(quad.graph, GraphName::DefaultGraph) {
                    let g = graph_hash(&prev, options.hash_len, &quad.graph);
                    hash_tuple::<D>(
                        &[term_hash(&prev, &quad.object), term_hash(&prev, &quad.predicate), &g],
                        Role::Subject,
                    )
                } else {
                    hash_tuple::<D>(
                        &[term_hash(&prev, &quad.object), term_hash(&prev, &quad.predicate)],
                        Role::Subject,
                    )
                };
                bag.entry(s.clone()).or_default().push(c);
            }
            if let Term::BlankNode(o) = &quad.object {
                let c = if !matches!(quad.graph, GraphName::DefaultGraph) {
                    let g = graph_hash(&prev, options.hash_len, &quad.graph);
                    hash_tuple::<D>(
                        &[term_hash(&prev, &quad.subject), term_hash(&prev, &quad.predicate), &g],
                        Role::Object,
                    )
                } else {
                    hash_tuple::<D>(
                        &[term_hash(&prev, &quad.subject), term_hash(&prev, &quad.predicate)],
                        Role::Object,
                    )
                };
                bag.entry(o.clone()).or_default().push(c);
            }
            if let GraphName::BlankNode(g) = &quad.graph {
                let c = hash_tuple::<D>(
                    &[
                        term_hash(&prev, &quad.subject),
                        term_hash(&prev, &quad.predicate),
                        term_hash(&prev, &quad.object),
                    ],
                    Role::Graph,
                );
                bag.entry(g.clone()).or_default().push(c);
            }
        }

        for (b, contributions) in &bag {
            let term = Term::BlankNode(b.clone());
            let prior = term_hash(&prev, &term);
            let combined = hash_bag::<D>(options.bag_realization, prior, contributions);
            trace!(blank_node = %b.value, contributions = contributions.len(), "hashBag");
            next.set_hash(term, combined);
        }

        iterations += 1;
        debug!(iteration = iterations, partition = ?next.blank_node_partition().len(), "refinement pass");

        if next.is_fixed_point(&prev) {
            return Ok(next);
        }
        if iterations > max_iterations {
            return Err(CanonicalizationError::HashCollision(max_iterations));
        }
        h = next;
    }
}
