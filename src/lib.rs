//! An iso-canonical form for RDF datasets: deterministic blank-node
//! relabeling such that any two isomorphic datasets serialize to
//! byte-identical canonical N-Quads.
//!
//! The core algorithm is two pieces: [`hasher::hash_bnodes`] refines every
//! blank node's hash to a fixed point by repeatedly mixing in its
//! neighborhood's hashes, and [`distinguish::distinguish`] breaks any
//! remaining symmetry by recursively perturbing one blank node at a time and
//! keeping the lexicographically smallest resulting dataset. [`canon::canonicalize`]
//! drives the two together; [`api`] re-exports the zero-config entry points
//! most callers want.

pub mod api;
pub mod canon;
pub mod counter;
pub mod distinguish;
pub mod error;
pub mod hash;
pub mod hasher;
pub mod nquads;
pub mod rdf;
pub mod table;

#[cfg(any(test, feature = "log"))]
mod tests {
    pub mod logger;
}

pub use api::{canonicalize, canonicalize_str, canonicalize_str_with, canonicalize_with, issue, issue_with, relabel};
pub use canon::CanonicalizationOptions;
pub use error::CanonicalizationError;
pub use hash::BagRealization;
pub use rdf::{BlankNode, Dataset, GraphName, Literal, NamedNode, Quad, Term};
