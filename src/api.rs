//! The public surface: zero-config entry points defaulting to SHA-256 and
//! the sorted-tuple bag realization, and `_with` variants taking
//! `CanonicalizationOptions`, mirroring the teacher's `api.rs` split between
//! `canonicalize`/`canonicalize_with` and `issue`/`issue_with`.

use crate::canon::{canonicalize as canonicalize_core, CanonicalizationOptions};
use crate::error::CanonicalizationError;
use crate::nquads::parse;
use crate::rdf::{BlankNode, Dataset, GraphName, Term};
use digest::Digest;
use sha2::Sha256;
use std::collections::HashMap;

/// Computes the iso-canonical form of `dataset`, using SHA-256 and the
/// default `CanonicalizationOptions`.
///
/// # Examples
///
/// ```
/// use iso_canon::canonicalize;
/// use iso_canon::nquads::parse;
///
/// let input = parse("_:a <http://ex/#p> _:b .\n_:b <http://ex/#p> _:a .\n").unwrap();
/// let canonical = canonicalize(&input).unwrap();
/// assert_eq!(
///     canonical.sorted_nquads(),
///     vec![
///         "_:c14n_0 <http://ex/#p> _:c14n_1 .\n".to_string(),
///         "_:c14n_1 <http://ex/#p> _:c14n_0 .\n".to_string(),
///     ]
/// );
/// ```
pub fn canonicalize(dataset: &Dataset) -> Result<Dataset, CanonicalizationError> {
    canonicalize_with::<Sha256>(dataset, &CanonicalizationOptions::default())
}

/// Computes the iso-canonical form of `dataset` under the given options,
/// using the hash function `D`.
pub fn canonicalize_with<D: Digest>(
    dataset: &Dataset,
    options: &CanonicalizationOptions,
) -> Result<Dataset, CanonicalizationError> {
    canonicalize_core::<D>(dataset, options)
}

/// Parses `input` as N-Quads, canonicalizes it, and renders the result back
/// to its canonical N-Quads byte stream (spec.md §6).
///
/// # Examples
///
/// ```
/// use iso_canon::canonicalize_str;
///
/// let canonical = canonicalize_str("<http://ex/#s> <http://ex/#p> <http://ex/#o> .\n").unwrap();
/// assert_eq!(canonical, "<http://ex/#s> <http://ex/#p> <http://ex/#o> .\n");
/// ```
pub fn canonicalize_str(input: &str) -> Result<String, CanonicalizationError> {
    canonicalize_str_with::<Sha256>(input, &CanonicalizationOptions::default())
}

/// As `canonicalize_str`, using the hash function `D` and the given options.
pub fn canonicalize_str_with<D: Digest>(
    input: &str,
    options: &CanonicalizationOptions,
) -> Result<String, CanonicalizationError> {
    let dataset = parse(input)?;
    let canonical = canonicalize_with::<D>(&dataset, options)?;
    Ok(canonical.canonical_bytes())
}

/// Assigns deterministic identifiers to every blank node in `dataset` and
/// returns the assignment as a map from the dataset's own blank-node
/// identifiers to their canonical `c14n_<k>` labels, using SHA-256 and the
/// default options.
///
/// # Examples
///
/// ```
/// use iso_canon::issue;
/// use iso_canon::nquads::parse;
///
/// let input = parse("_:e0 <http://ex/#p> _:e1 .\n").unwrap();
/// let issued = issue(&input).unwrap();
/// assert_eq!(issued.get("e0").map(String::as_str), Some("c14n_0"));
/// assert_eq!(issued.get("e1").map(String::as_str), Some("c14n_1"));
/// ```
pub fn issue(dataset: &Dataset) -> Result<HashMap<String, String>, CanonicalizationError> {
    issue_with::<Sha256>(dataset, &CanonicalizationOptions::default())
}

/// As `issue`, using the hash function `D` and the given options.
pub fn issue_with<D: Digest>(
    dataset: &Dataset,
    options: &CanonicalizationOptions,
) -> Result<HashMap<String, String>, CanonicalizationError> {
    let canonical = canonicalize_with::<D>(dataset, options)?;
    let mut issued = HashMap::new();
    for (original, relabeled) in dataset.quads().iter().zip(canonical.quads().iter()) {
        collect_term_mapping(&original.subject, &relabeled.subject, &mut issued);
        collect_term_mapping(&original.object, &relabeled.object, &mut issued);
        collect_graph_mapping(&original.graph, &relabeled.graph, &mut issued);
    }
    Ok(issued)
}

fn collect_term_mapping(original: &Term, relabeled: &Term, issued: &mut HashMap<String, String>) {
    if let (Term::BlankNode(o), Term::BlankNode(r)) = (original, relabeled) {
        issued.insert(o.value.clone(), r.value.clone());
    }
}

fn collect_graph_mapping(original: &GraphName, relabeled: &GraphName, issued: &mut HashMap<String, String>) {
    if let (GraphName::BlankNode(o), GraphName::BlankNode(r)) = (original, relabeled) {
        issued.insert(o.value.clone(), r.value.clone());
    }
}

/// Re-labels `dataset`'s blank nodes according to `issued`, the kind of map
/// `issue`/`issue_with` returns. Blank nodes absent from `issued` are left
/// unchanged; quad order is preserved.
pub fn relabel(dataset: &Dataset, issued: &HashMap<String, String>) -> Dataset {
    let ordered_blank_ids: Vec<BlankNode> = {
        let mut pairs: Vec<(&String, &String)> = issued.iter().collect();
        pairs.sort_by_key(|(_, v)| v.strip_prefix("c14n_").and_then(|k| k.parse::<usize>().ok()).unwrap_or(usize::MAX));
        pairs.into_iter().map(|(k, _)| BlankNode::new(k.clone())).collect()
    };
    dataset.relabel(&ordered_blank_ids)
}
