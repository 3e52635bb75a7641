//! RDF data model: terms, quads, and datasets.
//!
//! Shaped after [RDF/JS: Data model specification](https://rdf.js.org/data-model-spec/),
//! trimmed to the terms the canonicalization algorithm actually operates on
//! (no `Variable`, since this crate canonicalizes ground/blank-node data, not
//! SPARQL patterns).

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// An IRI reference, compared and hashed by its lexical string.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct NamedNode {
    pub value: String,
}

impl NamedNode {
    pub fn new(value: impl Into<String>) -> Self {
        NamedNode {
            value: value.into(),
        }
    }
}

/// A blank node, identified only by a source-local identifier. Two blank
/// nodes are equal iff their identifiers are equal; identifiers carry no
/// meaning across datasets.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct BlankNode {
    pub value: String,
}

impl BlankNode {
    pub fn new(value: impl Into<String>) -> Self {
        BlankNode {
            value: value.into(),
        }
    }
}

/// A literal: a lexical form plus an optional language tag or datatype IRI.
/// At most one of `language`/`datatype` is meaningful per the N-Quads
/// grammar (a language-tagged literal's datatype is implicitly `rdf:langString`).
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub struct Literal {
    pub value: String,
    pub language: Option<String>,
    pub datatype: Option<NamedNode>,
}

impl Literal {
    pub fn new(value: impl Into<String>, datatype: Option<NamedNode>, language: Option<String>) -> Self {
        match language {
            Some(language) => Literal {
                value: value.into(),
                language: Some(language),
                datatype: Some(NamedNode::new(
                    "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString",
                )),
            },
            None => Literal {
                value: value.into(),
                language: None,
                datatype: Some(
                    datatype.unwrap_or_else(|| NamedNode::new("http://www.w3.org/2001/XMLSchema#string")),
                ),
            },
        }
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        // Order by canonical lexical form, which is what canonicalization
        // ever needs to compare literals by.
        self.to_nquads().cmp(&other.to_nquads())
    }
}

/// The subject, predicate, object, or graph-name slot of a quad.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub enum Term {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl Term {
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn as_blank(&self) -> Option<&BlankNode> {
        match self {
            Term::BlankNode(b) => Some(b),
            _ => None,
        }
    }

    /// Canonical N-Triples/N-Quads lexical form of this term.
    pub fn to_nquads(&self) -> String {
        match self {
            Term::NamedNode(n) => format!("<{}>", n.value),
            Term::BlankNode(b) => format!("_:{}", b.value),
            Term::Literal(l) => serialize_literal(l),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_nquads())
    }
}

/// The graph-name slot: absent (default graph), or an IRI/blank node.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub enum GraphName {
    DefaultGraph,
    NamedNode(NamedNode),
    BlankNode(BlankNode),
}

impl GraphName {
    pub fn is_blank(&self) -> bool {
        matches!(self, GraphName::BlankNode(_))
    }

    pub fn as_blank(&self) -> Option<&BlankNode> {
        match self {
            GraphName::BlankNode(b) => Some(b),
            _ => None,
        }
    }

    pub fn to_nquads(&self) -> Option<String> {
        match self {
            GraphName::DefaultGraph => None,
            GraphName::NamedNode(n) => Some(format!("<{}>", n.value)),
            GraphName::BlankNode(b) => Some(format!("_:{}", b.value)),
        }
    }
}

fn serialize_literal(l: &Literal) -> String {
    let value = escape_literal(&l.value);
    match (&l.language, &l.datatype) {
        (Some(lang), _) => format!("\"{}\"@{}", value, lang),
        (None, Some(dt)) if dt.value != "http://www.w3.org/2001/XMLSchema#string" => {
            format!("\"{}\"^^<{}>", value, dt.value)
        }
        (None, _) => format!("\"{}\"", value),
    }
}

/// Escapes a literal's lexical form the way the canonical N-Quads grammar
/// requires: backslash, double quote, and the ASCII control characters that
/// cannot appear literally in an N-Quads document.
fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// An ordered 4-tuple (subject, predicate, object, graph).
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: GraphName,
}

impl Quad {
    pub fn new(subject: Term, predicate: Term, object: Term, graph: GraphName) -> Self {
        Quad {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// Renders this quad as a single canonical N-Quads line, terminated by LF.
    pub fn to_nquads_line(&self) -> String {
        match self.graph.to_nquads() {
            Some(g) => format!(
                "{} {} {} {} .\n",
                self.subject, self.predicate, self.object, g
            ),
            None => format!("{} {} {} .\n", self.subject, self.predicate, self.object),
        }
    }
}

/// An immutable multiset of quads. Constructed once from a parsed or
/// programmatically built quad sequence and never mutated afterward;
/// `relabel` produces a fresh `Dataset` rather than mutating in place.
#[derive(Clone, Debug)]
pub struct Dataset {
    quads: Vec<Quad>,
}

impl Dataset {
    pub fn new(quads: Vec<Quad>) -> Self {
        Dataset { quads }
    }

    /// The quads, in input order.
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// The unique terms appearing in any subject/predicate/object/graph
    /// position. Iteration order is not meaningful.
    pub fn terms(&self) -> BTreeSet<Term> {
        let mut terms = BTreeSet::new();
        for quad in &self.quads {
            terms.insert(quad.subject.clone());
            terms.insert(quad.predicate.clone());
            terms.insert(quad.object.clone());
            if let Some(g) = graph_as_term(&quad.graph) {
                terms.insert(g);
            }
        }
        terms
    }

    /// The unique blank-node terms appearing in any position.
    pub fn blank_nodes(&self) -> BTreeSet<BlankNode> {
        let mut nodes = BTreeSet::new();
        for quad in &self.quads {
            if let Term::BlankNode(b) = &quad.subject {
                nodes.insert(b.clone());
            }
            if let Term::BlankNode(b) = &quad.object {
                nodes.insert(b.clone());
            }
            if let GraphName::BlankNode(b) = &quad.graph {
                nodes.insert(b.clone());
            }
        }
        nodes
    }

    /// Each quad rendered as a canonical N-Quads line, in input order.
    pub fn nquads(&self) -> Vec<String> {
        self.quads.iter().map(Quad::to_nquads_line).collect()
    }

    /// `nquads`, sorted by byte-wise (here: `Ord` on `String`, which for
    /// valid UTF-8 agrees with byte-wise lexicographic order) comparison.
    pub fn sorted_nquads(&self) -> Vec<String> {
        let mut lines = self.nquads();
        lines.sort();
        lines
    }

    /// The sorted canonical N-Quads lines concatenated into a single byte
    /// stream, with no trailing line beyond each line's own terminating LF.
    ///
    /// Open question (spec.md §9) resolved: each line already ends in LF, so
    /// the concatenation naturally ends in LF too (equivalent to "with
    /// trailing LF"); no line separator is added or removed here.
    pub fn canonical_bytes(&self) -> String {
        self.sorted_nquads().concat()
    }

    /// Implements `isSmaller(self, other)`: `self < other` iff `self ⊂
    /// other`, or there exists a line unique to `self` that is
    /// lexicographically smaller than every line unique to `other`.
    pub fn is_smaller(&self, other: &Dataset) -> bool {
        let a = self.sorted_nquads();
        let b = other.sorted_nquads();
        let (only_a, only_b) = multiset_difference(&a, &b);

        if only_a.is_empty() {
            return true;
        }
        if only_b.is_empty() {
            return true;
        }
        let smallest_b = &only_b[0];
        only_a.iter().any(|line| line < smallest_b)
    }

    /// Renames every blank node `b` to `_:c14n_<k>` where `k` is `b`'s
    /// 0-based index in `ordered_blank_ids`. Non-blank terms are copied
    /// unchanged; quad order is preserved.
    pub fn relabel(&self, ordered_blank_ids: &[BlankNode]) -> Dataset {
        use std::collections::HashMap;
        let labels: HashMap<&BlankNode, String> = ordered_blank_ids
            .iter()
            .enumerate()
            .map(|(k, b)| (b, format!("c14n_{k}")))
            .collect();

        let relabel_term = |t: &Term| -> Term {
            match t {
                Term::BlankNode(b) => Term::BlankNode(BlankNode::new(
                    labels.get(b).cloned().unwrap_or_else(|| b.value.clone()),
                )),
                other => other.clone(),
            }
        };
        let relabel_graph = |g: &GraphName| -> GraphName {
            match g {
                GraphName::BlankNode(b) => GraphName::BlankNode(BlankNode::new(
                    labels.get(b).cloned().unwrap_or_else(|| b.value.clone()),
                )),
                other => other.clone(),
            }
        };

        let quads = self
            .quads
            .iter()
            .map(|q| {
                Quad::new(
                    relabel_term(&q.subject),
                    q.predicate.clone(),
                    relabel_term(&q.object),
                    relabel_graph(&q.graph),
                )
            })
            .collect();
        Dataset::new(quads)
    }
}

fn graph_as_term(g: &GraphName) -> Option<Term> {
    match g {
        GraphName::DefaultGraph => None,
        GraphName::NamedNode(n) => Some(Term::NamedNode(n.clone())),
        GraphName::BlankNode(b) => Some(Term::BlankNode(b.clone())),
    }
}

/// Multiset difference of two sorted string slices: returns (only in `a`,
/// only in `b`), each itself sorted, accounting for duplicate lines.
fn multiset_difference(a: &[String], b: &[String]) -> (Vec<String>, Vec<String>) {
    let mut only_a = Vec::new();
    let mut only_b = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                only_a.push(a[i].clone());
                i += 1;
            }
            Ordering::Greater => {
                only_b.push(b[j].clone());
                j += 1;
            }
        }
    }
    only_a.extend_from_slice(&a[i..]);
    only_b.extend_from_slice(&b[j..]);
    (only_a, only_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nn(v: &str) -> Term {
        Term::NamedNode(NamedNode::new(v))
    }
    fn bn(v: &str) -> Term {
        Term::BlankNode(BlankNode::new(v))
    }

    #[test]
    fn literal_escaping() {
        let l = Literal::new("a\\b\"c\nd", None, None);
        assert_eq!(Term::Literal(l).to_nquads(), "\"a\\\\b\\\"c\\nd\"");
    }

    #[test]
    fn literal_with_language() {
        let l = Literal::new("hello", None, Some("en".to_string()));
        assert_eq!(Term::Literal(l).to_nquads(), "\"hello\"@en");
    }

    #[test]
    fn literal_with_datatype() {
        let l = Literal::new(
            "42",
            Some(NamedNode::new("http://www.w3.org/2001/XMLSchema#integer")),
            None,
        );
        assert_eq!(
            Term::Literal(l).to_nquads(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn quad_serialization_default_graph() {
        let q = Quad::new(bn("x"), nn("http://ex/#p"), nn("http://ex/#o"), GraphName::DefaultGraph);
        assert_eq!(q.to_nquads_line(), "_:x <http://ex/#p> <http://ex/#o> .\n");
    }

    #[test]
    fn quad_serialization_named_graph() {
        let q = Quad::new(
            nn("http://ex/#s"),
            nn("http://ex/#p"),
            nn("http://ex/#o"),
            GraphName::BlankNode(BlankNode::new("g")),
        );
        assert_eq!(
            q.to_nquads_line(),
            "<http://ex/#s> <http://ex/#p> <http://ex/#o> _:g .\n"
        );
    }

    #[test]
    fn relabel_renames_blank_nodes_only() {
        let ds = Dataset::new(vec![Quad::new(
            bn("a"),
            nn("http://ex/#p"),
            bn("b"),
            GraphName::DefaultGraph,
        )]);
        let relabeled = ds.relabel(&[BlankNode::new("a"), BlankNode::new("b")]);
        assert_eq!(
            relabeled.nquads(),
            vec!["_:c14n_0 <http://ex/#p> _:c14n_1 .\n".to_string()]
        );
    }

    #[test]
    fn is_smaller_subset_is_smaller() {
        let g = Dataset::new(vec![Quad::new(
            bn("a"),
            nn("http://ex/#p"),
            nn("http://ex/#o"),
            GraphName::DefaultGraph,
        )]);
        let h = Dataset::new(vec![
            Quad::new(bn("a"), nn("http://ex/#p"), nn("http://ex/#o"), GraphName::DefaultGraph),
            Quad::new(bn("b"), nn("http://ex/#p"), nn("http://ex/#o"), GraphName::DefaultGraph),
        ]);
        assert!(g.is_smaller(&h));
    }
}
