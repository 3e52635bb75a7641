//! N-Quads at the boundary: a minimal parser sufficient to round-trip the
//! canonical output profile (spec.md §6), and the `SerializeNQuads` trait
//! used to render individual terms. Full N-Quads/Turtle parsing (arbitrary
//! escape forms, comments, streaming) is explicitly out of scope (spec.md
//! §1) — this crate's job is the canonicalization core, not a parser.

use crate::error::CanonicalizationError;
use crate::rdf::{BlankNode, Dataset, GraphName, Literal, NamedNode, Quad, Term};

pub trait SerializeNQuads {
    fn serialize(&self) -> String;
}

impl SerializeNQuads for NamedNode {
    fn serialize(&self) -> String {
        format!("<{}>", self.value)
    }
}

impl SerializeNQuads for BlankNode {
    fn serialize(&self) -> String {
        format!("_:{}", self.value)
    }
}

impl SerializeNQuads for Term {
    fn serialize(&self) -> String {
        self.to_nquads()
    }
}

/// Parses a whole N-Quads document into a `Dataset`, in line order.
/// Blank lines are skipped; this parser does not support `#` comments,
/// matching the canonical output profile it is built to round-trip.
pub fn parse(input: &str) -> Result<Dataset, CanonicalizationError> {
    let mut quads = Vec::new();
    for (line_no, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let quad = parse_line(line)
            .map_err(|e| CanonicalizationError::MalformedInput(format!("line {}: {e}", line_no + 1)))?;
        quads.push(quad);
    }
    Ok(Dataset::new(quads))
}

fn parse_line(line: &str) -> Result<Quad, String> {
    let mut rest = line
        .strip_suffix('.')
        .ok_or_else(|| "missing terminating '.'".to_string())?
        .trim();

    let subject = next_term(&mut rest)?;
    let predicate = next_term(&mut rest)?;
    let object = next_term(&mut rest)?;
    rest = rest.trim();
    let graph = if rest.is_empty() {
        GraphName::DefaultGraph
    } else {
        match next_term(&mut rest)? {
            Term::NamedNode(n) => GraphName::NamedNode(n),
            Term::BlankNode(b) => GraphName::BlankNode(b),
            Term::Literal(_) => return Err("graph name cannot be a literal".to_string()),
        }
    };

    Ok(Quad::new(subject, predicate, object, graph))
}

/// Consumes and returns one term from the front of `rest`, advancing `rest`
/// past it (and any following whitespace).
fn next_term(rest: &mut &str) -> Result<Term, String> {
    *rest = rest.trim_start();
    if let Some(after) = rest.strip_prefix('<') {
        let end = after.find('>').ok_or_else(|| "unterminated IRI".to_string())?;
        let iri = &after[..end];
        *rest = &after[end + 1..];
        return Ok(Term::NamedNode(NamedNode::new(iri)));
    }
    if let Some(after) = rest.strip_prefix("_:") {
        let end = after.find(char::is_whitespace).unwrap_or(after.len());
        let label = &after[..end];
        *rest = &after[end..];
        return Ok(Term::BlankNode(BlankNode::new(label)));
    }
    if rest.starts_with('"') {
        return parse_literal(rest);
    }
    Err(format!("unrecognized term at: {rest}"))
}

fn parse_literal(rest: &mut &str) -> Result<Term, String> {
    let bytes = rest.as_bytes();
    let mut i = 1; // skip opening quote
    let mut value = String::new();
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i += 1;
                break;
            }
            b'\\' => {
                i += 1;
                let escaped = *bytes.get(i).ok_or_else(|| "unterminated escape".to_string())?;
                value.push(match escaped {
                    b'n' => '\n',
                    b'r' => '\r',
                    b't' => '\t',
                    b'"' => '"',
                    b'\\' => '\\',
                    other => other as char,
                });
                i += 1;
            }
            _ => {
                let ch_len = utf8_char_len(bytes[i]);
                value.push_str(std::str::from_utf8(&bytes[i..i + ch_len]).map_err(|e| e.to_string())?);
                i += ch_len;
            }
        }
    }
    let after_quote = &rest[i..];
    if let Some(after) = after_quote.strip_prefix("^^<") {
        let end = after.find('>').ok_or_else(|| "unterminated datatype IRI".to_string())?;
        let datatype = NamedNode::new(&after[..end]);
        *rest = &after[end + 1..];
        return Ok(Term::Literal(Literal::new(value, Some(datatype), None)));
    }
    if let Some(after) = after_quote.strip_prefix('@') {
        let end = after.find(char::is_whitespace).unwrap_or(after.len());
        let lang = after[..end].to_string();
        *rest = &after[end..];
        return Ok(Term::Literal(Literal::new(value, None, Some(lang))));
    }
    *rest = after_quote;
    Ok(Term::Literal(Literal::new(value, None, None)))
}

fn utf8_char_len(lead: u8) -> usize {
    if lead & 0x80 == 0 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ground_triple() {
        let ds = parse("<http://ex/#s> <http://ex/#p> <http://ex/#o> .\n").unwrap();
        assert_eq!(ds.quads().len(), 1);
        assert_eq!(ds.quads()[0].subject, Term::NamedNode(NamedNode::new("http://ex/#s")));
    }

    #[test]
    fn parses_blank_nodes_and_graph() {
        let ds = parse("_:e0 <http://ex/#p> _:e1 _:g .\n").unwrap();
        let q = &ds.quads()[0];
        assert_eq!(q.subject, Term::BlankNode(BlankNode::new("e0")));
        assert_eq!(q.graph, GraphName::BlankNode(BlankNode::new("g")));
    }

    #[test]
    fn parses_typed_and_lang_literals() {
        let ds = parse(
            "_:e0 <http://ex/#p> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n_:e0 <http://ex/#q> \"hi\"@en .\n",
        )
        .unwrap();
        assert_eq!(ds.quads().len(), 2);
        assert_eq!(
            ds.quads()[0].object,
            Term::Literal(Literal::new(
                "42",
                Some(NamedNode::new("http://www.w3.org/2001/XMLSchema#integer")),
                None
            ))
        );
    }

    #[test]
    fn parses_escaped_literal() {
        let ds = parse("<http://ex/#s> <http://ex/#p> \"a\\nb\\\"c\" .\n").unwrap();
        assert_eq!(ds.quads()[0].object, Term::Literal(Literal::new("a\nb\"c", None, None)));
    }

    #[test]
    fn rejects_missing_terminator() {
        assert!(parse("<http://ex/#s> <http://ex/#p> <http://ex/#o>\n").is_err());
    }

    #[test]
    fn skips_blank_lines() {
        let ds = parse("\n<http://ex/#s> <http://ex/#p> <http://ex/#o> .\n\n").unwrap();
        assert_eq!(ds.quads().len(), 1);
    }

    #[test]
    fn round_trips_serialize_then_parse() {
        let ds = Dataset::new(vec![Quad::new(
            Term::BlankNode(BlankNode::new("x")),
            Term::NamedNode(NamedNode::new("http://ex/#p")),
            Term::Literal(Literal::new("hi", None, Some("en".to_string()))),
            GraphName::DefaultGraph,
        )]);
        let text = ds.nquads().concat();
        let reparsed = parse(&text).unwrap();
        assert_eq!(reparsed.nquads(), ds.nquads());
    }
}
