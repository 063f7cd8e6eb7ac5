//! N-Triples / N-Quads rendering.
//!
//! Subjects, predicates and objects are free-form strings, so every term is
//! written as an IRI with characters that IRIs forbid percent-encoded.

use super::{Fact, Quad};

fn iri(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('<');
    for c in term.chars() {
        match c {
            ' ' | '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`' => {
                out.push_str(&format!("%{:02X}", c as u32));
            }
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", b));
                }
            }
            c => out.push(c),
        }
    }
    out.push('>');
    out
}

pub fn ntriple_line(fact: &Fact) -> String {
    format!(
        "{} {} {} .",
        iri(&fact.subject),
        iri(fact.predicate.as_str()),
        iri(&fact.object)
    )
}

pub fn nquad_line(quad: &Quad) -> String {
    format!(
        "{} {} {} {} .",
        iri(&quad.subject),
        iri(quad.predicate.as_str()),
        iri(&quad.object),
        iri(&quad.graph)
    )
}

pub fn to_ntriples(facts: &[Fact]) -> String {
    facts.iter().map(ntriple_line).collect::<Vec<_>>().join("\n")
}

pub fn to_nquads(quads: &[Quad]) -> String {
    quads.iter().map(nquad_line).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Predicate;

    #[test]
    fn test_ntriple_line() {
        let fact = Fact::new("Bar", Predicate::InheritsFrom, "Base");
        assert_eq!(ntriple_line(&fact), "<Bar> <inherits_from> <Base> .");
    }

    #[test]
    fn test_nquad_line_includes_graph() {
        let quad = Fact::new("install.py", Predicate::PartOf, "demo")
            .in_graph("project_structure")
            .to_quad();
        assert_eq!(
            nquad_line(&quad),
            "<install.py> <part_of> <demo> <project_structure> ."
        );
    }

    #[test]
    fn test_forbidden_characters_are_encoded() {
        let fact = Fact::new("a b", Predicate::custom("hasContent"), "x\ny>z");
        assert_eq!(ntriple_line(&fact), "<a%20b> <hasContent> <x%0Ay%3Ez> .");
    }

    #[test]
    fn test_documents_are_newline_joined() {
        let facts = vec![
            Fact::new("a", Predicate::Calls, "b"),
            Fact::new("c", Predicate::Calls, "d"),
        ];
        assert_eq!(to_ntriples(&facts).lines().count(), 2);
        assert!(to_ntriples(&[]).is_empty());
    }
}
