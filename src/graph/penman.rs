//! PENMAN notation decoder.
//!
//! Grammar:
//!   node   := '(' var ( '/' concept )? ( role target )* ')'
//!   target := node | atom
//!   atom   := "quoted string" | symbol
//!
//! Example:
//!   (w / want-01 :ARG0 (b / boy) :ARG1 (g / go-02 :ARG0 b :polarity -))
//!
//! Roles ending in `-of` are stored in their natural direction. An unquoted
//! atom naming a variable of the graph is an edge; every other atom is an
//! attribute. Surface alignments (`~e.3`) are dropped.

use crate::error::ParseError;
use crate::graph::{Attribute, Edge, Graph, Instance};
use crate::node::inverted_role;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Open,
    Close,
    Slash,
    Role(String),
    Str(String),
    Sym(String),
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Capture:
    // 1) punctuation ( ) /
    // 2) role  :ARG0
    // 3) quoted string, escapes allowed
    // 4) bare symbol
    // then an optional alignment suffix ~e.1,2
    RE.get_or_init(|| {
        Regex::new(
            r#"^\s*(?:([()/])|(:[^\s()"~/]*)|("(?:[^"\\]|\\.)*")|([^\s()"~:/][^\s()"~/]*))(?:~[^\s()]*)?"#,
        )
        .expect("token regex is valid")
    })
}

fn tokenize(text: &str) -> Result<Vec<(usize, Tok)>, ParseError> {
    let re = token_re();
    let mut out = Vec::new();
    let mut pos = 0;

    loop {
        let rest = &text[pos..];
        if rest.trim().is_empty() {
            break;
        }
        let caps = match re.captures(rest) {
            Some(c) => c,
            None => {
                let at = pos + (rest.len() - rest.trim_start().len());
                return Err(ParseError::new(
                    "penman",
                    at,
                    format!("unexpected input {:?}", rest.trim_start().chars().next()),
                ));
            }
        };
        let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
        let (start, tok) = if let Some(m) = caps.get(1) {
            let tok = match m.as_str() {
                "(" => Tok::Open,
                ")" => Tok::Close,
                _ => Tok::Slash,
            };
            (m.start(), tok)
        } else if let Some(m) = caps.get(2) {
            (m.start(), Tok::Role(m.as_str()[1..].to_string()))
        } else if let Some(m) = caps.get(3) {
            (m.start(), Tok::Str(m.as_str().to_string()))
        } else if let Some(m) = caps.get(4) {
            (m.start(), Tok::Sym(m.as_str().to_string()))
        } else {
            return Err(ParseError::new("penman", pos, "empty token"));
        };
        out.push((pos + start, tok));
        pos += whole;
    }

    Ok(out)
}

/// One decoded triple, before atoms are split into edges and attributes.
enum Triple {
    Instance(Instance),
    Edge(Edge),
    Atom {
        source: String,
        role: String,
        value: String,
        quoted: bool,
    },
}

struct Decoder {
    toks: Vec<(usize, Tok)>,
    pos: usize,
    end: usize,
    triples: Vec<Triple>,
    variables: HashSet<String>,
}

impl Decoder {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.toks.get(self.pos).map(|(o, _)| *o).unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        tok
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new("penman", self.offset(), message)
    }

    fn expect(&mut self, want: Tok) -> Result<(), ParseError> {
        match self.peek() {
            Some(t) if *t == want => {
                self.pos += 1;
                Ok(())
            }
            other => Err(self.error(format!("expected {:?}, found {:?}", want, other))),
        }
    }

    /// Parse one bracketed node and return its variable.
    fn node(&mut self) -> Result<String, ParseError> {
        self.expect(Tok::Open)?;

        let var = match self.advance() {
            Some(Tok::Sym(v)) => v,
            other => {
                self.pos -= 1;
                return Err(self.error(format!("expected variable, found {:?}", other)));
            }
        };
        self.variables.insert(var.clone());

        if self.peek() == Some(&Tok::Slash) {
            self.pos += 1;
            let concept = match self.advance() {
                Some(Tok::Sym(c)) | Some(Tok::Str(c)) => c,
                other => {
                    self.pos -= 1;
                    return Err(self.error(format!("expected concept, found {:?}", other)));
                }
            };
            self.triples.push(Triple::Instance(Instance {
                name: var.clone(),
                concept,
            }));
        }

        while let Some(Tok::Role(role)) = self.peek().cloned() {
            self.pos += 1;
            match self.peek().cloned() {
                Some(Tok::Open) => {
                    // Reserve the slot so the edge precedes the nested triples.
                    let slot = self.triples.len();
                    self.triples.push(Triple::Edge(Edge {
                        source: String::new(),
                        role: String::new(),
                        target: String::new(),
                    }));
                    let child = self.node()?;
                    self.triples[slot] = Triple::Edge(oriented(&var, &role, &child));
                }
                Some(Tok::Sym(value)) => {
                    self.pos += 1;
                    self.triples.push(Triple::Atom {
                        source: var.clone(),
                        role,
                        value,
                        quoted: false,
                    });
                }
                Some(Tok::Str(value)) => {
                    self.pos += 1;
                    self.triples.push(Triple::Atom {
                        source: var.clone(),
                        role,
                        value,
                        quoted: true,
                    });
                }
                other => {
                    return Err(self.error(format!("role :{} has no target, found {:?}", role, other)));
                }
            }
        }

        self.expect(Tok::Close)?;
        Ok(var)
    }
}

/// Edge in its natural direction, whichever way it was written.
fn oriented(source: &str, role: &str, target: &str) -> Edge {
    match inverted_role(role) {
        Some(natural) => Edge {
            source: target.to_string(),
            role: natural.to_string(),
            target: source.to_string(),
        },
        _ => Edge {
            source: source.to_string(),
            role: role.to_string(),
            target: target.to_string(),
        },
    }
}

/// Decode a single graph in PENMAN notation.
pub fn decode(text: &str) -> Result<Graph, ParseError> {
    let toks = tokenize(text)?;
    if toks.is_empty() {
        return Err(ParseError::new("penman", 0, "empty graph"));
    }

    let mut d = Decoder {
        toks,
        pos: 0,
        end: text.len(),
        triples: Vec::new(),
        variables: HashSet::new(),
    };
    let top = d.node()?;
    if d.pos < d.toks.len() {
        return Err(d.error("trailing input after graph"));
    }

    let mut graph = Graph::new(top);
    for triple in d.triples {
        match triple {
            Triple::Instance(i) => graph.instances.push(i),
            Triple::Edge(e) => graph.edges.push(e),
            Triple::Atom {
                source,
                role,
                value,
                quoted,
            } => {
                if !quoted && d.variables.contains(&value) {
                    graph.edges.push(oriented(&source, &role, &value));
                } else {
                    graph.attributes.push(Attribute {
                        source,
                        role,
                        value,
                    });
                }
            }
        }
    }

    Ok(graph)
}
