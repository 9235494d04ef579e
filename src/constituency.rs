//! Bracketed phrase-structure trees, e.g.
//!   (S (NP (D the) (N dog)) (VP (V chased) (NP (D the) (N cat))))
//!
//! Node names are positional addresses: the root is `0`, the i-th child of
//! `a` is `a.i`. Edges carry no role, so every non-root edge label is empty.
//! Words become leaf nodes labelled with the word.

use crate::error::ParseError;
use crate::node::{Node, check_tree};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok<'a> {
    Open(usize),
    Close(usize),
    Word(usize, &'a str),
}

fn tokenize(text: &str) -> Vec<Tok<'_>> {
    let mut out = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c == '(' || c == ')' || c.is_whitespace() {
            if let Some(s) = word_start.take() {
                out.push(Tok::Word(s, &text[s..i]));
            }
            match c {
                '(' => out.push(Tok::Open(i)),
                ')' => out.push(Tok::Close(i)),
                _ => {}
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(s) = word_start {
        out.push(Tok::Word(s, &text[s..]));
    }
    out
}

fn err(at: usize, message: impl Into<String>) -> ParseError {
    ParseError::new("tree", at, message)
}

struct Parser<'a> {
    toks: Vec<Tok<'a>>,
    pos: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn at(&self) -> usize {
        match self.toks.get(self.pos) {
            Some(Tok::Open(o)) | Some(Tok::Close(o)) | Some(Tok::Word(o, _)) => *o,
            None => self.end,
        }
    }

    /// Parse `(label child...)` into `parent`, or into a fresh root.
    fn subtree(&mut self, address: String, parent: Option<&mut Node>) -> Result<Option<Node>, ParseError> {
        match self.toks.get(self.pos) {
            Some(Tok::Open(_)) => self.pos += 1,
            _ => return Err(err(self.at(), "expected '('")),
        }

        let label = match self.toks.get(self.pos) {
            Some(Tok::Word(_, w)) => {
                self.pos += 1;
                w.to_string()
            }
            _ => String::new(),
        };

        let mut root = None;
        let node: &mut Node = match parent {
            Some(p) => p.add_child(address.clone(), label, ""),
            None => root.insert(Node::root(address.clone(), label)),
        };

        let mut i = 0;
        loop {
            match self.toks.get(self.pos) {
                Some(Tok::Close(_)) => {
                    self.pos += 1;
                    break;
                }
                Some(Tok::Open(_)) => {
                    self.subtree(format!("{}.{}", address, i), Some(&mut *node))?;
                }
                Some(Tok::Word(_, w)) => {
                    node.add_child(format!("{}.{}", address, i), *w, "");
                    self.pos += 1;
                }
                None => return Err(err(self.end, "unbalanced parentheses")),
            }
            i += 1;
        }

        Ok(root)
    }
}

pub fn parse_tree(text: &str) -> Result<Node, ParseError> {
    let mut p = Parser {
        toks: tokenize(text),
        pos: 0,
        end: text.len(),
    };
    let tree = p
        .subtree("0".to_string(), None)?
        .ok_or_else(|| err(0, "empty tree"))?;
    if p.pos < p.toks.len() {
        return Err(err(p.at(), "trailing input after tree"));
    }
    // Positional names are unique by construction.
    debug_assert!(check_tree(&tree).is_ok());
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ROOT_EDGE_LABEL;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_nested_phrases() {
        let tree = parse_tree("(S (NP (D the) (N dog)) (VP (V chased) (NP (D the) (N cat))))").unwrap();

        assert_eq!(tree.name, "0");
        assert_eq!(tree.text(), Some("S"));
        assert_eq!(tree.incoming_edge, ROOT_EDGE_LABEL);

        let rows: Vec<(&str, &str)> = tree
            .iter()
            .map(|n| (n.name.as_str(), n.text().unwrap_or("")))
            .collect();
        assert_eq!(
            &rows[..6],
            &[
                ("0", "S"),
                ("0.0", "NP"),
                ("0.0.0", "D"),
                ("0.0.0.0", "the"),
                ("0.0.1", "N"),
                ("0.0.1.0", "dog"),
            ]
        );
        assert_eq!(tree.count(), 14);
        assert!(tree.iter().skip(1).all(|n| n.incoming_edge.is_empty()));
        assert_eq!(check_tree(&tree), Ok(()));
    }

    #[test]
    fn accepts_unlabelled_wrapper() {
        let tree = parse_tree("( (S (NN hi)))").unwrap();
        assert_eq!(tree.text(), Some(""));
        assert_eq!(tree.children[0].text(), Some("S"));
    }

    #[test]
    fn rejects_unbalanced_input() {
        assert!(parse_tree("(S (NP the)").is_err());
        assert!(parse_tree("(S) (T)").is_err());
        assert!(parse_tree("word").is_err());
        assert!(parse_tree("").is_err());
    }
}
