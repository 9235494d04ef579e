//! AM dependency trees: per-token graph fragments joined by head pointers.
//!
//! Every token carries a fragment (a partially lexicalized graph), a 1-based
//! head (0 = virtual root) and an edge label. The assembled tree has one node
//! per token reachable from the root token; its label is the token's
//! canonicalized fragment, so the result is a tree of trees.
//!
//! Node names are addresses: the root token is `""`, the k-th dependent of
//! the node at address `a` (in sentence order) is `a.k`.

pub mod amconll;

pub use amconll::{Sentence, load_amconll, read_amconll};

use crate::Result;
use crate::error::CanonError;
use crate::node::{Node, NodeLabel, ROOT_EDGE_LABEL, check_tree};
use crate::supertag::{LexicalForms, NO_FRAGMENT, fragment_tree};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const ADDRESS_SEPARATOR: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub form: String,

    #[serde(default)]
    pub lemma: Option<String>,

    /// Graph fragment with placeholders; `_` for none.
    pub fragment: String,

    /// Value substituted for `--LEX--`.
    #[serde(default)]
    pub lexlabel: Option<String>,

    /// 1-based; 0 attaches to the virtual root.
    pub head: usize,

    pub label: String,

    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default)]
    pub ner: Option<String>,
    #[serde(default)]
    pub typ: Option<String>,
    #[serde(default)]
    pub aligned: bool,
}

impl Token {
    pub fn new(form: &str, fragment: &str, head: usize, label: &str) -> Self {
        Self {
            form: form.to_string(),
            lemma: None,
            fragment: fragment.to_string(),
            lexlabel: None,
            head,
            label: label.to_string(),
            replacement: None,
            pos: None,
            ner: None,
            typ: None,
            aligned: false,
        }
    }

    pub fn with_lemma(mut self, lemma: &str) -> Self {
        self.lemma = Some(lemma.to_string());
        self
    }

    pub fn with_lexlabel(mut self, lexlabel: &str) -> Self {
        self.lexlabel = Some(lexlabel.to_string());
        self
    }

    pub fn has_fragment(&self) -> bool {
        self.fragment != NO_FRAGMENT
    }

    fn forms(&self) -> LexicalForms<'_> {
        LexicalForms {
            form: &self.form,
            lemma: self.lemma.as_deref(),
            lexlabel: self.lexlabel.as_deref(),
        }
    }
}

/// Dependency edge between 0-based token positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    pub head: usize,
    pub dependent: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledTree {
    pub tree: Node,
    pub dependency_edges: Vec<DependencyEdge>,
    /// Node address -> 0-based token position.
    pub alignments: BTreeMap<String, usize>,
}

/// Flat `(head, dependent, label)` list, 0-based, without virtual root edges.
pub fn dependency_edges(tokens: &[Token]) -> Vec<DependencyEdge> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.head != 0)
        .map(|(i, t)| DependencyEdge {
            head: t.head - 1,
            dependent: i,
            label: t.label.clone(),
        })
        .collect()
}

/// Join the tokens' fragment trees along their head pointers.
///
/// Exactly one token must be labelled `ROOT`; it becomes the root. Tokens
/// that cannot be reached from it (virtual-root attachments such as ignored
/// punctuation, or head cycles) are not part of the tree.
pub fn assemble(tokens: &[Token]) -> Result<AssembledTree> {
    let len = tokens.len();
    for (i, t) in tokens.iter().enumerate() {
        if t.head > len {
            return Err(CanonError::BadHead {
                token: i + 1,
                head: t.head,
                len,
            }
            .into());
        }
    }

    let roots: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.label == ROOT_EDGE_LABEL)
        .map(|(i, _)| i)
        .collect();
    let root = match roots.as_slice() {
        [] => return Err(CanonError::NoRootToken.into()),
        [root] => *root,
        many => {
            let positions = many.iter().map(|i| i + 1).collect();
            return Err(CanonError::MultipleRootTokens(positions).into());
        }
    };

    // dependents[h] = 0-based positions of tokens whose head is h (1-based).
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); len + 1];
    for (i, t) in tokens.iter().enumerate() {
        dependents[t.head].push(i);
    }

    let mut builder = Builder {
        tokens,
        dependents,
        placed: vec![false; len],
        alignments: BTreeMap::new(),
    };
    builder.placed[root] = true;
    let tree = builder.build(root, String::new(), None)?;
    check_tree(&tree)?;

    for (i, t) in tokens.iter().enumerate() {
        if !builder.placed[i] && t.head != 0 {
            warn!(token = i + 1, head = t.head, "token is not reachable from the root");
        }
    }
    debug!(
        tokens = len,
        nodes = tree.count(),
        "assembled dependency tree"
    );

    Ok(AssembledTree {
        tree,
        dependency_edges: dependency_edges(tokens),
        alignments: builder.alignments,
    })
}

struct Builder<'t> {
    tokens: &'t [Token],
    dependents: Vec<Vec<usize>>,
    placed: Vec<bool>,
    alignments: BTreeMap<String, usize>,
}

impl Builder<'_> {
    fn build(&mut self, i: usize, address: String, edge_label: Option<&str>) -> Result<Node> {
        let tokens = self.tokens;
        let token = &tokens[i];
        let label = self.label(i)?;
        let mut node = match edge_label {
            None => Node::root(address.clone(), label),
            Some(edge) => Node::new(address.clone(), Some(label), edge, false),
        };
        self.alignments.insert(address.clone(), i);

        let dependents = self.dependents[i + 1].clone();
        let mut k = 0;
        for child in dependents {
            if self.placed[child] {
                continue;
            }
            self.placed[child] = true;
            let child_address = format!("{}{}{}", address, ADDRESS_SEPARATOR, k);
            k += 1;
            let subtree = self.build(child, child_address, Some(tokens[child].label.as_str()))?;
            node.push_child(subtree);
        }

        debug!(token = i + 1, form = %token.form, dependents = k, "placed token");
        Ok(node)
    }

    fn label(&self, i: usize) -> Result<NodeLabel> {
        let token = &self.tokens[i];
        if !token.has_fragment() {
            return Ok(NodeLabel::Text(token.form.clone()));
        }
        let tree = fragment_tree(&token.fragment, &token.forms())
            .with_context(|| format!("token {} ({:?})", i + 1, token.form))?;
        Ok(tree.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::LabelType;
    use pretty_assertions::assert_eq;

    fn giraffe_likes_cars() -> Vec<Token> {
        vec![
            Token::new("giraffes", "(g<root> / --LEX--)", 2, "ARG0").with_lexlabel("giraffe"),
            Token::new("like", "(l<root> / --LEX-- :ARG0 (s<s>) :ARG1 (o<o>))", 0, "ROOT")
                .with_lemma("like")
                .with_lexlabel("$LEMMA$-01"),
            Token::new("cars", "(c<root> / --LEX--)", 2, "ARG1").with_lexlabel("car"),
        ]
    }

    #[test]
    fn assembles_tree_along_heads() {
        let out = assemble(&giraffe_likes_cars()).unwrap();

        let tree = &out.tree;
        assert_eq!(tree.name, "");
        assert_eq!(tree.incoming_edge, ROOT_EDGE_LABEL);
        assert_eq!(tree.label_type, Some(LabelType::Graph));
        let like = tree.label.as_ref().and_then(NodeLabel::as_graph).unwrap();
        assert_eq!(like.text(), Some("like-01"));
        assert_eq!(like.children.len(), 2);

        let kids: Vec<(&str, &str)> = tree
            .children
            .iter()
            .map(|c| (c.name.as_str(), c.incoming_edge.as_str()))
            .collect();
        assert_eq!(kids, vec![(".0", "ARG0"), (".1", "ARG1")]);
        let giraffe = tree.children[0].label.as_ref().and_then(NodeLabel::as_graph).unwrap();
        assert_eq!(giraffe.text(), Some("giraffe"));

        assert_eq!(
            out.dependency_edges,
            vec![
                DependencyEdge {
                    head: 1,
                    dependent: 0,
                    label: "ARG0".to_string()
                },
                DependencyEdge {
                    head: 1,
                    dependent: 2,
                    label: "ARG1".to_string()
                },
            ]
        );

        let alignments: Vec<(&str, usize)> =
            out.alignments.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(alignments, vec![("", 1), (".0", 0), (".1", 2)]);
    }

    #[test]
    fn nested_addresses_extend_parent_address() {
        let tokens = vec![
            Token::new("the", "_", 2, "DET"),
            Token::new("dog", "(d<root> / --LEX--)", 3, "ARG0"),
            Token::new("barks", "(b<root> / --LEX-- :ARG0 (s<s>))", 0, "ROOT"),
            Token::new(".", "_", 0, "IGNORE"),
        ];
        let out = assemble(&tokens).unwrap();

        let det = &out.tree.children[0].children[0];
        assert_eq!(det.name, ".0.0");
        assert_eq!(det.incoming_edge, "DET");
        assert_eq!(det.label, Some(NodeLabel::Text("the".to_string())));
        assert_eq!(out.alignments[".0.0"], 0);
        assert_eq!(out.tree.count(), 3);
        assert_eq!(out.dependency_edges.len(), 2);
    }

    #[test]
    fn head_cycles_do_not_loop() {
        let tokens = vec![
            Token::new("a", "(a<root> / --LEX--)", 0, "ROOT"),
            Token::new("b", "(b<root> / --LEX--)", 3, "mod"),
            Token::new("c", "(c<root> / --LEX--)", 2, "mod"),
        ];
        let out = assemble(&tokens).unwrap();
        assert_eq!(out.tree.count(), 1);
    }

    #[test]
    fn rejects_sentence_without_root() {
        let tokens = vec![Token::new("a", "_", 0, "IGNORE")];
        let err = assemble(&tokens).unwrap_err();
        assert_eq!(err.downcast_ref::<CanonError>(), Some(&CanonError::NoRootToken));
    }

    #[test]
    fn rejects_sentence_with_two_roots() {
        let side_by_side = vec![
            Token::new("a", "_", 0, "ROOT"),
            Token::new("b", "_", 0, "ROOT"),
        ];
        let err = assemble(&side_by_side).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CanonError>(),
            Some(&CanonError::MultipleRootTokens(vec![1, 2]))
        );

        let nested = vec![
            Token::new("a", "_", 0, "ROOT"),
            Token::new("b", "_", 1, "ROOT"),
        ];
        let err = assemble(&nested).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CanonError>(),
            Some(&CanonError::MultipleRootTokens(vec![1, 2]))
        );
    }

    #[test]
    fn rejects_head_outside_sentence() {
        let tokens = vec![Token::new("a", "_", 5, "ROOT")];
        let err = assemble(&tokens).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CanonError>(),
            Some(&CanonError::BadHead {
                token: 1,
                head: 5,
                len: 1
            })
        );
    }

    #[test]
    fn broken_fragment_names_the_token() {
        let tokens = vec![Token::new("a", "(a<root> / --LEX--", 0, "ROOT")];
        let err = assemble(&tokens).unwrap_err();
        assert!(format!("{:#}", err).contains("token 1 (\"a\")"));
    }
}
