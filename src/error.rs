//! Error types shared by the decoders, the canonicalizer and the assembler.
//!
//! Syntax problems in any of the textual inputs are `ParseError`s. Everything
//! that is wrong with an already decoded structure is a `CanonError`.

use thiserror::Error;

/// Malformed input or a violated tree invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonError {
    #[error("graph has no top node")]
    MissingTop,

    #[error("top node {0:?} is not among the graph's instances")]
    UnknownTop(String),

    #[error("instance {0:?} is declared more than once")]
    DuplicateInstance(String),

    #[error("edge :{role} references unknown node {name:?}")]
    UnknownNode { name: String, role: String },

    #[error("no token carries the root edge label")]
    NoRootToken,

    #[error("tokens {0:?} all carry the root edge label")]
    MultipleRootTokens(Vec<usize>),

    #[error("token {token} has head {head}, but the sentence has {len} tokens")]
    BadHead { token: usize, head: usize, len: usize },

    #[error("node name {0:?} is used by more than one node")]
    DuplicateName(String),

    #[error("reentrancy {0:?} does not refer to any node in the tree")]
    DanglingReentrancy(String),

    #[error("reentrancy {0:?} has children")]
    ReentrancyWithChildren(String),

    #[error("reentrancy {0:?} carries a label")]
    ReentrancyWithLabel(String),

    #[error("tree has {0} nodes with the root edge label, expected exactly 1")]
    RootCount(usize),
}

/// Syntax error in PENMAN, amconll or bracketed tree input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{what} at {at}: {message}")]
pub struct ParseError {
    /// Which input kind failed ("penman", "amconll", "tree").
    pub what: &'static str,
    /// Byte offset for inline notation, line number for columnar input.
    pub at: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(what: &'static str, at: usize, message: impl Into<String>) -> Self {
        Self {
            what,
            at,
            message: message.into(),
        }
    }
}
