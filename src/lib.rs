//! Canonical trees for meaning-representation graphs and AM dependency trees.
//!
//! - `graph`: attributed graph model, PENMAN decoding, corpus files
//! - `canon`: graph -> tree with reentrancy markers
//! - `supertag`: lexicalization of per-token graph fragments
//! - `amtree`: joining fragments along head pointers, amconll files
//! - `constituency`: bracketed phrase-structure trees
//! - `node`: the shared tree type
//! - `report`: JSON-ready records per instance

pub mod amtree;
pub mod canon;
pub mod constituency;
pub mod error;
pub mod graph;
pub mod node;
pub mod report;
pub mod supertag;

pub use amtree::{AssembledTree, DependencyEdge, Token, assemble};
pub use canon::canonicalize;
pub use error::{CanonError, ParseError};
pub use graph::Graph;
pub use node::{LabelType, Node, NodeLabel};

pub type Result<T> = anyhow::Result<T>;
