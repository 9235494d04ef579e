//! Attributed graph model: the triple sets handed to the canonicalizer.
//!
//! A graph is a top node name plus three ordered lists:
//! - instances: (name, concept)
//! - edges: (source, role, target) between instances
//! - attributes: (source, role, literal value)
//!
//! Roles are stored without the leading `:`. List order is the order in which
//! the canonicalizer emits children, so decoders keep document order.

pub mod corpus;
pub mod penman;

pub use corpus::{load_corpus, read_corpus};
pub use penman::decode;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    pub concept: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub role: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub source: String,
    pub role: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub top: Option<String>,

    #[serde(default)]
    pub instances: Vec<Instance>,

    #[serde(default)]
    pub edges: Vec<Edge>,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    /// `# ::key value` lines preceding the graph in a corpus file.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Graph {
    pub fn new(top: impl Into<String>) -> Self {
        Self {
            top: Some(top.into()),
            ..Self::default()
        }
    }

    pub fn instance(mut self, name: &str, concept: &str) -> Self {
        self.instances.push(Instance {
            name: name.to_string(),
            concept: concept.to_string(),
        });
        self
    }

    pub fn edge(mut self, source: &str, role: &str, target: &str) -> Self {
        self.edges.push(Edge {
            source: source.to_string(),
            role: role.to_string(),
            target: target.to_string(),
        });
        self
    }

    pub fn attribute(mut self, source: &str, role: &str, value: &str) -> Self {
        self.attributes.push(Attribute {
            source: source.to_string(),
            role: role.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn find_instance(&self, name: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.name == name)
    }
}
