//! Canonical tree node: a graph spelled out as a tree with reentrancy markers.
//!
//! Every node has a name that is unique among the non-reentrancy nodes of its
//! tree. A reentrancy node shares its name with the node it points back to,
//! carries no label and never has children. Edges traversed against their
//! natural direction carry the `-of` suffix.
//!
//! The serialized field names are the ones the visualization client reads:
//! `node_name`, `node_label`, `label_type`, `incoming_edge`, `is_reentrancy`,
//! `child_nodes`.

pub mod check;
pub mod flatten;

pub use check::check_tree;
pub use flatten::{EdgeTriple, edge_triples};

use serde::Serialize;

/// Edge label of the single root node of a tree.
pub const ROOT_EDGE_LABEL: &str = "ROOT";

/// Suffix marking an edge traversed from target to source.
pub const INVERSE_SUFFIX: &str = "-of";

/// Roles whose natural spelling ends in `-of`.
pub const NON_INVERTED_ROLES: &[&str] = &["consist-of", "prep-out-of", "prep-on-behalf-of"];

/// Natural role of an inverted edge label, `None` for a forward label.
///
/// `consist-of` is forward; its inverse is spelled `consist-of-of`.
pub fn inverted_role(label: &str) -> Option<&str> {
    if NON_INVERTED_ROLES.contains(&label) {
        return None;
    }
    label.strip_suffix(INVERSE_SUFFIX)
}

/// How a node label is to be interpreted by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelType {
    String,
    Graph,
}

/// A node label: plain text, or a whole canonical tree (lexicalized supertags).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NodeLabel {
    Text(String),
    Graph(Box<Node>),
}

impl NodeLabel {
    pub fn label_type(&self) -> LabelType {
        match self {
            NodeLabel::Text(_) => LabelType::String,
            NodeLabel::Graph(_) => LabelType::Graph,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeLabel::Text(s) => Some(s),
            NodeLabel::Graph(_) => None,
        }
    }

    pub fn as_graph(&self) -> Option<&Node> {
        match self {
            NodeLabel::Text(_) => None,
            NodeLabel::Graph(g) => Some(g),
        }
    }
}

impl From<&str> for NodeLabel {
    fn from(s: &str) -> Self {
        NodeLabel::Text(s.to_string())
    }
}

impl From<String> for NodeLabel {
    fn from(s: String) -> Self {
        NodeLabel::Text(s)
    }
}

impl From<Node> for NodeLabel {
    fn from(n: Node) -> Self {
        NodeLabel::Graph(Box::new(n))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Node {
    #[serde(rename = "node_name")]
    pub name: String,

    #[serde(rename = "node_label")]
    pub label: Option<NodeLabel>,

    /// Always `label.map(label_type)`; absent on reentrancy nodes.
    pub label_type: Option<LabelType>,

    pub incoming_edge: String,

    pub is_reentrancy: bool,

    #[serde(rename = "child_nodes")]
    pub children: Vec<Node>,
}

impl Node {
    /// Node with the root edge label and no children.
    pub fn root(name: impl Into<String>, label: impl Into<NodeLabel>) -> Self {
        Self::new(name, Some(label.into()), ROOT_EDGE_LABEL, false)
    }

    pub fn new(
        name: impl Into<String>,
        label: Option<NodeLabel>,
        incoming_edge: impl Into<String>,
        is_reentrancy: bool,
    ) -> Self {
        let label_type = label.as_ref().map(NodeLabel::label_type);
        Self {
            name: name.into(),
            label,
            label_type,
            incoming_edge: incoming_edge.into(),
            is_reentrancy,
            children: Vec::new(),
        }
    }

    pub fn reentrancy(name: impl Into<String>, incoming_edge: impl Into<String>) -> Self {
        Self::new(name, None, incoming_edge, true)
    }

    /// Append a new child and return it.
    pub fn add_child(
        &mut self,
        name: impl Into<String>,
        label: impl Into<NodeLabel>,
        edge_label: impl Into<String>,
    ) -> &mut Node {
        self.push_child(Node::new(name, Some(label.into()), edge_label, false))
    }

    /// Append a back-reference to an already visited node.
    pub fn add_reentrancy(
        &mut self,
        name: impl Into<String>,
        edge_label: impl Into<String>,
    ) -> &mut Node {
        self.push_child(Node::reentrancy(name, edge_label))
    }

    /// Graft an already built subtree under this node.
    pub fn push_child(&mut self, child: Node) -> &mut Node {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn is_root(&self) -> bool {
        self.incoming_edge == ROOT_EDGE_LABEL
    }

    /// Text of the label, if it is a plain text label.
    pub fn text(&self) -> Option<&str> {
        self.label.as_ref().and_then(NodeLabel::as_text)
    }

    /// Pre-order walk over this node and all its descendants.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn reentrancy_count(&self) -> usize {
        self.iter().filter(|n| n.is_reentrancy).count()
    }

    /// First child reached over the given edge label.
    pub fn child(&self, edge_label: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.incoming_edge == edge_label)
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_tree_by_appending() {
        let mut root = Node::root("w", "yearn-01");
        let dragon = root.add_child("d", "dragon", "ARG0");
        dragon.add_child("l", "little", "mod");
        let fly = root.add_child("f", "fly-01", "ARG1");
        fly.add_reentrancy("d", "ARG0");

        assert_eq!(root.incoming_edge, ROOT_EDGE_LABEL);
        assert_eq!(root.label_type, Some(LabelType::String));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.count(), 5);
        assert_eq!(root.reentrancy_count(), 1);

        let back = &root.children[1].children[0];
        assert!(back.is_reentrancy);
        assert_eq!(back.label, None);
        assert_eq!(back.label_type, None);

        let names: Vec<&str> = root.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["w", "d", "l", "f", "d"]);
    }

    #[test]
    fn serializes_with_client_field_names() {
        let mut inner = Node::root("x", "dog");
        inner.add_reentrancy("x", "mod");
        let mut root = Node::root("", inner);
        root.add_child(".0", "cat", "ARG0");

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["node_name"], "");
        assert_eq!(json["label_type"], "GRAPH");
        assert_eq!(json["node_label"]["node_name"], "x");
        assert_eq!(json["node_label"]["child_nodes"][0]["node_label"], serde_json::Value::Null);
        assert_eq!(json["node_label"]["child_nodes"][0]["is_reentrancy"], true);
        assert_eq!(json["child_nodes"][0]["node_label"], "cat");
        assert_eq!(json["child_nodes"][0]["label_type"], "STRING");
        assert_eq!(json["child_nodes"][0]["incoming_edge"], "ARG0");
    }
}
