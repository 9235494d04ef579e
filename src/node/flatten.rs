//! Flatten a canonical tree back into graph edges.
//!
//! Walks the tree depth-first and emits one triple per child. Edges carrying
//! the `-of` suffix are turned back into their natural direction, and a
//! reentrancy contributes the label of the node it refers to. For a graph
//! without reentrancy this reconstructs the input edge multiset.

use crate::node::{Node, NodeLabel, inverted_role};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeTriple {
    pub source: String,
    pub role: String,
    pub target: String,
    /// True if the tree traverses this edge from target to source.
    pub inverted: bool,
}

pub fn edge_triples(root: &Node) -> Vec<EdgeTriple> {
    let labels: HashMap<&str, String> = root
        .iter()
        .filter(|n| !n.is_reentrancy)
        .map(|n| (n.name.as_str(), display_label(n)))
        .collect();

    let mut out = Vec::new();
    walk(root, &labels, &mut out);
    out
}

fn walk(node: &Node, labels: &HashMap<&str, String>, out: &mut Vec<EdgeTriple>) {
    let here = display_label(node);
    for child in &node.children {
        let there = if child.is_reentrancy {
            labels.get(child.name.as_str()).cloned().unwrap_or_default()
        } else {
            display_label(child)
        };

        let triple = match inverted_role(&child.incoming_edge) {
            Some(role) => EdgeTriple {
                source: there,
                role: role.to_string(),
                target: here.clone(),
                inverted: true,
            },
            None => EdgeTriple {
                source: here.clone(),
                role: child.incoming_edge.clone(),
                target: there,
                inverted: false,
            },
        };
        out.push(triple);
        walk(child, labels, out);
    }
}

/// Text labels as is; a nested graph is represented by its top's label.
fn display_label(node: &Node) -> String {
    match &node.label {
        Some(NodeLabel::Text(s)) => s.clone(),
        Some(NodeLabel::Graph(g)) => display_label(g),
        None => String::new(),
    }
}
