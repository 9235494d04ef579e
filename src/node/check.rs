//! Invariant check for canonical trees.
//!
//! Downstream rendering assumes these hold unconditionally:
//! - exactly one node (the top) carries the root edge label
//! - non-reentrancy names are pairwise distinct
//! - a reentrancy has no label and no children
//! - a reentrancy name matches a non-reentrancy node of the same tree
//!
//! Labels that are themselves trees are checked as trees of their own.

use crate::error::CanonError;
use crate::node::{Node, NodeLabel};
use std::collections::HashSet;

pub fn check_tree(root: &Node) -> Result<(), CanonError> {
    let roots = root.iter().filter(|n| n.is_root()).count();
    if roots != 1 || !root.is_root() {
        return Err(CanonError::RootCount(roots));
    }

    let mut names: HashSet<&str> = HashSet::new();
    for node in root.iter().filter(|n| !n.is_reentrancy) {
        if !names.insert(node.name.as_str()) {
            return Err(CanonError::DuplicateName(node.name.clone()));
        }
    }

    for node in root.iter() {
        if node.is_reentrancy {
            if !node.children.is_empty() {
                return Err(CanonError::ReentrancyWithChildren(node.name.clone()));
            }
            if node.label.is_some() || node.label_type.is_some() {
                return Err(CanonError::ReentrancyWithLabel(node.name.clone()));
            }
            if !names.contains(node.name.as_str()) {
                return Err(CanonError::DanglingReentrancy(node.name.clone()));
            }
        } else if let Some(NodeLabel::Graph(inner)) = &node.label {
            check_tree(inner)?;
        }
    }

    Ok(())
}
