//! Graph canonicalization: attributed graph -> tree with reentrancy markers.
//!
//! Breadth-first walk from the top node with an explicit agenda. For every
//! dequeued node the edges are explored in a fixed order:
//! 1) outgoing edges, labelled with their role
//! 2) incoming edges, labelled with role + `-of`
//! 3) attributes, as leaves with fresh anonymous names
//!
//! Within each class the graph's enumeration order is kept. Every edge is
//! consumed once. A node reached a second time becomes a childless reentrancy
//! marker instead of a second subtree, which keeps cyclic graphs finite.
//!
//! An incoming edge is only taken against its direction when it discovers a
//! new node. If its source is already in the tree, the source consumes the
//! edge as an outgoing one when its turn comes, so a reentrancy is always
//! attached where the edge starts:
//!   (w / yearn-01 :ARG0 (d / dragon) :ARG1 (f / fly-01 :ARG0 d))
//! puts the `d` marker under `f`, not an `ARG0-of` marker for `f` under `d`.

mod agenda;

use crate::error::CanonError;
use crate::graph::Graph;
use crate::node::{INVERSE_SUFFIX, Node, check_tree};
use agenda::Agenda;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Edge indices per node, in graph order.
struct Adjacency<'g> {
    outgoing: HashMap<&'g str, Vec<usize>>,
    incoming: HashMap<&'g str, Vec<usize>>,
    attributes: HashMap<&'g str, Vec<usize>>,
}

impl<'g> Adjacency<'g> {
    fn build(graph: &'g Graph) -> Self {
        let mut outgoing: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, e) in graph.edges.iter().enumerate() {
            outgoing.entry(e.source.as_str()).or_default().push(i);
            incoming.entry(e.target.as_str()).or_default().push(i);
        }
        let mut attributes: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, a) in graph.attributes.iter().enumerate() {
            attributes.entry(a.source.as_str()).or_default().push(i);
        }
        Self {
            outgoing,
            incoming,
            attributes,
        }
    }

    fn of<'a>(map: &'a HashMap<&'g str, Vec<usize>>, name: &str) -> &'a [usize] {
        map.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Convert a graph into its canonical tree.
///
/// Rejects graphs without a top, with a top that is not an instance, with
/// duplicate instance names, or with edges touching unknown nodes. The result
/// satisfies every invariant checked by [`check_tree`].
pub fn canonicalize(graph: &Graph) -> Result<Node, CanonError> {
    let top = graph.top.as_deref().ok_or(CanonError::MissingTop)?;

    let mut concepts: HashMap<&str, &str> = HashMap::new();
    for inst in &graph.instances {
        if concepts.insert(&inst.name, &inst.concept).is_some() {
            return Err(CanonError::DuplicateInstance(inst.name.clone()));
        }
    }
    let top_concept = *concepts
        .get(top)
        .ok_or_else(|| CanonError::UnknownTop(top.to_string()))?;

    for e in &graph.edges {
        for end in [&e.source, &e.target] {
            if !concepts.contains_key(end.as_str()) {
                return Err(CanonError::UnknownNode {
                    name: end.clone(),
                    role: e.role.clone(),
                });
            }
        }
    }
    for a in &graph.attributes {
        if !concepts.contains_key(a.source.as_str()) {
            return Err(CanonError::UnknownNode {
                name: a.source.clone(),
                role: a.role.clone(),
            });
        }
    }

    let adjacency = Adjacency::build(graph);
    let reserved: HashSet<&str> = concepts.keys().copied().collect();
    let mut agenda = Agenda::new(top, top_concept, reserved);

    while let Some(current) = agenda.pop_next() {
        for &i in Adjacency::of(&adjacency.outgoing, current) {
            if agenda.log_edge(i) {
                let e = &graph.edges[i];
                explore_child(&mut agenda, &concepts, current, &e.target, e.role.clone());
            }
        }

        for &i in Adjacency::of(&adjacency.incoming, current) {
            let e = &graph.edges[i];
            // A visited source explores this edge itself, in its natural direction.
            if agenda.has_seen_node(&e.source) {
                continue;
            }
            if agenda.log_edge(i) {
                let label = format!("{}{}", e.role, INVERSE_SUFFIX);
                explore_child(&mut agenda, &concepts, current, &e.source, label);
            }
        }

        for &i in Adjacency::of(&adjacency.attributes, current) {
            if agenda.log_attribute(i) {
                let a = &graph.attributes[i];
                agenda.add_attribute(current, &a.value, a.role.clone());
            }
        }
    }

    let tree = agenda.into_tree();
    check_tree(&tree)?;

    debug!(
        top,
        nodes = tree.count(),
        reentrancies = tree.reentrancy_count(),
        "canonicalized graph"
    );
    Ok(tree)
}

fn explore_child<'g>(
    agenda: &mut Agenda<'g>,
    concepts: &HashMap<&str, &str>,
    parent: &str,
    child: &'g str,
    edge_label: String,
) {
    if agenda.has_seen_node(child) {
        agenda.add_reentrancy(parent, child, edge_label);
    } else {
        // Endpoints were validated up front.
        let concept = concepts.get(child).copied().unwrap_or_default();
        agenda.add_node(parent, child, concept, edge_label);
    }
}
