//! Traversal state for one canonicalization call.
//!
//! Nodes live in a flat arena while the walk is in progress; children are
//! recorded as arena indices and only turned into owned subtrees once the
//! walk is done. A child is always created after its parent, so its index is
//! larger, and assembling from the back of the arena never meets an
//! unfinished child.

use crate::node::Node;
use std::collections::{HashMap, HashSet, VecDeque};

const ALIAS_BASE: &str = "alias";

struct Slot {
    node: Node,
    children: Vec<usize>,
}

pub(crate) struct Agenda<'g> {
    arena: Vec<Slot>,
    visited: HashMap<&'g str, usize>,
    queue: VecDeque<&'g str>,
    edges_seen: HashSet<usize>,
    attributes_seen: HashSet<usize>,
    aliases: AliasCounter<'g>,
}

impl<'g> Agenda<'g> {
    pub(crate) fn new(top: &'g str, concept: &str, reserved: HashSet<&'g str>) -> Self {
        let mut agenda = Self {
            arena: Vec::new(),
            visited: HashMap::new(),
            queue: VecDeque::new(),
            edges_seen: HashSet::new(),
            attributes_seen: HashSet::new(),
            aliases: AliasCounter::new(reserved),
        };
        agenda.arena.push(Slot {
            node: Node::root(top, concept),
            children: Vec::new(),
        });
        agenda.visited.insert(top, 0);
        agenda.queue.push_back(top);
        agenda
    }

    pub(crate) fn pop_next(&mut self) -> Option<&'g str> {
        self.queue.pop_front()
    }

    pub(crate) fn has_seen_node(&self, name: &str) -> bool {
        self.visited.contains_key(name)
    }

    /// Mark an edge consumed; false if it already was.
    pub(crate) fn log_edge(&mut self, index: usize) -> bool {
        self.edges_seen.insert(index)
    }

    pub(crate) fn log_attribute(&mut self, index: usize) -> bool {
        self.attributes_seen.insert(index)
    }

    /// Add a fresh node under `parent` and queue it for exploration.
    pub(crate) fn add_node(&mut self, parent: &str, name: &'g str, concept: &str, edge_label: String) {
        let node = Node::new(name, Some(concept.into()), edge_label, false);
        let index = self.attach(parent, node);
        self.visited.insert(name, index);
        self.queue.push_back(name);
    }

    pub(crate) fn add_reentrancy(&mut self, parent: &str, name: &str, edge_label: String) {
        self.attach(parent, Node::reentrancy(name, edge_label));
    }

    /// Add an attribute leaf under `parent` with a fresh anonymous name.
    pub(crate) fn add_attribute(&mut self, parent: &str, value: &str, edge_label: String) {
        let name = self.aliases.fresh();
        self.attach(parent, Node::new(name, Some(value.into()), edge_label, false));
    }

    fn attach(&mut self, parent: &str, node: Node) -> usize {
        let index = self.arena.len();
        self.arena.push(Slot {
            node,
            children: Vec::new(),
        });
        // Parents are always visited before their edges are explored.
        if let Some(&p) = self.visited.get(parent) {
            self.arena[p].children.push(index);
        }
        index
    }

    /// Turn the arena into the owned tree rooted at the top node.
    pub(crate) fn into_tree(mut self) -> Node {
        for i in (0..self.arena.len()).rev() {
            let kids = std::mem::take(&mut self.arena[i].children);
            let built: Vec<Node> = kids
                .into_iter()
                .map(|k| std::mem::take(&mut self.arena[k].node))
                .collect();
            self.arena[i].node.children = built;
        }
        self.arena.swap_remove(0).node
    }
}

/// Hands out `alias1`, `alias2`, ... skipping names the graph already uses.
struct AliasCounter<'g> {
    count: usize,
    reserved: HashSet<&'g str>,
}

impl<'g> AliasCounter<'g> {
    fn new(reserved: HashSet<&'g str>) -> Self {
        Self { count: 0, reserved }
    }

    fn fresh(&mut self) -> String {
        loop {
            self.count += 1;
            let name = format!("{}{}", ALIAS_BASE, self.count);
            if !self.reserved.contains(name.as_str()) {
                return name;
            }
        }
    }
}
