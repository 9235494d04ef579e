use amr_canon::canonicalize;
use amr_canon::graph::Graph;
use amr_canon::node::{
    NON_INVERTED_ROLES, Node, ROOT_EDGE_LABEL, check_tree, edge_triples, inverted_role,
};
use proptest::prelude::*;
use std::collections::HashSet;

/// Connected random graph: node i > 0 is linked to some earlier node, plus
/// arbitrary extra edges (cycles, self loops, parallel edges) and attributes.
fn arb_graph(acyclic: bool) -> impl Strategy<Value = Graph> {
    (1usize..8).prop_flat_map(move |n| {
        let links = prop::collection::vec((any::<prop::sample::Index>(), any::<bool>(), 0u8..5), n - 1);
        let extra_count = if acyclic { 0..1 } else { 0..12 };
        let extras = prop::collection::vec((0..n, 0..n, 0u8..5), extra_count);
        let attrs = prop::collection::vec((0..n, 0u8..3, 0u8..4), 0..6);
        (Just(n), links, extras, attrs).prop_map(|(n, links, extras, attrs)| {
            let mut g = Graph::new("n0");
            for i in 0..n {
                g = g.instance(&format!("n{}", i), &format!("c{}", i));
            }
            for (i, (earlier, forward, role_ix)) in links.into_iter().enumerate() {
                let child = i + 1;
                let parent = earlier.index(child);
                let (s, t) = if forward { (parent, child) } else { (child, parent) };
                g = g.edge(&format!("n{}", s), &role(role_ix), &format!("n{}", t));
            }
            for (s, t, role_ix) in extras {
                g = g.edge(&format!("n{}", s), &role(role_ix), &format!("n{}", t));
            }
            for (s, attr, value) in attrs {
                g = g.attribute(&format!("n{}", s), &format!("a{}", attr), &format!("v{}", value));
            }
            g
        })
    })
}

/// Plain roles plus roles whose natural spelling ends in `-of`.
fn role(i: u8) -> String {
    match i as usize {
        i if i < 3 => format!("r{}", i),
        i => NON_INVERTED_ROLES[(i - 3) % NON_INVERTED_ROLES.len()].to_string(),
    }
}

fn parent_child_pairs(root: &Node) -> Vec<(&Node, &Node)> {
    root.iter()
        .flat_map(|p| p.children.iter().map(move |c| (p, c)))
        .collect()
}

proptest! {
    #[test]
    fn every_edge_is_consumed_once(graph in arb_graph(false)) {
        let tree = canonicalize(&graph).unwrap();

        prop_assert_eq!(tree.count() - 1, graph.edges.len() + graph.attributes.len());

        let real: Vec<&str> = tree
            .iter()
            .filter(|n| !n.is_reentrancy && n.name.starts_with('n'))
            .map(|n| n.name.as_str())
            .collect();
        prop_assert_eq!(real.len(), graph.instances.len());
    }

    #[test]
    fn output_satisfies_tree_invariants(graph in arb_graph(false)) {
        let tree = canonicalize(&graph).unwrap();

        prop_assert_eq!(check_tree(&tree), Ok(()));
        prop_assert_eq!(tree.iter().filter(|n| n.incoming_edge == ROOT_EDGE_LABEL).count(), 1);
        prop_assert!(tree.iter().filter(|n| n.is_reentrancy).all(|n| n.children.is_empty() && n.label.is_none()));
    }

    #[test]
    fn inverse_suffix_marks_traversal_direction(graph in arb_graph(false)) {
        let tree = canonicalize(&graph).unwrap();
        let edges: HashSet<(&str, &str, &str)> = graph
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.role.as_str(), e.target.as_str()))
            .collect();

        for (parent, child) in parent_child_pairs(&tree) {
            if !child.name.starts_with('n') {
                continue;
            }
            match inverted_role(&child.incoming_edge) {
                Some(role) => prop_assert!(edges.contains(&(child.name.as_str(), role, parent.name.as_str()))),
                None => prop_assert!(edges.contains(&(parent.name.as_str(), child.incoming_edge.as_str(), child.name.as_str()))),
            }
        }
    }

    #[test]
    fn acyclic_graphs_round_trip(graph in arb_graph(true)) {
        let tree = canonicalize(&graph).unwrap();
        prop_assert_eq!(tree.reentrancy_count(), 0);

        let concept = |name: &str| graph.find_instance(name).map(|i| i.concept.clone()).unwrap_or_default();
        let mut expected: Vec<(String, String, String)> = graph
            .edges
            .iter()
            .map(|e| (concept(&e.source), e.role.clone(), concept(&e.target)))
            .chain(graph.attributes.iter().map(|a| (concept(&a.source), a.role.clone(), a.value.clone())))
            .collect();
        let mut actual: Vec<(String, String, String)> = edge_triples(&tree)
            .into_iter()
            .map(|t| (t.source, t.role, t.target))
            .collect();
        expected.sort();
        actual.sort();
        prop_assert_eq!(actual, expected);
    }
}
