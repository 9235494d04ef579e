//! Report records: one serializable view per input instance, ready to be
//! written as JSON for the visualization client.

use crate::Result;
use crate::amtree::{DependencyEdge, Sentence};
use crate::canon::canonicalize;
use crate::constituency::parse_tree;
use crate::graph::Graph;
use crate::node::Node;
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct GraphView {
    /// `# ::key value` metadata (sentence, id, ...).
    pub metadata: BTreeMap<String, String>,
    pub tree: Node,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentenceView {
    pub attributes: BTreeMap<String, String>,
    pub words: Vec<String>,
    pub tree: Node,
    pub dependency_edges: Vec<DependencyEdge>,
    pub alignments: BTreeMap<String, usize>,
}

pub fn graph_views(graphs: &[Graph]) -> Result<Vec<GraphView>> {
    let mut out = Vec::with_capacity(graphs.len());
    for (i, graph) in graphs.iter().enumerate() {
        let tree = canonicalize(graph).with_context(|| describe("graph", i, &graph.metadata))?;
        out.push(GraphView {
            metadata: graph.metadata.clone(),
            tree,
        });
    }
    info!(graphs = out.len(), "canonicalized corpus");
    Ok(out)
}

pub fn sentence_views(sentences: &[Sentence]) -> Result<Vec<SentenceView>> {
    let mut out = Vec::with_capacity(sentences.len());
    for (i, sentence) in sentences.iter().enumerate() {
        let assembled = sentence
            .assemble()
            .with_context(|| describe("sentence", i, &sentence.attributes))?;
        out.push(SentenceView {
            attributes: sentence.attributes.clone(),
            words: sentence.words().into_iter().map(str::to_string).collect(),
            tree: assembled.tree,
            dependency_edges: assembled.dependency_edges,
            alignments: assembled.alignments,
        });
    }
    info!(sentences = out.len(), "assembled corpus");
    Ok(out)
}

/// One bracketed tree per non-empty line.
pub fn constituency_views(text: &str) -> Result<Vec<Node>> {
    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let tree = parse_tree(line).with_context(|| format!("tree on line {}", lineno + 1))?;
        out.push(tree);
    }
    Ok(out)
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn describe(kind: &str, index: usize, metadata: &BTreeMap<String, String>) -> String {
    match metadata.get("id") {
        Some(id) => format!("{} #{} (id {})", kind, index, id),
        None => format!("{} #{}", kind, index),
    }
}
