//! Reading AMR corpus files: many PENMAN graphs, each optionally preceded by
//! metadata comments.
//!
//! Example:
//! # ::id lpp_1943.2 ::date 2012-06-07
//! # ::snt The boy wants to go.
//! (w / want-01
//!    :ARG0 (b / boy)
//!    :ARG1 (g / go-02 :ARG0 b))
//!
//! Graphs are separated by blank lines. Blocks holding only comments (file
//! headers) are skipped.

use crate::Result;
use crate::graph::{Graph, penman};
use anyhow::Context;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;

/// Read and decode every graph of a corpus file.
pub fn load_corpus(path: &str) -> Result<Vec<Graph>> {
    let text = fs::read_to_string(path).with_context(|| format!("read corpus file {}", path))?;
    read_corpus(&text).with_context(|| format!("decode corpus file {}", path))
}

pub fn read_corpus(text: &str) -> Result<Vec<Graph>> {
    let key_re = Regex::new(r"(?:^|\s)::(\S+)")?;

    let mut graphs = Vec::new();
    let mut metadata = BTreeMap::new();
    let mut body = String::new();
    let mut block_start = 1;

    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush(&mut graphs, &mut metadata, &mut body, block_start)?;
            block_start = lno + 1;
            continue;
        }

        if let Some(comment) = trimmed.strip_prefix('#') {
            parse_metadata(&key_re, comment, &mut metadata);
            continue;
        }

        body.push_str(line);
        body.push('\n');
    }
    flush(&mut graphs, &mut metadata, &mut body, block_start)?;

    Ok(graphs)
}

fn flush(
    graphs: &mut Vec<Graph>,
    metadata: &mut BTreeMap<String, String>,
    body: &mut String,
    block_start: usize,
) -> Result<()> {
    // Metadata separated from its graph by blank lines stays pending.
    if body.trim().is_empty() {
        body.clear();
        return Ok(());
    }

    let mut graph = penman::decode(body).with_context(|| {
        format!(
            "graph #{} starting at line {}",
            graphs.len(),
            block_start
        )
    })?;
    graph.metadata = std::mem::take(metadata);
    graphs.push(graph);
    body.clear();
    Ok(())
}

/// `::key value ::key2 value2` pairs; a key without value maps to "".
fn parse_metadata(key_re: &Regex, comment: &str, out: &mut BTreeMap<String, String>) {
    let keys: Vec<(usize, usize, &str)> = key_re
        .captures_iter(comment)
        .filter_map(|c| {
            let whole = c.get(0)?;
            let key = c.get(1)?;
            Some((whole.start(), key.end(), key.as_str()))
        })
        .collect();

    for (i, (_, value_start, key)) in keys.iter().enumerate() {
        let value_end = keys.get(i + 1).map(|k| k.0).unwrap_or(comment.len());
        let value = comment[*value_start..value_end].trim();
        out.insert(key.to_string(), value.to_string());
    }
}
