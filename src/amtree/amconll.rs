//! Reader for the amconll format.
//!
//! One token per line, tab-separated columns:
//! id  token  replacement  lemma  pos  ner  fragment  lexlabel  type  head  label  aligned  [range]
//!
//! Example:
//! #raw:The giraffe likes cars
//! 1	The	_	the	DT	O	_	_	_	0	IGNORE	true
//! 2	giraffe	_	giraffe	NN	O	(g<root> / --LEX--)	$LEMMA$	()	3	APP_s	true
//!
//! Sentences are separated by blank lines; `#key:value` lines are sentence
//! attributes. `_` marks an empty column.

use crate::Result;
use crate::amtree::{AssembledTree, Token, assemble};
use crate::error::ParseError;
use crate::supertag::NO_FRAGMENT;
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;

const EMPTY: &str = "_";
const MIN_COLUMNS: usize = 12;
const MAX_COLUMNS: usize = 13;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sentence {
    pub attributes: BTreeMap<String, String>,
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn assemble(&self) -> Result<AssembledTree> {
        assemble(&self.tokens)
    }

    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.form.as_str()).collect()
    }
}

pub fn load_amconll(path: &str) -> Result<Vec<Sentence>> {
    let text = fs::read_to_string(path).with_context(|| format!("read amconll file {}", path))?;
    read_amconll(&text).with_context(|| format!("parse amconll file {}", path))
}

pub fn read_amconll(text: &str) -> std::result::Result<Vec<Sentence>, ParseError> {
    let mut out = Vec::new();
    let mut current = Sentence::default();

    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;
        let line = line.trim_end_matches(['\r', '\n']);

        if line.trim().is_empty() {
            if !current.tokens.is_empty() {
                out.push(std::mem::take(&mut current));
            } else {
                current.attributes.clear();
            }
            continue;
        }

        if let Some(attr) = line.strip_prefix('#') {
            let (key, value) = attr.split_once(':').unwrap_or((attr, ""));
            current
                .attributes
                .insert(key.trim().to_string(), value.trim().to_string());
            continue;
        }

        let token = parse_token(line, lno, current.tokens.len() + 1)?;
        current.tokens.push(token);
    }

    if !current.tokens.is_empty() {
        out.push(current);
    }
    Ok(out)
}

fn parse_token(line: &str, lno: usize, expected_id: usize) -> std::result::Result<Token, ParseError> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < MIN_COLUMNS || cols.len() > MAX_COLUMNS {
        return Err(ParseError::new(
            "amconll",
            lno,
            format!(
                "expected {} or {} columns, found {}",
                MIN_COLUMNS,
                MAX_COLUMNS,
                cols.len()
            ),
        ));
    }

    let number = |idx: usize, what: &str| -> std::result::Result<usize, ParseError> {
        cols[idx].trim().parse::<usize>().map_err(|_| {
            ParseError::new("amconll", lno, format!("bad {} {:?}", what, cols[idx]))
        })
    };

    let id = number(0, "id")?;
    if id != expected_id {
        return Err(ParseError::new(
            "amconll",
            lno,
            format!("token id {} out of sequence, expected {}", id, expected_id),
        ));
    }
    let head = number(9, "head")?;

    let optional = |idx: usize| -> Option<String> {
        let v = cols[idx].trim();
        if v == EMPTY || v.is_empty() {
            None
        } else {
            Some(v.to_string())
        }
    };

    let fragment = match cols[6].trim() {
        "" => NO_FRAGMENT.to_string(),
        f => f.to_string(),
    };

    Ok(Token {
        form: cols[1].to_string(),
        replacement: optional(2),
        lemma: optional(3),
        pos: optional(4),
        ner: optional(5),
        fragment,
        lexlabel: optional(7),
        typ: optional(8),
        head,
        label: cols[10].trim().to_string(),
        aligned: cols[11].trim().eq_ignore_ascii_case("true"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeLabel;
    use pretty_assertions::assert_eq;

    const SENTENCES: &str = "#raw:The giraffe likes cars\n\
#id:s1\n\
1\tThe\t_\tthe\tDT\tO\t_\t_\t_\t0\tIGNORE\ttrue\n\
2\tgiraffe\t_\tgiraffe\tNN\tO\t(g<root> / --LEX--)\t$LEMMA$\t()\t3\tAPP_s\ttrue\n\
3\tlikes\t_\tlike\tVBZ\tO\t(l<root> / --LEX-- :ARG0 (s<s>) :ARG1 (o<o>))\t$LEMMA$-01\t()\t0\tROOT\ttrue\n\
4\tcars\t_\tcar\tNNS\tO\t(c<root> / --LEX--)\t$LEMMA$\t()\t3\tAPP_o\ttrue\n\
\n\
#raw:Hi\n\
1\tHi\t_\thi\tUH\tO\t(h<root> / --LEX--)\t$LEMMA$\t()\t0\tROOT\ttrue\t0:2\n";

    #[test]
    fn reads_sentences_and_attributes() {
        let sentences = read_amconll(SENTENCES).unwrap();

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].attributes["raw"], "The giraffe likes cars");
        assert_eq!(sentences[0].attributes["id"], "s1");
        assert_eq!(sentences[0].words(), vec!["The", "giraffe", "likes", "cars"]);

        let likes = &sentences[0].tokens[2];
        assert_eq!(likes.lemma.as_deref(), Some("like"));
        assert_eq!(likes.lexlabel.as_deref(), Some("$LEMMA$-01"));
        assert_eq!(likes.head, 0);
        assert_eq!(likes.label, "ROOT");
        assert!(likes.aligned);
        assert!(!sentences[0].tokens[0].has_fragment());
        assert_eq!(sentences[1].tokens.len(), 1);
    }

    #[test]
    fn assembles_read_sentence() {
        let sentences = read_amconll(SENTENCES).unwrap();
        let out = sentences[0].assemble().unwrap();

        let like = out.tree.label.as_ref().and_then(NodeLabel::as_graph).unwrap();
        assert_eq!(like.text(), Some("like-01"));
        assert_eq!(out.tree.children.len(), 2);
        assert_eq!(out.tree.children[0].incoming_edge, "APP_s");
        assert_eq!(out.alignments[".1"], 3);
        assert_eq!(out.dependency_edges.len(), 2);
    }

    #[test]
    fn empty_fragment_column_means_no_fragment() {
        let text = "1\tHi\t_\thi\tUH\tO\t(h<root> / --LEX--)\t$LEMMA$\t()\t0\tROOT\ttrue\n\
2\t!\t_\t!\t.\tO\t\t_\t_\t1\tPUNCT\ttrue\n";
        let sentences = read_amconll(text).unwrap();

        let bang = &sentences[0].tokens[1];
        assert_eq!(bang.fragment, NO_FRAGMENT);
        assert!(!bang.has_fragment());

        let out = sentences[0].assemble().unwrap();
        assert_eq!(out.tree.children.len(), 1);
        assert_eq!(out.tree.children[0].text(), Some("!"));
    }

    #[test]
    fn reports_bad_lines() {
        let err = read_amconll("1\tshort\n").unwrap_err();
        assert_eq!(err.at, 1);

        let line = "1\tx\t_\tx\tNN\tO\t_\t_\t_\tnope\tIGNORE\ttrue\n";
        let err = read_amconll(line).unwrap_err();
        assert!(err.message.contains("bad head"));

        let line = "2\tx\t_\tx\tNN\tO\t_\t_\t_\t0\tIGNORE\ttrue\n";
        let err = read_amconll(line).unwrap_err();
        assert!(err.message.contains("out of sequence"));
    }
}
