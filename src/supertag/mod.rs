//! Supertag lexicalization: fill a per-token graph fragment with the token's
//! words so it reads as a plain PENMAN graph.
//!
//! Example (lexical label "like-01"):
//!   (r<root> / --LEX--  :ARG0 (s<s>))  =>  (r / like-01  :ARG0 (s / <s>))
//!
//! The rewriting steps, in order:
//! 1) `--LEX--` becomes the lexical label (or the surface form without one)
//! 2) `$LEMMA$` becomes the lemma, `$FORM$` the surface form
//! 3) the `<root>` marker is dropped
//! 4) each source marker `<s>` becomes the concept of its node: ` / <s>`
//!
//! A placeholder without a value stays in the text. Running the rewrite on its
//! own output changes nothing.

use crate::Result;
use crate::canon::canonicalize;
use crate::graph::decode;
use crate::node::Node;
use anyhow::Context;
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::warn;

pub const LEX_PLACEHOLDER: &str = "--LEX--";
pub const LEMMA_PLACEHOLDER: &str = "$LEMMA$";
pub const FORM_PLACEHOLDER: &str = "$FORM$";
pub const ROOT_MARKER: &str = "<root>";

/// Fragment column value of tokens that contribute no graph.
pub const NO_FRAGMENT: &str = "_";

/// The words of one token available for substitution.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalForms<'a> {
    pub form: &'a str,
    pub lemma: Option<&'a str>,
    pub lexlabel: Option<&'a str>,
}

fn source_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 1) an already inserted "/ " in front of the marker
    // 2) the marker itself
    RE.get_or_init(|| Regex::new(r"(/\s*)?(<[A-Za-z0-9_]+>)").expect("source regex is valid"))
}

pub fn lexicalize(fragment: &str, forms: &LexicalForms) -> String {
    let mut out = fragment.replace(LEX_PLACEHOLDER, forms.lexlabel.unwrap_or(forms.form));

    if out.contains(LEMMA_PLACEHOLDER) {
        match forms.lemma {
            Some(lemma) => out = out.replace(LEMMA_PLACEHOLDER, lemma),
            None => warn!(form = forms.form, "no lemma for {} placeholder", LEMMA_PLACEHOLDER),
        }
    }
    out = out.replace(FORM_PLACEHOLDER, forms.form);

    out = out.replace(ROOT_MARKER, "");

    source_re()
        .replace_all(&out, |caps: &Captures| match caps.get(1) {
            Some(_) => caps[0].to_string(),
            None => format!(" / {}", &caps[2]),
        })
        .into_owned()
}

/// Lexicalize a fragment and canonicalize the resulting graph.
pub fn fragment_tree(fragment: &str, forms: &LexicalForms) -> Result<Node> {
    let text = lexicalize(fragment, forms);
    let graph = decode(&text).with_context(|| format!("decode fragment {:?}", text))?;
    let tree = canonicalize(&graph).with_context(|| format!("canonicalize fragment {:?}", text))?;
    Ok(tree)
}
