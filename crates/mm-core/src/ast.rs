//! AST boundary types for the upstream markdown parser.
//!
//! The engine never tokenizes markdown itself — it consumes `{content,
//! children[]}` values produced by an external parser (see `markdown` for
//! the in-repo adapter). Content arrives in one of three known shapes,
//! modeled as a tagged union with one extraction arm per shape instead of
//! ad hoc property probing: a plain string, a list of fragments, or a
//! wrapper object carrying its text under a `content`, `t`, or `v` key.

use crate::sanitize::sanitize_label;
use serde::{Deserialize, Serialize};

/// A node in the upstream parser's AST.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AstNode {
    /// The raw content fragment, if the node carries text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<AstContent>,

    /// Child nodes in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstNode>,
}

impl AstNode {
    /// A text-bearing node with no children.
    pub fn text(s: impl Into<String>) -> Self {
        Self {
            content: Some(AstContent::Text(s.into())),
            children: Vec::new(),
        }
    }

    /// The node's sanitized display label ("" when it has no content).
    #[must_use]
    pub fn label(&self) -> String {
        match &self.content {
            Some(content) => sanitize_label(&extract_text(content)),
            None => String::new(),
        }
    }
}

/// The known shapes a parser node's content arrives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AstContent {
    /// A plain string fragment.
    Text(String),
    /// A list of fragments, concatenated in order.
    Many(Vec<AstContent>),
    /// A wrapper object with an alternate text key.
    Wrapped(AstWrapper),
}

/// Wrapper shape: exactly one of `content`/`t`/`v` is expected to be set;
/// when several are, they are consulted in that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AstWrapper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Box<AstContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<Box<AstContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<Box<AstContent>>,
}

/// Recursively flatten a content fragment to its raw text.
#[must_use]
pub fn extract_text(content: &AstContent) -> String {
    match content {
        AstContent::Text(s) => s.clone(),
        AstContent::Many(parts) => parts.iter().map(extract_text).collect(),
        AstContent::Wrapped(w) => w
            .content
            .as_deref()
            .or(w.t.as_deref())
            .or(w.v.as_deref())
            .map(extract_text)
            .unwrap_or_default(),
    }
}
