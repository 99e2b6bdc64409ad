//! Typed model of a generated screen document.
//!
//! Generated content is a JSON tree the design plugin renders directly: a
//! top-level `screens` array where each screen wraps one recursive `node`
//! tree.  This module models that tree explicitly ([`DocumentNode`]) and
//! implements the canonical normalization step plus a depth-first visitor
//! used by the image-enrichment stage to find and patch image-request
//! nodes.
//!
//! Content that does not parse as a [`ScreenSet`] is treated as opaque
//! text and passed through untouched -- validity is not, by itself, a
//! generation failure.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node type marking an image-generation request.
pub const IMAGE_NODE_TYPE: &str = "image";

/// Top-level shape of a generated document: a `screens` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSet {
    pub screens: Vec<Screen>,
}

/// One screen entry wrapping its root node tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_type: Option<String>,
    pub node: DocumentNode,
    /// Unknown screen-level fields, preserved across re-serialization.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node in the recursive document tree.
///
/// Only the fields the pipeline inspects are typed; all styling and
/// layout properties ride along in `props` so normalization is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Image-generation prompt (image-request nodes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Resolved image URI, injected by the enrichment stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,
    /// Remaining properties (size, layout, style, ...), untouched.
    #[serde(flatten)]
    pub props: Map<String, Value>,
}

impl DocumentNode {
    /// Whether this node asks for a generated image: an `image` node
    /// carrying a prompt whose URI has not been resolved yet.
    pub fn is_image_request(&self) -> bool {
        self.node_type == IMAGE_NODE_TYPE && self.prompt.is_some() && self.url.is_none()
    }
}

/// Strip a single markdown code fence (```json ... ``` or ``` ... ```)
/// wrapping the payload, if present.  Providers frequently fence their
/// JSON output even when told not to.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the optional language tag on the opening fence line.
    match body.split_once('\n') {
        Some((_lang, payload)) => payload.trim(),
        None => body.trim(),
    }
}

/// Parse raw generated output into a [`ScreenSet`].
pub fn try_parse(raw: &str) -> Result<ScreenSet, serde_json::Error> {
    serde_json::from_str(strip_code_fences(raw))
}

/// Normalize raw generated output to its canonical form.
///
/// Structurally valid documents are re-serialized to compact JSON so
/// persisted content is stable regardless of provider whitespace or
/// fencing.  Anything else is returned verbatim and treated as opaque by
/// downstream consumers.  Idempotent: `normalize(normalize(x)) ==
/// normalize(x)`.
pub fn normalize(raw: &str) -> String {
    match try_parse(raw) {
        Ok(doc) => serde_json::to_string(&doc).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

/// Visit every node of a tree depth-first, parents before children.
pub fn walk<'a, F: FnMut(&'a DocumentNode)>(node: &'a DocumentNode, f: &mut F) {
    f(node);
    for child in &node.children {
        walk(child, f);
    }
}

/// Mutable depth-first visit, parents before children.
pub fn walk_mut<F: FnMut(&mut DocumentNode)>(node: &mut DocumentNode, f: &mut F) {
    f(node);
    for child in &mut node.children {
        walk_mut(child, f);
    }
}

impl ScreenSet {
    /// Collect the prompts of all unresolved image-request nodes, in
    /// visit order.  This order is the contract for URI injection: the
    /// first generated URI belongs to the first collected node.
    pub fn collect_image_prompts(&self) -> Vec<String> {
        let mut prompts = Vec::new();
        for screen in &self.screens {
            walk(&screen.node, &mut |node| {
                if node.is_image_request() {
                    if let Some(prompt) = &node.prompt {
                        prompts.push(prompt.clone());
                    }
                }
            });
        }
        prompts
    }

    /// Inject resolved image URIs into image-request nodes, first URI to
    /// first node in the same visit order as [`collect_image_prompts`].
    ///
    /// When fewer URIs are available than nodes requested, the trailing
    /// nodes are left unresolved.  Returns the number of nodes patched.
    pub fn inject_image_urls(&mut self, urls: &mut VecDeque<String>) -> usize {
        let mut patched = 0;
        for screen in &mut self.screens {
            walk_mut(&mut screen.node, &mut |node| {
                if node.is_image_request() {
                    if let Some(url) = urls.pop_front() {
                        node.url = Some(url);
                        patched += 1;
                    }
                }
            });
        }
        patched
    }
}
