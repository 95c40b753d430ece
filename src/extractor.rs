//! Extraction of body text and attachment manifests from message payload trees
//!
//! Gmail delivers a message body as a tree of MIME parts. This module
//! re-expresses that loosely-structured payload as a typed recursive
//! variant and walks it depth-first, preferring plain text over HTML and
//! collecting attachment filenames along the way.

use google_gmail1::api::MessagePart;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SummarizeError};

/// One node of a message payload tree: either a leaf part carrying
/// content, or a container holding an ordered sequence of child parts.
/// A container can itself name an attachment (e.g. a forwarded message
/// with a filename), so both variants carry the attachment fields.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadNode {
    Leaf {
        mime_type: String,
        /// Part body bytes as delivered by the API layer (already
        /// base64url-decoded during deserialization)
        body_data: Option<Vec<u8>>,
        filename: Option<String>,
        attachment_id: Option<String>,
    },
    Container {
        children: Vec<PayloadNode>,
        filename: Option<String>,
        attachment_id: Option<String>,
    },
}

impl PayloadNode {
    /// Convert a raw Gmail API part into the typed tree. A part with a
    /// `parts` list is a container even when the list is empty; empty
    /// filenames are normalized to `None`.
    pub fn from_part(part: MessagePart) -> Self {
        let filename = part.filename.filter(|name| !name.is_empty());
        let (body_data, attachment_id) = match part.body {
            Some(body) => (body.data, body.attachment_id),
            None => (None, None),
        };

        match part.parts {
            Some(parts) => PayloadNode::Container {
                children: parts.into_iter().map(PayloadNode::from_part).collect(),
                filename,
                attachment_id,
            },
            None => PayloadNode::Leaf {
                mime_type: part.mime_type.unwrap_or_default(),
                body_data,
                filename,
                attachment_id,
            },
        }
    }
}

/// Result of walking one payload tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedContent {
    /// Cleaned body text; empty when the message carries none
    pub body: String,
    pub attachment_count: usize,
    /// Attachment filenames in traversal order
    pub attachment_names: Vec<String>,
}

/// An attachment-bearing part located anywhere in a payload tree, with
/// whichever of inline data or attachment id the part carried.
#[derive(Debug, Clone)]
pub struct AttachmentPart {
    pub filename: String,
    pub data: Option<Vec<u8>>,
    pub attachment_id: Option<String>,
}

/// Walk a payload tree and return its body text plus attachment manifest.
///
/// Precedence rules, applied per container in child order:
/// - a plain-text leaf unconditionally replaces the running body candidate;
/// - an HTML leaf is adopted only while no candidate is set;
/// - a non-empty body from a recursed-into child container replaces the
///   running candidate, even one found earlier at this level.
///
/// The final body is stripped of markup and whitespace-collapsed.
pub fn extract_body_and_attachments(node: &PayloadNode) -> Result<ExtractedContent> {
    let mut body = String::new();
    let mut attachment_count = 0;
    let mut attachment_names = Vec::new();

    match node {
        PayloadNode::Leaf { body_data, .. } => {
            // Single-part message: the root leaf is the whole body
            if let Some(data) = body_data {
                body = decode_text(data)?;
            }
        }
        PayloadNode::Container { children, .. } => {
            walk_children(children, &mut body, &mut attachment_count, &mut attachment_names)?;
        }
    }

    Ok(ExtractedContent {
        body: clean_markup(&body),
        attachment_count,
        attachment_names,
    })
}

fn walk_children(
    children: &[PayloadNode],
    body: &mut String,
    attachment_count: &mut usize,
    attachment_names: &mut Vec<String>,
) -> Result<()> {
    for child in children {
        match child {
            PayloadNode::Leaf {
                mime_type,
                body_data,
                filename,
                ..
            } => match (mime_type.as_str(), body_data) {
                ("text/plain", Some(data)) => *body = decode_text(data)?,
                // No plain text seen yet; fall back to HTML
                ("text/html", Some(data)) if body.is_empty() => *body = decode_text(data)?,
                _ => {
                    if let Some(name) = filename {
                        attachment_names.push(name.clone());
                        *attachment_count += 1;
                    }
                }
            },
            PayloadNode::Container {
                children: nested,
                filename,
                ..
            } => {
                if let Some(name) = filename {
                    attachment_names.push(name.clone());
                    *attachment_count += 1;
                }

                let mut nested_body = String::new();
                walk_children(nested, &mut nested_body, attachment_count, attachment_names)?;
                // The deepest nested body wins over siblings already seen
                if !nested_body.is_empty() {
                    *body = nested_body;
                }
            }
        }
    }
    Ok(())
}

/// Collect every attachment-bearing part in the tree, root included,
/// in depth-first document order.
pub fn collect_attachment_parts(node: &PayloadNode) -> Vec<AttachmentPart> {
    let mut parts = Vec::new();
    collect_into(node, &mut parts);
    parts
}

fn collect_into(node: &PayloadNode, out: &mut Vec<AttachmentPart>) {
    match node {
        PayloadNode::Leaf {
            filename: Some(name),
            body_data,
            attachment_id,
            ..
        } => out.push(AttachmentPart {
            filename: name.clone(),
            data: body_data.clone(),
            attachment_id: attachment_id.clone(),
        }),
        PayloadNode::Leaf { .. } => {}
        PayloadNode::Container {
            children,
            filename,
            attachment_id,
        } => {
            if let Some(name) = filename {
                out.push(AttachmentPart {
                    filename: name.clone(),
                    data: None,
                    attachment_id: attachment_id.clone(),
                });
            }
            for child in children {
                collect_into(child, out);
            }
        }
    }
}

fn decode_text(data: &[u8]) -> Result<String> {
    String::from_utf8(data.to_vec()).map_err(|e| {
        SummarizeError::InvalidMessageFormat(format!("part body is not valid UTF-8: {}", e))
    })
}

static STYLE_BLOCKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static SCRIPT_BLOCKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip `<style>`/`<script>` elements with their content and all other
/// tags, then collapse whitespace runs into single spaces and trim.
pub fn clean_markup(raw: &str) -> String {
    let text = STYLE_BLOCKS.replace_all(raw, "");
    let text = SCRIPT_BLOCKS.replace_all(&text, "");
    let text = TAGS.replace_all(&text, "");
    WHITESPACE_RUNS.replace_all(&text, " ").trim().to_string()
}
