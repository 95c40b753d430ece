use serde::{Deserialize, Serialize};

/// Default prompt sent to the LLM ahead of each email body.
pub const DEFAULT_PROMPT: &str =
    "This is the body of an email.\nPlease summarise what it is about by main topic/subject/reason.\n";

/// Options for a single summarization run, collected once up front
/// and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Gmail search query, e.g. "is:unread from:example@gmail.com"
    pub search_query: String,
    /// Label to apply to every handled message, if any
    pub label_to_apply: Option<String>,
    /// Label to delete from the mailbox before processing, if any
    pub label_to_delete: Option<String>,
    /// Whether to download attachments of handled messages
    pub download_attachments: bool,
    /// Prompt prepended to each email body for summarization
    pub prompt_template: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            label_to_apply: None,
            label_to_delete: None,
            download_attachments: false,
            prompt_template: DEFAULT_PROMPT.to_string(),
        }
    }
}

/// One fetched message reduced to the fields the summarization loop needs.
/// Consumed once to produce one output file; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailRecord {
    pub subject: Option<String>,
    pub sender: String,
    pub body: String,
}
