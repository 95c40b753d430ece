//! Common test utilities and fixtures

use async_trait::async_trait;
use gmail_summarizer::client::{FetchedMessage, GmailClient, MessageHeader};
use gmail_summarizer::error::{Result, SummarizeError};
use gmail_summarizer::extractor::PayloadNode;
use serde_json::json;
use std::path::Path;
use std::sync::Mutex;

/// In-memory stand-in for the Gmail API, recording the label operations
/// the session performs against it.
pub struct StubGmailClient {
    messages: Vec<FetchedMessage>,
    existing_labels: Vec<String>,
    pub labels_applied: Mutex<Vec<(String, String)>>,
    pub labels_deleted: Mutex<Vec<String>>,
}

impl StubGmailClient {
    pub fn new(messages: Vec<FetchedMessage>) -> Self {
        Self {
            messages,
            existing_labels: Vec::new(),
            labels_applied: Mutex::new(Vec::new()),
            labels_deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.existing_labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }
}

#[async_trait]
impl GmailClient for StubGmailClient {
    async fn list_matching(&self, _query: &str) -> Result<Vec<String>> {
        Ok(self.messages.iter().map(|m| m.id.clone()).collect())
    }

    async fn fetch_full(&self, id: &str) -> Result<FetchedMessage> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| SummarizeError::MessageNotFound(id.to_string()))
    }

    async fn apply_label(&self, message_id: &str, label_name: &str) -> Result<()> {
        self.labels_applied
            .lock()
            .unwrap()
            .push((message_id.to_string(), label_name.to_string()));
        Ok(())
    }

    async fn delete_label(&self, label_name: &str) -> Result<bool> {
        let exists = self.existing_labels.iter().any(|l| l == label_name);
        if exists {
            self.labels_deleted.lock().unwrap().push(label_name.to_string());
        }
        Ok(exists)
    }

    async fn download_attachments(&self, _message_id: &str, _dest_dir: &Path) -> Result<usize> {
        Ok(0)
    }
}

/// Build a plain-text message with Subject and From headers.
pub fn plain_message(id: &str, from: &str, subject: &str, body: &str) -> FetchedMessage {
    FetchedMessage {
        id: id.to_string(),
        payload: Some(PayloadNode::Leaf {
            mime_type: "text/plain".to_string(),
            body_data: Some(body.as_bytes().to_vec()),
            filename: None,
            attachment_id: None,
        }),
        headers: vec![
            MessageHeader {
                name: "From".to_string(),
                value: from.to_string(),
            },
            MessageHeader {
                name: "Subject".to_string(),
                value: subject.to_string(),
            },
        ],
    }
}

/// Minimal chat-completion response body the summarizer accepts.
pub fn completion_json(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1700000000u32,
        "model": "llama3-8b-8192",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}
