//! Gmail API client surface consumed by the summarization session

use async_trait::async_trait;
use google_gmail1::api::{Label, ModifyMessageRequest};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::auth::GmailHub;
use crate::error::{Result, SummarizeError};
use crate::extractor::{self, PayloadNode};

const SCOPE: &str = "https://www.googleapis.com/auth/gmail.modify";

/// One message header, preserved verbatim from the API response.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageHeader {
    pub name: String,
    pub value: String,
}

/// A fully fetched message: payload tree plus header list.
#[derive(Debug, Clone)]
pub struct FetchedMessage {
    pub id: String,
    pub payload: Option<PayloadNode>,
    pub headers: Vec<MessageHeader>,
}

impl FetchedMessage {
    /// Look up a header value by name (case-insensitive); absent headers
    /// yield `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// Trait defining the mailbox operations the session drives, split out
/// for easier testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GmailClient: Send + Sync {
    /// List ids of inbox messages matching a search query. Zero matches
    /// is not an error.
    async fn list_matching(&self, query: &str) -> Result<Vec<String>>;

    /// Fetch a message in full, exposing its payload tree and headers.
    async fn fetch_full(&self, id: &str) -> Result<FetchedMessage>;

    /// Apply a label to a message, creating the label by name first if it
    /// does not exist. Safe to call once per message per run.
    async fn apply_label(&self, message_id: &str, label_name: &str) -> Result<()>;

    /// Delete a label by name. Returns false when no such label exists
    /// (reported, not an error).
    async fn delete_label(&self, label_name: &str) -> Result<bool>;

    /// Download every attachment of a message into `dest_dir`, creating
    /// the directory if absent. Returns the number of files written.
    async fn download_attachments(&self, message_id: &str, dest_dir: &Path) -> Result<usize>;
}

/// Production Gmail client over an authenticated hub. Calls are strictly
/// sequential; each blocks until the server answers.
pub struct ProductionGmailClient {
    hub: GmailHub,
}

impl ProductionGmailClient {
    pub fn new(hub: GmailHub) -> Self {
        Self { hub }
    }

    async fn find_label_id(&self, label_name: &str) -> Result<Option<String>> {
        let (_, response) = self
            .hub
            .users()
            .labels_list("me")
            .add_scope(SCOPE)
            .doit()
            .await?;

        Ok(response
            .labels
            .unwrap_or_default()
            .into_iter()
            .find(|label| label.name.as_deref() == Some(label_name))
            .and_then(|label| label.id))
    }

    async fn get_or_create_label(&self, label_name: &str) -> Result<String> {
        if let Some(id) = self.find_label_id(label_name).await? {
            return Ok(id);
        }

        let label = Label {
            name: Some(label_name.to_string()),
            message_list_visibility: Some("show".to_string()),
            label_list_visibility: Some("labelShow".to_string()),
            ..Default::default()
        };

        let (_, created) = self
            .hub
            .users()
            .labels_create(label, "me")
            .add_scope(SCOPE)
            .doit()
            .await?;

        info!("Created label '{}'", label_name);
        created
            .id
            .ok_or_else(|| SummarizeError::LabelError("Created label has no ID".to_string()))
    }

    /// Resolve the bytes of one attachment part: inline data wins, else
    /// fetch by attachment id. `None` when neither is available or the
    /// fetch fails (reported, part skipped).
    async fn resolve_attachment_bytes(
        &self,
        message_id: &str,
        part: &extractor::AttachmentPart,
    ) -> Option<Vec<u8>> {
        if let Some(data) = &part.data {
            return Some(data.clone());
        }

        let attachment_id = part.attachment_id.as_deref()?;
        match self
            .hub
            .users()
            .messages_attachments_get("me", message_id, attachment_id)
            .add_scope(SCOPE)
            .doit()
            .await
        {
            Ok((_, body)) => body.data,
            Err(e) => {
                warn!(
                    "Failed to fetch attachment '{}' of message {}: {}",
                    part.filename,
                    message_id,
                    SummarizeError::from(e)
                );
                None
            }
        }
    }
}

#[async_trait]
impl GmailClient for ProductionGmailClient {
    async fn list_matching(&self, query: &str) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut call = self
                .hub
                .users()
                .messages_list("me")
                .add_label_ids("INBOX")
                .q(query);

            if let Some(token) = page_token.as_ref() {
                call = call.page_token(token);
            }

            let (_, response) = call
                .add_scope(SCOPE)
                .doit()
                .await?;

            if let Some(messages) = response.messages {
                ids.extend(messages.into_iter().filter_map(|m| m.id));
            }

            page_token = response.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        debug!("Query matched {} messages", ids.len());
        Ok(ids)
    }

    async fn fetch_full(&self, id: &str) -> Result<FetchedMessage> {
        let (_, msg) = self
            .hub
            .users()
            .messages_get("me", id)
            .format("full")
            .add_scope(SCOPE)
            .doit()
            .await?;

        let message_id = msg.id.unwrap_or_else(|| id.to_string());
        let mut headers = Vec::new();
        let payload = msg.payload.map(|mut part| {
            for header in part.headers.take().unwrap_or_default() {
                if let (Some(name), Some(value)) = (header.name, header.value) {
                    headers.push(MessageHeader { name, value });
                }
            }
            PayloadNode::from_part(part)
        });

        Ok(FetchedMessage {
            id: message_id,
            payload,
            headers,
        })
    }

    async fn apply_label(&self, message_id: &str, label_name: &str) -> Result<()> {
        let label_id = self.get_or_create_label(label_name).await?;

        let request = ModifyMessageRequest {
            add_label_ids: Some(vec![label_id]),
            remove_label_ids: None,
        };

        self.hub
            .users()
            .messages_modify(request, "me", message_id)
            .add_scope(SCOPE)
            .doit()
            .await?;

        debug!("Applied label '{}' to message {}", label_name, message_id);
        Ok(())
    }

    async fn delete_label(&self, label_name: &str) -> Result<bool> {
        match self.find_label_id(label_name).await? {
            Some(label_id) => {
                self.hub
                    .users()
                    .labels_delete("me", &label_id)
                    .add_scope(SCOPE)
                    .doit()
                    .await?;

                info!("Label '{}' deleted.", label_name);
                Ok(true)
            }
            None => {
                info!("Label '{}' not found. Nothing to delete.", label_name);
                Ok(false)
            }
        }
    }

    async fn download_attachments(&self, message_id: &str, dest_dir: &Path) -> Result<usize> {
        let (_, msg) = self
            .hub
            .users()
            .messages_get("me", message_id)
            .format("full")
            .add_scope(SCOPE)
            .doit()
            .await?;

        let root = match msg.payload {
            Some(payload) => PayloadNode::from_part(payload),
            None => return Ok(0),
        };

        let mut written = 0;
        for part in extractor::collect_attachment_parts(&root) {
            let Some(bytes) = self.resolve_attachment_bytes(message_id, &part).await else {
                continue;
            };

            tokio::fs::create_dir_all(dest_dir).await?;
            let path = unique_destination(dest_dir, &part.filename).await;
            tokio::fs::write(&path, &bytes).await?;
            debug!("Saved attachment to {}", path.display());
            written += 1;
        }

        Ok(written)
    }
}

/// Pick a path in `dir` for `filename` that does not collide with an
/// existing file, appending `_1`, `_2`, ... before the extension until an
/// unused name is found.
pub async fn unique_destination(dir: &Path, filename: &str) -> PathBuf {
    let mut path = dir.join(filename);
    let (stem, ext) = split_filename(filename);
    let mut count = 1;

    while tokio::fs::try_exists(&path).await.unwrap_or(false) {
        path = dir.join(format!("{}_{}{}", stem, count, ext));
        count += 1;
    }
    path
}

/// Split a filename into (stem, extension-with-dot). A leading dot alone
/// does not start an extension.
fn split_filename(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename.split_at(idx),
        _ => (filename, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_split_filename() {
        assert_eq!(split_filename("report.pdf"), ("report", ".pdf"));
        assert_eq!(split_filename("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_filename("README"), ("README", ""));
        assert_eq!(split_filename(".bashrc"), (".bashrc", ""));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let msg = FetchedMessage {
            id: "m1".to_string(),
            payload: None,
            headers: vec![
                MessageHeader {
                    name: "Subject".to_string(),
                    value: "Hello".to_string(),
                },
                MessageHeader {
                    name: "From".to_string(),
                    value: "alice@example.com".to_string(),
                },
            ],
        };

        assert_eq!(msg.header("subject"), Some("Hello"));
        assert_eq!(msg.header("FROM"), Some("alice@example.com"));
        assert_eq!(msg.header("Date"), None);
    }

    #[tokio::test]
    async fn test_unique_destination_avoids_collisions() {
        let dir = tempdir().unwrap();

        let first = unique_destination(dir.path(), "data.csv").await;
        assert_eq!(first, dir.path().join("data.csv"));
        tokio::fs::write(&first, b"one").await.unwrap();

        let second = unique_destination(dir.path(), "data.csv").await;
        assert_eq!(second, dir.path().join("data_1.csv"));
        tokio::fs::write(&second, b"two").await.unwrap();

        let third = unique_destination(dir.path(), "data.csv").await;
        assert_eq!(third, dir.path().join("data_2.csv"));

        // The first file is untouched
        assert_eq!(tokio::fs::read(&first).await.unwrap(), b"one");
    }

    #[tokio::test]
    async fn test_unique_destination_without_extension() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("notes"), b"x").await.unwrap();

        let path = unique_destination(dir.path(), "notes").await;
        assert_eq!(path, dir.path().join("notes_1"));
    }
}
