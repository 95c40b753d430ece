//! Command-line interface and session orchestration

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::client::GmailClient;
use crate::counter::CounterStore;
use crate::error::Result;
use crate::extractor::{self, ExtractedContent};
use crate::models::{EmailRecord, RunOptions};
use crate::summarizer::{self, Summarizer};

#[derive(Parser, Debug)]
#[command(name = "gmail-summarizer")]
#[command(version)]
#[command(about = "Summarize Gmail messages into local files with an LLM", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Path to OAuth2 credentials file
    #[arg(long, default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Path to token cache file
    #[arg(long, default_value = "token.json")]
    pub token_cache: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with the Gmail API
    Auth {
        /// Force re-authentication even if token exists
        #[arg(long)]
        force: bool,
    },

    /// Fetch matching messages and write one summary file per message
    Run,

    /// Generate example configuration file
    InitConfig {
        /// Path to create config file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

/// Characters invalid in common filesystem names
static INVALID_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());

/// Replace every filesystem-invalid character with an underscore, leaving
/// all other characters untouched.
pub fn sanitize_filename(name: &str) -> String {
    INVALID_FILENAME_CHARS.replace_all(name, "_").into_owned()
}

/// Marker appended to a sender whose body had to be truncated.
const TRUNCATED_MARKER: &str = "-truncated";

/// Placeholder body for messages with no extractable text.
const NO_BODY_PLACEHOLDER: &str = "(No body content)";

/// Subject line written when the header is missing.
const NO_SUBJECT_PLACEHOLDER: &str = "(No subject)";

/// Summary of one completed session.
#[derive(Debug, Clone)]
pub struct Report {
    pub run_id: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
    pub duration_seconds: i64,
    pub messages_fetched: usize,
    pub files_written: usize,
    pub bodies_truncated: usize,
    pub attachments_downloaded: usize,
}

/// Drive one full session: fetch matching messages, delete the requested
/// label if any, then summarize each message into its own file and
/// persist the advanced counter.
pub async fn run_session(
    client: &dyn GmailClient,
    summarizer: &Summarizer,
    options: &RunOptions,
    counter_store: &CounterStore,
    output_dir: &Path,
) -> Result<Report> {
    let started_at = chrono::Utc::now();
    let run_id = uuid::Uuid::new_v4().to_string();
    let mut counter = counter_store.load().await;

    tokio::fs::create_dir_all(output_dir).await?;

    println!("\nGathering emails using query: {}\n", options.search_query);
    let (emails, attachments_downloaded) = gather_emails(client, options, output_dir).await;
    println!("\nGathered {} emails.\n", emails.len());

    if let Some(label) = &options.label_to_delete {
        client.delete_label(label).await?;
    }

    let pb = ProgressBar::new(emails.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed:>6}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut files_written = 0;
    let mut bodies_truncated = 0;

    for mut email in emails.iter().cloned() {
        let (body, was_truncated) =
            summarizer::truncate_body(&options.prompt_template, &email.body);
        if was_truncated {
            email.sender = format!("{}{}", email.sender, TRUNCATED_MARKER);
            bodies_truncated += 1;
        }

        let full_prompt = format!("{}{}", options.prompt_template, body);
        // Summarization failure is not locally recovered; it ends the run
        let response = summarizer.summarize(&full_prompt).await?;

        let safe_sender = sanitize_filename(&email.sender);
        // The unmatched leading bracket is a compatibility contract with
        // files written by earlier versions of this tool
        let path = output_dir.join(format!("[{}-{}.txt", counter, safe_sender));
        let subject = email.subject.as_deref().unwrap_or(NO_SUBJECT_PLACEHOLDER);
        let contents = format!("{}\nResponse:\n{}", subject, response);

        match tokio::fs::write(&path, contents).await {
            Ok(()) => {
                files_written += 1;
                info!("Wrote summary {} to {}", counter, path.display());
            }
            // This counter slot stays consumed
            Err(e) => error!("Error writing file {}: {}", path.display(), e),
        }

        counter += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();

    counter_store.save(counter).await?;

    let completed_at = chrono::Utc::now();
    Ok(Report {
        run_id,
        started_at,
        completed_at,
        duration_seconds: (completed_at - started_at).num_seconds(),
        messages_fetched: emails.len(),
        files_written,
        bodies_truncated,
        attachments_downloaded,
    })
}

/// Fetch every matching message and reduce it to an [`EmailRecord`],
/// applying the requested label and downloading attachments along the
/// way. A listing or fetch failure is reported and yields whatever was
/// already gathered (possibly nothing).
async fn gather_emails(
    client: &dyn GmailClient,
    options: &RunOptions,
    output_dir: &Path,
) -> (Vec<EmailRecord>, usize) {
    let ids = match client.list_matching(&options.search_query).await {
        Ok(ids) => ids,
        Err(e) => {
            error!("An error occurred while listing messages: {}", e);
            return (Vec::new(), 0);
        }
    };

    if ids.is_empty() {
        println!("No new messages.");
        return (Vec::new(), 0);
    }

    let mut emails = Vec::new();
    let mut attachments_downloaded = 0;

    for id in ids {
        let fetched = match client.fetch_full(&id).await {
            Ok(msg) => msg,
            Err(e) => {
                error!("An error occurred while fetching message {}: {}", id, e);
                break;
            }
        };

        let extracted = match &fetched.payload {
            Some(node) => match extractor::extract_body_and_attachments(node) {
                Ok(extracted) => extracted,
                Err(e) => {
                    error!("An error occurred while extracting message {}: {}", id, e);
                    break;
                }
            },
            None => ExtractedContent::default(),
        };

        let subject = fetched.header("Subject").map(str::to_string);
        let sender = fetched.header("From").unwrap_or_default().to_string();

        let mut body = extracted.body;
        if extracted.attachment_count > 0 {
            body = format!(
                "This email has {} attachment(s): {}\n\n{}",
                extracted.attachment_count,
                extracted.attachment_names.join(", "),
                body
            );
        }
        if body.is_empty() {
            body = NO_BODY_PLACEHOLDER.to_string();
        }

        emails.push(EmailRecord {
            subject,
            sender,
            body,
        });

        if let Some(label) = &options.label_to_apply {
            if let Err(e) = client.apply_label(&fetched.id, label).await {
                error!("An error occurred while labeling message {}: {}", fetched.id, e);
                break;
            }
        }

        if options.download_attachments {
            match client.download_attachments(&fetched.id, output_dir).await {
                Ok(written) => attachments_downloaded += written,
                Err(e) => {
                    // Remaining messages still get their attachments
                    error!(
                        "An error occurred while downloading attachments of {}: {}",
                        fetched.id, e
                    );
                }
            }
        }
    }

    (emails, attachments_downloaded)
}
