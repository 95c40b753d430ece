//! Gmail Inbox Summarizer
//!
//! A single-operator tool that fetches Gmail messages matching a search
//! query, summarizes each message body through an LLM endpoint, and writes
//! one summary file per message to local disk.
//!
//! # Overview
//!
//! - **Authentication**: OAuth2 authentication with token caching
//! - **Fetching**: Query-driven message listing and full fetch
//! - **Extraction**: Typed recursive walk of multipart payload trees
//! - **Summarization**: Single-turn chat completion per message
//! - **Output**: Counter-numbered summary files, optional attachment download
//!
//! # Module Organization
//!
//! - [`auth`] - OAuth2 authentication and Gmail API initialization
//! - [`cli`] - Command-line interface and session orchestration
//! - [`client`] - Gmail API client surface
//! - [`config`] - Configuration management
//! - [`counter`] - Persistent run counter
//! - [`error`] - Error types and result alias
//! - [`extractor`] - Payload body and attachment extraction
//! - [`interactive`] - Interactive run option prompts
//! - [`models`] - Core data structures
//! - [`summarizer`] - LLM summarization client

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod counter;
pub mod error;
pub mod extractor;
pub mod interactive;
pub mod models;
pub mod summarizer;

// Re-export commonly used types for convenience
pub use error::{Result, SummarizeError};

// Core data models
pub use models::{EmailRecord, RunOptions, DEFAULT_PROMPT};

// Client surface
pub use client::{FetchedMessage, GmailClient, MessageHeader, ProductionGmailClient};

// Extraction types
pub use extractor::{ExtractedContent, PayloadNode};

// Summarization
pub use summarizer::{truncate_body, Summarizer, MAX_PROMPT_CHARS};

// Counter store
pub use counter::CounterStore;

// Config types
pub use config::{Config, OutputConfig, SummarizerConfig};

// CLI types (for binary usage)
pub use cli::{Cli, Commands, Report};
