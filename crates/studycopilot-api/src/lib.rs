//! # studycopilot-api
//!
//! HTTP client for the external study-copilot backend. The backend owns all
//! retrieval and answering; this crate only knows how to reach it.
//!
//! Two deployments exist with different endpoint contracts, selected through
//! [`EndpointProfile`]:
//!
//! - `Ingest`: `/ingest/pdf`, `/ingest/web`, `/query`
//! - `Chat`: `/upload_pdf`, `/chat_or_ingest`, `/chat`
//!
//! ## Example
//!
//! ```rust,no_run
//! use studycopilot_api::{Backend, BackendClient, EndpointProfile, reply_text};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = BackendClient::new("http://localhost:8000", EndpointProfile::Ingest);
//!     let answer = reply_text(client.send("What is a B-tree?").await);
//!     println!("{}", answer);
//! }
//! ```

pub mod client;
pub mod error;
pub mod profile;
pub mod wire;

use async_trait::async_trait;

pub use reqwest::StatusCode;

pub use client::BackendClient;
pub use error::{reply_text, BackendError};
pub use profile::EndpointProfile;
pub use wire::{AnswerReply, IngestReply};

/// Operations the chat front-end needs from a backend deployment
#[async_trait]
pub trait Backend: Send + Sync {
    /// Upload a PDF document for ingestion
    async fn upload_pdf(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), BackendError>;

    /// Forward a chat input and return the text to show as the answer
    async fn send(&self, input: &str) -> Result<String, BackendError>;

    /// Short human readable description, shown in the session banner
    fn describe(&self) -> String;
}
