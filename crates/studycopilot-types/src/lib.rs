//! Core types and structures for studycopilot
//!
//! This crate provides the session state shared by the backend client and the
//! interactive front-end.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub mod history;

pub use history::{ChatHistory, ChatTurn, HistoryError, Role};

// ============================================================================
// Constants
// ============================================================================

/// Backend deployment used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "https://aigenesisver2-production.up.railway.app";

/// Deadline for a PDF upload
pub const PDF_UPLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline for a web page ingestion request
pub const WEB_INGEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Deadline for a question
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Delay between two revealed characters of an answer
pub const DEFAULT_TYPING_DELAY_MS: u64 = 15;

pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const MAX_TEMPERATURE: f32 = 2.0;

pub const PAGE_TITLE: &str = "🤖 AI Study & Research Copilot";
pub const TAGLINE: &str = "Chat with Everything You Learn.";

// ============================================================================
// User-facing messages
// ============================================================================

pub const MSG_NO_ANSWER: &str = "❌ No answer returned.";
pub const MSG_INVALID_JSON: &str = "❌ Invalid JSON response from backend.";
pub const MSG_PDF_UPLOADED: &str = "PDF uploaded & processed successfully!";
pub const MSG_PDF_CLEARED: &str = "PDF cleared. You can re-upload another.";

/// Answer shown when the backend could not be reached
pub fn cannot_reach_backend(error: &impl fmt::Display) -> String {
    format!("❌ Cannot reach backend. ({})", error)
}

/// Status shown when a PDF upload failed
pub fn upload_failed(error: &impl fmt::Display) -> String {
    format!("Could not reach backend. ({})", error)
}

/// Answer shown after a web page was ingested
pub fn web_ingested(source: &str) -> String {
    format!("✅ Web content ingested: {}", source)
}

// ============================================================================
// Model options
// ============================================================================

/// Models offered in the options panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelChoice {
    #[default]
    Groq,
    OpenAI,
    Gemini,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 3] = [ModelChoice::Groq, ModelChoice::OpenAI, ModelChoice::Gemini];

    /// Parse a model name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "openai" | "open-ai" | "gpt" => Some(Self::OpenAI),
            "gemini" | "google" => Some(Self::Gemini),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Groq => "Groq",
            Self::OpenAI => "OpenAI",
            Self::Gemini => "Gemini",
        }
    }

    /// Comma separated list of all model names, for help and error output
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(|m| m.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Options mapping kept with the session. It is displayed and persisted but
/// never sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmOptions {
    pub model: ModelChoice,
    pub temperature: f32,
}

impl Default for LlmOptions {
    fn default() -> Self {
        Self {
            model: ModelChoice::default(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl LlmOptions {
    pub fn set_temperature(&mut self, temperature: f32) -> anyhow::Result<()> {
        if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
            anyhow::bail!(
                "Temperature must be between 0.0 and {:.1}, got {}",
                MAX_TEMPERATURE,
                temperature
            );
        }
        self.temperature = temperature;
        Ok(())
    }
}

// ============================================================================
// Input classification
// ============================================================================

/// What a chat input is forwarded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Ingest the linked web page
    Link,
    /// Ask the question-answering endpoint
    Question,
}

impl InputKind {
    pub fn classify(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            InputKind::Link
        } else {
            InputKind::Question
        }
    }
}

// ============================================================================
// Session state
// ============================================================================

/// Everything remembered for the lifetime of one chat session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub chat_history: ChatHistory,
    pub pdf_uploaded: bool,
    pub options: LlmOptions,
    pub last_input_sent: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for a repeat of the previous submission. Otherwise the
    /// input becomes the last one sent.
    pub fn should_send(&mut self, input: &str) -> bool {
        if input == self.last_input_sent {
            return false;
        }
        self.last_input_sent = input.to_string();
        true
    }

    pub fn mark_pdf_uploaded(&mut self) {
        self.pdf_uploaded = true;
    }

    /// Returns whether a PDF was loaded before clearing
    pub fn clear_pdf(&mut self) -> bool {
        std::mem::replace(&mut self.pdf_uploaded, false)
    }
}
