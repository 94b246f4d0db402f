//! Study Copilot application library
//!
//! Session bookkeeping and the `Copilot` struct driving one chat session.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// Re-export workspace crates
pub use studycopilot_api::{self as api, Backend, BackendClient, EndpointProfile};
pub use studycopilot_logging::{self as logging, ConversationLogger};
pub use studycopilot_types::{self as types, InputKind, LlmOptions, ModelChoice, SessionState};

// Local modules
pub mod app;
pub mod cli;
pub mod config;
pub mod render;
pub mod state;
pub mod typing;

#[cfg(test)]
mod session_tests;

pub use app::{run_repl_mode, setup_from_cli};
pub use cli::{Cli, Commands};
pub use config::{ClientConfig, FileConfig};
pub use render::TerminalRenderer;
pub use typing::TypingAnimation;

/// Result of a PDF upload attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Backend accepted the file; carries the file name
    Uploaded(String),
    /// Backend could not be reached or rejected the file; carries the message to show
    Failed(String),
}

/// One chat session against a backend deployment
pub struct Copilot {
    pub state: SessionState,
    pub backend: Box<dyn Backend>,
    pub logger: Option<ConversationLogger>,
    pub renderer: TerminalRenderer,
    pub typing_delay: Duration,
    pub animate: bool,
}

impl Copilot {
    pub fn new(backend: Box<dyn Backend>, options: LlmOptions) -> Self {
        let mut state = SessionState::new();
        state.options = options;
        Self {
            state,
            backend,
            logger: None,
            renderer: TerminalRenderer::default(),
            typing_delay: Duration::from_millis(types::DEFAULT_TYPING_DELAY_MS),
            animate: true,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let client = BackendClient::new(&config.backend_url, config.profile).with_verbose(config.verbose);
        let mut copilot = Self::new(Box::new(client), config.options.clone());
        copilot.renderer = TerminalRenderer::from_env();
        copilot.typing_delay = config.typing_delay;
        copilot.animate = config.animate;
        copilot
    }

    fn model_name(&self) -> &'static str {
        self.state.options.model.display_name()
    }

    /// Send one chat input and reveal the answer on `out`.
    ///
    /// Returns `None` when the input is empty or repeats the previous
    /// submission; nothing is sent in that case. Backend failures are not
    /// errors here: they become the answer text.
    ///
    /// If writing to `out` fails, the turn is rolled back so the same input
    /// can be sent again.
    pub async fn submit<W: Write>(
        &mut self,
        input: &str,
        out: &mut W,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<String>> {
        let input = input.trim();
        let previous_input = self.state.last_input_sent.clone();
        if input.is_empty() || !self.state.should_send(input) {
            return Ok(None);
        }

        let turns_before = self.state.chat_history.len();
        match self.exchange(input, out, cancel).await {
            Ok(answer) => Ok(Some(answer)),
            Err(e) => {
                self.state.chat_history.truncate(turns_before);
                self.state.last_input_sent = previous_input;
                Err(e)
            }
        }
    }

    async fn exchange<W: Write>(
        &mut self,
        input: &str,
        out: &mut W,
        cancel: Option<&CancellationToken>,
    ) -> Result<String> {
        self.state.chat_history.push_user(input);
        writeln!(out, "{}", self.renderer.user_bubble(input))?;
        if let Some(logger) = &mut self.logger {
            logger.log("user", input, Some(self.state.options.model.display_name())).await;
        }

        write!(out, "{}", "⏳ Thinking...".bright_black())?;
        out.flush()?;
        let answer = api::reply_text(self.backend.send(input).await);
        // Erase the status line
        write!(out, "\r\x1b[2K")?;

        let index = self.state.chat_history.push_placeholder();
        writeln!(out, "{}", self.renderer.assistant_header())?;
        let body = self.renderer.assistant_body(&answer);
        if self.animate {
            TypingAnimation::new(&body, self.typing_delay)
                .play(out, cancel)
                .await?;
        } else {
            write!(out, "{}", body)?;
        }
        writeln!(out)?;
        out.flush()?;

        self.state.chat_history.fill(index, answer.clone())?;
        let model = self.model_name();
        if let Some(logger) = &mut self.logger {
            logger.log("assistant", &answer, Some(model)).await;
        }

        Ok(answer)
    }

    /// Upload a PDF file. Only files with a `.pdf` extension are accepted.
    pub async fn upload_pdf(&mut self, path: &Path) -> Result<UploadOutcome> {
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            anyhow::bail!("Only PDF files can be uploaded: {}", path.display());
        }

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.pdf".to_string());

        let outcome = match self.backend.upload_pdf(&file_name, bytes).await {
            Ok(()) => {
                self.state.mark_pdf_uploaded();
                UploadOutcome::Uploaded(file_name)
            }
            Err(e) => UploadOutcome::Failed(types::upload_failed(&e)),
        };

        if let Some(logger) = &mut self.logger {
            match &outcome {
                UploadOutcome::Uploaded(name) => logger.log_event("pdf_upload", name).await,
                UploadOutcome::Failed(msg) => logger.log_event("pdf_upload_failed", msg).await,
            }
        }

        Ok(outcome)
    }

    /// Forget the uploaded PDF. Returns false if none was uploaded.
    pub async fn clear_pdf(&mut self) -> bool {
        let cleared = self.state.clear_pdf();
        if cleared {
            if let Some(logger) = &mut self.logger {
                logger.log_event("pdf_cleared", "").await;
            }
        }
        cleared
    }

    pub async fn set_model(&mut self, name: &str) -> Result<String> {
        let model = config::parse_model(name)?;
        self.state.options.model = model;
        let msg = format!("Model set to {}", model);
        if let Some(logger) = &mut self.logger {
            logger.log_event("options", &msg).await;
        }
        Ok(msg)
    }

    pub async fn set_temperature(&mut self, value: &str) -> Result<String> {
        let temperature: f32 = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid temperature: '{}'", value.trim()))?;
        self.state.options.set_temperature(temperature)?;
        let msg = format!("Temperature set to {:.1}", temperature);
        if let Some(logger) = &mut self.logger {
            logger.log_event("options", &msg).await;
        }
        Ok(msg)
    }

    /// Drop all chat turns; the options and document state are kept
    pub fn clear_history(&mut self) {
        self.state.chat_history.clear();
        self.state.last_input_sent.clear();
    }

    pub fn save_state(&self, file_path: &str) -> Result<String> {
        state::save_state(&self.state, file_path)
    }

    pub fn load_state(&mut self, file_path: &str) -> Result<String> {
        let (session, version) = state::load_state(file_path)?;
        self.state = session;
        Ok(format!(
            "Loaded session from {} (version {}, {} messages)",
            file_path,
            version,
            self.state.chat_history.len()
        ))
    }

    /// Write the conversation as a standalone HTML page
    pub fn export_html(&self, file_path: &str, use_markdown: bool) -> Result<String> {
        let page = render::render_transcript(&self.state, use_markdown);
        std::fs::write(file_path, page)
            .with_context(|| format!("Failed to write transcript to {}", file_path))?;
        Ok(format!(
            "Exported {} messages to {}",
            self.state.chat_history.len(),
            file_path
        ))
    }

    pub async fn shutdown(&mut self) {
        if let Some(logger) = &mut self.logger {
            logger.shutdown().await;
        }
    }
}
