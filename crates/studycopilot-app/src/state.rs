use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::types::SessionState;

/// Serializable state for saving/loading sessions
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedSession {
    pub version: String,
    pub saved_at: DateTime<Local>,
    pub session: SessionState,
}

impl SavedSession {
    pub fn new(session: SessionState) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: Local::now(),
            session,
        }
    }

    /// Save the session to a file
    pub fn save(&self, file_path: &str) -> Result<String> {
        let json = serde_json::to_string_pretty(&self).context("Failed to serialize session")?;

        fs::write(file_path, json)
            .with_context(|| format!("Failed to write session to file: {}", file_path))?;

        Ok(format!(
            "Saved session to {} ({} messages)",
            file_path,
            self.session.chat_history.len()
        ))
    }

    /// Load a session from a file
    pub fn load(file_path: &str) -> Result<Self> {
        let json = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read session from file: {}", file_path))?;

        serde_json::from_str(&json).context("Failed to deserialize session")
    }
}

/// Save a session to a file (standalone function)
pub fn save_state(session: &SessionState, file_path: &str) -> Result<String> {
    SavedSession::new(session.clone()).save(file_path)
}

/// Load a session from a file, returning it with the version that wrote it
pub fn load_state(file_path: &str) -> Result<(SessionState, String)> {
    let saved = SavedSession::load(file_path)?;
    Ok((saved.session, saved.version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelChoice;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let path = path.to_str().unwrap();

        let mut session = SessionState::new();
        session.chat_history.push_user("What is Raft?");
        session.chat_history.push_assistant("A consensus algorithm.");
        session.options.model = ModelChoice::Gemini;
        session.mark_pdf_uploaded();
        assert!(session.should_send("What is Raft?"));

        let msg = save_state(&session, path).unwrap();
        assert!(msg.contains("2 messages"));

        let (loaded, version) = load_state(path).unwrap();
        assert_eq!(version, env!("CARGO_PKG_VERSION"));
        assert_eq!(loaded.chat_history, session.chat_history);
        assert_eq!(loaded.options, session.options);
        assert!(loaded.pdf_uploaded);
        assert_eq!(loaded.last_input_sent, "What is Raft?");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_state("/nonexistent/dir/session.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read session"));
    }

    #[test]
    fn test_load_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_state(path.to_str().unwrap()).is_err());
    }
}
