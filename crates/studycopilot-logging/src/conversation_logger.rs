use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Serialize)]
struct LogEntry {
    timestamp: String, // ISO‑8601 Local time
    session_id: String,
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<String>,
}

/// Appends one JSON line per chat turn or session event
pub struct ConversationLogger {
    file_path: PathBuf,
    session_id: String,
    file: Option<tokio::fs::File>,
}

impl ConversationLogger {
    /// Create a new logger; generates the file name based on the current local time.
    pub async fn new(logs_dir: &Path) -> Result<Self> {
        Self::open(logs_dir, "").await
    }

    /// Create a new logger for one-shot commands; the file name gets a "-task" suffix.
    pub async fn new_task_mode(logs_dir: &Path) -> Result<Self> {
        Self::open(logs_dir, "-task").await
    }

    async fn open(logs_dir: &Path, suffix: &str) -> Result<Self> {
        fs::create_dir_all(logs_dir).await?;

        let now_local = Local::now();
        let filename = format!(
            "copilot-{}{}.jsonl",
            now_local.format("%Y-%m-%d-%H%M%S"),
            suffix
        );
        let file_path = logs_dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;
        Ok(Self {
            file_path,
            session_id: Uuid::new_v4().to_string(),
            file: Some(file),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Append a chat turn.
    pub async fn log(&mut self, role: &str, content: &str, model: Option<&str>) {
        let entry = self.entry(role, content, model, None);
        self.write(entry).await;
    }

    /// Append a session event such as a PDF upload or an options change.
    pub async fn log_event(&mut self, event: &str, content: &str) {
        let entry = self.entry("system", content, None, Some(event));
        self.write(entry).await;
    }

    fn entry(&self, role: &str, content: &str, model: Option<&str>, event: Option<&str>) -> LogEntry {
        LogEntry {
            timestamp: Local::now().to_rfc3339(),
            session_id: self.session_id.clone(),
            role: role.to_string(),
            content: content.to_string(),
            model: model.map(|s| s.to_string()),
            event: event.map(|s| s.to_string()),
        }
    }

    async fn write(&mut self, entry: LogEntry) {
        if let Some(file) = &mut self.file {
            if let Ok(json) = serde_json::to_string(&entry) {
                if let Err(e) = file.write_all(json.as_bytes()).await {
                    eprintln!("[Logging error] {}", e);
                } else if let Err(e) = file.write_all(b"\n").await {
                    eprintln!("[Logging error] {}", e);
                } else {
                    let _ = file.flush().await;
                }
            }
        }
    }

    /// Close the logger (explicit drop). Called on graceful shutdown.
    pub async fn shutdown(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.sync_all().await;
        }
    }
}
