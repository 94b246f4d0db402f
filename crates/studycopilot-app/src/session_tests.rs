use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::api::{BackendError, StatusCode};
use crate::types::{ChatTurn, Role};
use crate::{Backend, Copilot, LlmOptions, ModelChoice, UploadOutcome};

enum Reply {
    Answer(String),
    InvalidJson,
    Unreachable,
}

/// Backend double recording every call
struct FakeBackend {
    reply: Reply,
    upload_ok: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeBackend {
    fn answering(answer: &str) -> (Self, Arc<Mutex<Vec<String>>>) {
        Self::with_reply(Reply::Answer(answer.to_string()))
    }

    fn with_reply(reply: Reply) -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let backend = Self {
            reply,
            upload_ok: true,
            calls: calls.clone(),
        };
        (backend, calls)
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn upload_pdf(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("upload:{}:{}", file_name, bytes.len()));
        if self.upload_ok {
            Ok(())
        } else {
            Err(BackendError::Status {
                status: reqwest_status(502),
                url: "http://fake/ingest/pdf".to_string(),
                body: String::new(),
            })
        }
    }

    async fn send(&self, input: &str) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(format!("send:{}", input));
        match &self.reply {
            Reply::Answer(answer) => Ok(answer.clone()),
            Reply::InvalidJson => Err(BackendError::InvalidJson(
                serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            )),
            Reply::Unreachable => Err(BackendError::Status {
                status: reqwest_status(503),
                url: "http://fake/query".to_string(),
                body: String::new(),
            }),
        }
    }

    fn describe(&self) -> String {
        "fake backend".to_string()
    }
}

/// Writer that fails as soon as a write contains `needle`
struct FailingWriter {
    needle: &'static str,
    written: Vec<u8>,
}

impl std::io::Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if String::from_utf8_lossy(buf).contains(self.needle) {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn reqwest_status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

fn copilot(backend: FakeBackend) -> Copilot {
    let mut copilot = Copilot::new(Box::new(backend), LlmOptions::default());
    copilot.animate = false;
    copilot
}

#[tokio::test]
async fn test_submit_records_user_then_answer() {
    let (backend, calls) = FakeBackend::answering("Photosynthesis converts light into chemical energy.");
    let mut copilot = copilot(backend);
    let mut out = Vec::new();

    let answer = copilot
        .submit("What is photosynthesis?", &mut out, None)
        .await
        .unwrap();

    assert_eq!(
        answer.as_deref(),
        Some("Photosynthesis converts light into chemical energy.")
    );
    let turns: Vec<_> = copilot.state.chat_history.iter().cloned().collect();
    assert_eq!(
        turns,
        vec![
            ChatTurn::new(Role::User, "What is photosynthesis?"),
            ChatTurn::new(Role::Assistant, "Photosynthesis converts light into chemical energy."),
        ]
    );
    assert_eq!(*calls.lock().unwrap(), vec!["send:What is photosynthesis?".to_string()]);

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("What is photosynthesis?"));
    assert!(printed.contains("chemical energy."));
}

#[tokio::test]
async fn test_repeated_input_is_ignored() {
    let (backend, calls) = FakeBackend::answering("ok");
    let mut copilot = copilot(backend);
    let mut out = Vec::new();

    assert!(copilot.submit("hello", &mut out, None).await.unwrap().is_some());
    assert!(copilot.submit("hello", &mut out, None).await.unwrap().is_none());
    assert!(copilot.submit("  hello  ", &mut out, None).await.unwrap().is_none());
    assert!(copilot.submit("goodbye", &mut out, None).await.unwrap().is_some());

    assert_eq!(calls.lock().unwrap().len(), 2);
    assert_eq!(copilot.state.chat_history.len(), 4);
}

#[tokio::test]
async fn test_empty_input_is_ignored() {
    let (backend, calls) = FakeBackend::answering("ok");
    let mut copilot = copilot(backend);
    let mut out = Vec::new();

    assert!(copilot.submit("   ", &mut out, None).await.unwrap().is_none());
    assert!(calls.lock().unwrap().is_empty());
    assert!(copilot.state.chat_history.is_empty());
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_backend_failures_become_answers() {
    let (backend, _) = FakeBackend::with_reply(Reply::Unreachable);
    let mut copilot = copilot(backend);
    let answer = copilot.submit("hi", &mut Vec::new(), None).await.unwrap().unwrap();
    assert!(answer.starts_with("❌ Cannot reach backend. (503"));
    assert_eq!(copilot.state.chat_history.last().unwrap().content, answer);

    let (backend, _) = FakeBackend::with_reply(Reply::InvalidJson);
    let mut copilot = self::copilot(backend);
    let answer = copilot.submit("hi", &mut Vec::new(), None).await.unwrap().unwrap();
    assert_eq!(answer, "❌ Invalid JSON response from backend.");
}

#[tokio::test]
async fn test_thinking_status_without_animation() {
    let (backend, _) = FakeBackend::answering("ok");
    let mut copilot = copilot(backend);
    let mut out = Vec::new();

    copilot.submit("status?", &mut out, None).await.unwrap();

    let printed = String::from_utf8(out).unwrap();
    let thinking = printed.find("Thinking...").unwrap();
    let erased = printed.find("\r\x1b[2K").unwrap();
    assert!(thinking < erased);
}

#[tokio::test]
async fn test_failed_write_rolls_back_the_turn() {
    colored::control::set_override(false);
    let (backend, calls) = FakeBackend::answering("the answer");
    let mut copilot = copilot(backend);
    copilot.submit("earlier", &mut Vec::new(), None).await.unwrap();

    // Fails on the assistant header, after the placeholder was pushed
    let mut broken = FailingWriter {
        needle: "Copilot",
        written: Vec::new(),
    };
    assert!(copilot.submit("again?", &mut broken, None).await.is_err());
    assert_eq!(copilot.state.chat_history.len(), 2);
    assert_eq!(copilot.state.last_input_sent, "earlier");

    // Fails on the user bubble, before anything was sent
    let mut broken = FailingWriter {
        needle: "again?",
        written: Vec::new(),
    };
    assert!(copilot.submit("again?", &mut broken, None).await.is_err());
    assert_eq!(copilot.state.chat_history.len(), 2);

    let answer = copilot.submit("again?", &mut Vec::new(), None).await.unwrap();
    assert_eq!(answer.as_deref(), Some("the answer"));
    assert_eq!(copilot.state.chat_history.len(), 4);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            "send:earlier".to_string(),
            "send:again?".to_string(),
            "send:again?".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_animated_submit_reveals_the_whole_answer() {
    let (backend, _) = FakeBackend::answering("typed out");
    let mut copilot = copilot(backend);
    copilot.animate = true;
    copilot.typing_delay = std::time::Duration::ZERO;
    let mut out = Vec::new();

    copilot.submit("go", &mut out, None).await.unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("typed out"));
    assert_eq!(copilot.state.chat_history.last().unwrap().content, "typed out");
}

#[tokio::test]
async fn test_upload_pdf_marks_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Lecture.PDF");
    std::fs::write(&path, b"%PDF-1.4 test").unwrap();

    let (backend, calls) = FakeBackend::answering("");
    let mut copilot = copilot(backend);

    let outcome = copilot.upload_pdf(&path).await.unwrap();
    assert_eq!(outcome, UploadOutcome::Uploaded("Lecture.PDF".to_string()));
    assert!(copilot.state.pdf_uploaded);
    assert_eq!(*calls.lock().unwrap(), vec!["upload:Lecture.PDF:13".to_string()]);

    assert!(copilot.clear_pdf().await);
    assert!(!copilot.state.pdf_uploaded);
    assert!(!copilot.clear_pdf().await);
}

#[tokio::test]
async fn test_failed_upload_leaves_flag_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.pdf");
    std::fs::write(&path, b"%PDF").unwrap();

    let (mut backend, _) = FakeBackend::answering("");
    backend.upload_ok = false;
    let mut copilot = copilot(backend);

    match copilot.upload_pdf(&path).await.unwrap() {
        UploadOutcome::Failed(msg) => assert!(msg.starts_with("Could not reach backend. (502")),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(!copilot.state.pdf_uploaded);
}

#[tokio::test]
async fn test_upload_rejects_non_pdf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"plain").unwrap();

    let (backend, calls) = FakeBackend::answering("");
    let mut copilot = copilot(backend);

    assert!(copilot.upload_pdf(&path).await.is_err());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_options_are_not_sent() {
    let (backend, calls) = FakeBackend::answering("ok");
    let mut copilot = copilot(backend);

    copilot.set_model("gemini").await.unwrap();
    copilot.set_temperature("0.9").await.unwrap();
    assert!(copilot.set_model("claude").await.is_err());
    assert!(copilot.set_temperature("hot").await.is_err());
    assert_eq!(copilot.state.options.model, ModelChoice::Gemini);
    assert_eq!(copilot.state.options.temperature, 0.9);

    copilot.submit("question", &mut Vec::new(), None).await.unwrap();
    assert_eq!(*calls.lock().unwrap(), vec!["send:question".to_string()]);
}

#[tokio::test]
async fn test_clear_history_allows_resending() {
    let (backend, calls) = FakeBackend::answering("ok");
    let mut copilot = copilot(backend);

    copilot.submit("same", &mut Vec::new(), None).await.unwrap();
    copilot.clear_history();
    assert!(copilot.state.chat_history.is_empty());
    assert!(copilot.submit("same", &mut Vec::new(), None).await.unwrap().is_some());
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_save_load_and_export() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("session.json");
    let html_path = dir.path().join("chat.html");

    let (backend, _) = FakeBackend::answering("**42**");
    let mut copilot = copilot(backend);
    copilot.submit("meaning of life?", &mut Vec::new(), None).await.unwrap();

    copilot.save_state(state_path.to_str().unwrap()).unwrap();
    let msg = copilot.export_html(html_path.to_str().unwrap(), true).unwrap();
    assert!(msg.contains("2 messages"));
    let page = std::fs::read_to_string(&html_path).unwrap();
    assert!(page.contains("<strong>42</strong>"));

    let (backend, _) = FakeBackend::answering("");
    let mut restored = self::copilot(backend);
    restored.load_state(state_path.to_str().unwrap()).unwrap();
    assert_eq!(restored.state.chat_history, copilot.state.chat_history);
}

#[tokio::test]
async fn test_turns_are_logged() {
    let dir = TempDir::new().unwrap();
    let (backend, _) = FakeBackend::answering("logged answer");
    let mut copilot = copilot(backend);
    copilot.logger = Some(crate::ConversationLogger::new(dir.path()).await.unwrap());

    copilot.submit("logged question", &mut Vec::new(), None).await.unwrap();
    copilot.shutdown().await;

    let path = copilot.logger.as_ref().unwrap().file_path().to_path_buf();
    let content = std::fs::read_to_string(path).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["role"], "user");
    assert_eq!(lines[0]["content"], "logged question");
    assert_eq!(lines[1]["role"], "assistant");
    assert_eq!(lines[1]["content"], "logged answer");
    assert_eq!(lines[1]["model"], "Groq");
}
