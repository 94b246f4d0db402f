use std::fmt;

/// Endpoint contract of a backend deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointProfile {
    /// `/ingest/pdf`, `/ingest/web` (JSON `url`), `/query` (JSON `query`)
    #[default]
    Ingest,
    /// `/upload_pdf`, `/chat_or_ingest` (query string `query`), `/chat` (JSON `query`)
    Chat,
}

impl EndpointProfile {
    /// Parse profile from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ingest" | "v2" => Some(Self::Ingest),
            "chat" | "legacy" => Some(Self::Chat),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingest => "ingest",
            Self::Chat => "chat",
        }
    }

    pub fn pdf_upload_path(&self) -> &'static str {
        match self {
            Self::Ingest => "/ingest/pdf",
            Self::Chat => "/upload_pdf",
        }
    }

    pub fn link_path(&self) -> &'static str {
        match self {
            Self::Ingest => "/ingest/web",
            Self::Chat => "/chat_or_ingest",
        }
    }

    pub fn question_path(&self) -> &'static str {
        match self {
            Self::Ingest => "/query",
            Self::Chat => "/chat",
        }
    }
}

impl fmt::Display for EndpointProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
