//! JSON bodies exchanged with the backend.
//!
//! Replies are read leniently: a body that is not a JSON object carries no
//! fields, and non-string scalars are rendered as compact JSON.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub struct WebIngestRequest<'a> {
    pub url: &'a str,
}

/// Reply of a web ingestion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReply {
    pub source: Option<String>,
}

impl IngestReply {
    pub fn from_value(value: &Value) -> Self {
        Self {
            source: value.get("source").and_then(value_to_text),
        }
    }
}

/// Reply of a question (or of `/chat_or_ingest`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerReply {
    pub answer: Option<String>,
    pub results: Option<Vec<String>>,
}

impl AnswerReply {
    pub fn from_value(value: &Value) -> Self {
        let answer = value.get("answer").and_then(value_to_text);
        let results = value
            .get("results")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(result_item_text).collect());
        Self { answer, results }
    }

    /// The `answer` field, else the `results` joined by newlines
    pub fn into_text(self) -> Option<String> {
        if let Some(answer) = self.answer {
            return Some(answer);
        }
        self.results
            .filter(|results| !results.is_empty())
            .map(|results| results.join("\n"))
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn result_item_text(item: &Value) -> Option<String> {
    if let Value::Object(fields) = item {
        for key in ["text", "content", "answer"] {
            if let Some(Value::String(s)) = fields.get(key) {
                return Some(s.clone());
            }
        }
    }
    value_to_text(item)
}
