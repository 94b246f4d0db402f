use studycopilot_types::{cannot_reach_backend, MSG_INVALID_JSON};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure: connection refused, DNS, timeout
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("{status} for url: {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },

    #[error("invalid JSON response: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Turn the outcome of a backend call into the text shown as the answer.
/// Failures never abort the session, they become the answer.
pub fn reply_text(result: Result<String, BackendError>) -> String {
    match result {
        Ok(answer) => answer,
        Err(BackendError::InvalidJson(_)) => MSG_INVALID_JSON.to_string(),
        Err(e) => cannot_reach_backend(&e),
    }
}
