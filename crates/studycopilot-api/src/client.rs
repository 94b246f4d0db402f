use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

use studycopilot_logging::{log_request, log_response, safe_truncate, RequestBody};
use studycopilot_types::{
    web_ingested, InputKind, MSG_NO_ANSWER, PDF_UPLOAD_TIMEOUT, QUERY_TIMEOUT, WEB_INGEST_TIMEOUT,
};

use crate::error::BackendError;
use crate::profile::EndpointProfile;
use crate::wire::{AnswerReply, IngestReply, QueryRequest, WebIngestRequest};
use crate::Backend;

const PDF_MIME: &str = "application/pdf";
const MAX_ERROR_BODY_CHARS: usize = 500;

/// HTTP client for one backend deployment
pub struct BackendClient {
    base_url: String,
    profile: EndpointProfile,
    client: reqwest::Client,
    verbose: bool,
}

impl BackendClient {
    pub fn new(base_url: &str, profile: EndpointProfile) -> Self {
        // Ensure base_url doesn't end with a slash
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            profile,
            client: reqwest::Client::new(),
            verbose: false,
        }
    }

    /// Print every request and response to the console
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn profile(&self) -> EndpointProfile {
        self.profile
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload a PDF for ingestion; only the status of the reply matters
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), BackendError> {
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(PDF_MIME)?;
        let form = Form::new().part("file", part);

        let request = self
            .client
            .post(self.endpoint(self.profile.pdf_upload_path()))
            .multipart(form)
            .timeout(PDF_UPLOAD_TIMEOUT)
            .build()?;

        log_request(
            "POST",
            request.url().as_str(),
            &RequestBody::Multipart {
                field: "file",
                file_name,
                bytes: size,
            },
            self.verbose,
        );

        self.execute(request).await.map(|_| ())
    }

    /// Ingest a web page
    pub async fn ingest_link(&self, url: &str) -> Result<IngestReply, BackendError> {
        let body = serde_json::to_value(WebIngestRequest { url })?;
        let value = self
            .post_json(self.profile.link_path(), body, WEB_INGEST_TIMEOUT)
            .await?;
        Ok(IngestReply::from_value(&value))
    }

    /// Send a link to `/chat_or_ingest`, which takes it in the query string
    pub async fn chat_or_ingest(&self, input: &str) -> Result<AnswerReply, BackendError> {
        let request = self
            .client
            .post(self.endpoint(self.profile.link_path()))
            .query(&[("query", input)])
            .timeout(WEB_INGEST_TIMEOUT)
            .build()?;

        log_request("POST", request.url().as_str(), &RequestBody::Empty, self.verbose);

        let text = self.execute(request).await?;
        let value: Value = serde_json::from_str(&text)?;
        Ok(AnswerReply::from_value(&value))
    }

    /// Ask the question-answering endpoint
    pub async fn ask(&self, question: &str) -> Result<AnswerReply, BackendError> {
        let body = serde_json::to_value(QueryRequest { query: question })?;
        let value = self
            .post_json(self.profile.question_path(), body, QUERY_TIMEOUT)
            .await?;
        Ok(AnswerReply::from_value(&value))
    }

    async fn post_json(&self, path: &str, body: Value, timeout: Duration) -> Result<Value, BackendError> {
        let request = self
            .client
            .post(self.endpoint(path))
            .json(&body)
            .timeout(timeout)
            .build()?;

        log_request("POST", request.url().as_str(), &RequestBody::Json(&body), self.verbose);

        let text = self.execute(request).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Send the request and return the body of a successful reply
    async fn execute(&self, request: reqwest::Request) -> Result<String, BackendError> {
        let url = request.url().to_string();
        let response = self.client.execute(request).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        log_response(&status, &headers, &text, self.verbose);

        if !status.is_success() {
            return Err(BackendError::Status {
                status,
                url,
                body: safe_truncate(&text, MAX_ERROR_BODY_CHARS),
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl Backend for BackendClient {
    async fn upload_pdf(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), BackendError> {
        self.upload(file_name, bytes).await
    }

    async fn send(&self, input: &str) -> Result<String, BackendError> {
        match (InputKind::classify(input), self.profile) {
            (InputKind::Link, EndpointProfile::Ingest) => {
                let reply = self.ingest_link(input).await?;
                Ok(web_ingested(reply.source.as_deref().unwrap_or(input)))
            }
            (InputKind::Link, EndpointProfile::Chat) => {
                let reply = self.chat_or_ingest(input).await?;
                Ok(reply.into_text().unwrap_or_else(|| MSG_NO_ANSWER.to_string()))
            }
            (InputKind::Question, _) => {
                let reply = self.ask(input).await?;
                Ok(reply.into_text().unwrap_or_else(|| MSG_NO_ANSWER.to_string()))
            }
        }
    }

    fn describe(&self) -> String {
        format!("{} ({} endpoints)", self.base_url, self.profile)
    }
}
