use serde_json::{json, Value};
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock backend deployment for exercising the HTTP client
pub struct BackendMockServer {
    server: MockServer,
}

impl BackendMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Mock a successful question on `path` returning the given JSON body
    pub async fn mock_question(&self, path_str: &str, question: &str, reply: Value) {
        Mock::given(method("POST"))
            .and(path(path_str))
            .and(body_json(json!({ "query": question })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock `/ingest/web` for the given link
    pub async fn mock_web_ingest(&self, url: &str, reply: Value) {
        Mock::given(method("POST"))
            .and(path("/ingest/web"))
            .and(body_json(json!({ "url": url })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock `/chat_or_ingest`, which takes the input as a query parameter
    pub async fn mock_chat_or_ingest(&self, input: &str, reply: Value) {
        Mock::given(method("POST"))
            .and(path("/chat_or_ingest"))
            .and(query_param("query", input))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock a multipart PDF upload on `path`
    pub async fn mock_pdf_upload(&self, path_str: &str, file_name: &str) {
        Mock::given(method("POST"))
            .and(path(path_str))
            .and(header_regex("content-type", "^multipart/form-data"))
            .and(body_string_contains(format!("filename=\"{}\"", file_name)))
            .and(body_string_contains("application/pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock any POST on `path` with a raw status and body
    pub async fn mock_raw(&self, path_str: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(path_str))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}
