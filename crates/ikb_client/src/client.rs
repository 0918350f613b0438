//! HTTP chat service client: POST the prompt, classify the outcome.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::messages::{error_detail, ChatReply, ChatRequest};

/// Endpoint used when the config does not name one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/v1/chat";

/// Shown when the request went out but no response came back.
pub const NO_RESPONSE_TEXT: &str =
    "No response from server. Please check if the server is running.";

/// Shown for any failure that is neither a status error nor unreachable.
pub const GENERIC_ERROR_TEXT: &str =
    "Sorry, there was an error processing your request. Please try again later.";

/// Why a chat request did not produce a reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceFailure {
    /// The server answered with a non-2xx status.
    #[error("server returned status {status}")]
    Status { status: u16, detail: Option<String> },
    /// The request was sent but no response was received.
    #[error("no response from server")]
    Unreachable,
    #[error("chat request failed: {0}")]
    Unknown(String),
}

impl ServiceFailure {
    /// Text appended to the conversation in place of a reply.
    pub fn user_text(&self) -> String {
        match self {
            ServiceFailure::Status { status, detail } => format!(
                "Error {}: {}",
                status,
                detail.as_deref().unwrap_or("Server error")
            ),
            ServiceFailure::Unreachable => NO_RESPONSE_TEXT.to_string(),
            ServiceFailure::Unknown(_) => GENERIC_ERROR_TEXT.to_string(),
        }
    }
}

/// Anything that can answer a chat request.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ServiceFailure>;
}

/// Chat service reached over HTTP at a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpChatClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), endpoint)
    }

    /// Use a preconfigured `reqwest::Client` (proxy settings, custom roots).
    pub fn with_http(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatService for HttpChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ServiceFailure> {
        debug!(endpoint = %self.endpoint, prompt_len = request.prompt.len(), "sending chat request");
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.ok().and_then(|b| error_detail(&b));
            warn!(status = status.as_u16(), ?detail, "chat service returned error status");
            return Err(ServiceFailure::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.text().await.map_err(classify)?;
        let reply = ChatReply::from_body(&body);
        if reply.message.is_none() {
            warn!("chat reply has no message field");
        }
        Ok(reply)
    }
}

fn classify(err: reqwest::Error) -> ServiceFailure {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        warn!(error = %err, "chat service unreachable");
        ServiceFailure::Unreachable
    } else {
        warn!(error = %err, "chat request failed");
        ServiceFailure::Unknown(err.to_string())
    }
}
