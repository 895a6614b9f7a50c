//! HTTP transport: a single JSON POST to the configured backend endpoint.
//!
//! No timeout, retry, or cancellation is applied. A slow backend keeps the
//! turn in flight until it answers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Reply, Transport, TransportError};
use crate::widget::SessionId;

pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport that POSTs every turn to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ward-chat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: endpoint.into() })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, message: &str, session_id: Option<&SessionId>) -> Result<Reply, TransportError> {
        let body = ChatRequest { message, session_id };
        debug!(endpoint = %self.endpoint, has_session = session_id.is_some(), "posting turn");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16(), body: text });
        }
        parse_reply(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    /// Serialized as `null` when absent.
    session_id: Option<&'a SessionId>,
}

#[derive(Deserialize)]
struct ChatReply {
    response: String,
    session_id: SessionId,
}

pub(crate) fn parse_reply(json_text: &str) -> Result<Reply, TransportError> {
    let reply: ChatReply = serde_json::from_str(json_text).map_err(|e| TransportError::Decode(e.to_string()))?;
    Ok(Reply { response: reply.response, session_id: reply.session_id })
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
