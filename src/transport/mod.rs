//! Transport — one request/response round-trip per user turn.
//!
//! DESIGN
//! ======
//! `Transport` is the seam between the widget controller and the network.
//! `HttpTransport` is the production implementation; tests substitute mocks.
//! Error variants carry detail for logs only: the controller turns every
//! failure into the same assistant message.

pub mod http;

use crate::widget::SessionId;

pub use http::HttpTransport;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by a transport round-trip.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("backend request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// The backend body was not the expected reply shape.
    #[error("backend reply parse failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

// =============================================================================
// CONTRACT
// =============================================================================

/// Assistant reply for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Raw reply text, before formatting.
    pub response: String,
    pub session_id: SessionId,
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send one user turn. `session_id` is `None` for a new conversation.
    async fn send(&self, message: &str, session_id: Option<&SessionId>) -> Result<Reply, TransportError>;
}
