//! Wire message envelopes.
//!
//! Defines the outbound command envelope and the three inbound message
//! shapes the browser can send on the shared channel.
//!
//! # Format
//!
//! Outbound:
//! ```json
//! { "id": 3, "method": "browsingContext.getTree", "params": {} }
//! ```
//!
//! Inbound, discriminated by `type`:
//! ```json
//! { "type": "success", "id": 3, "result": { ... } }
//! { "type": "error", "id": 3, "error": "unknown command", "message": "..." }
//! { "type": "event", "method": "log.entryAdded", "params": { ... } }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::CommandId;

use super::Command;

// ============================================================================
// CommandEnvelope
// ============================================================================

/// An outbound command with its correlation id.
///
/// Envelopes are ephemeral: created per call and discarded once the
/// matching response arrives.
#[derive(Debug, Clone, Serialize)]
pub struct CommandEnvelope {
    /// Unique identifier for command/response correlation.
    pub id: CommandId,

    /// Command with method and params.
    #[serde(flatten)]
    pub command: Command,
}

impl CommandEnvelope {
    /// Creates an envelope with a fresh id.
    #[inline]
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            id: CommandId::next(),
            command,
        }
    }

    /// Creates an envelope with a specific id.
    #[inline]
    #[must_use]
    pub fn with_id(id: CommandId, command: Command) -> Self {
        Self { id, command }
    }
}

// ============================================================================
// IncomingMessage
// ============================================================================

/// Any message the browser sends on the channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum IncomingMessage {
    /// Successful response to a command.
    #[serde(rename = "success")]
    Success(CommandResponse),

    /// Error response to a command.
    #[serde(rename = "error")]
    Error(ErrorResponse),

    /// Unsolicited event; carries no correlation id.
    #[serde(rename = "event")]
    Event(EventMessage),
}

// ============================================================================
// CommandResponse
// ============================================================================

/// Successful response payload.
///
/// The result is opaque at this layer — it is method-specific and the
/// dispatcher hands it to the caller uninterpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandResponse {
    /// Matches the command `id`.
    pub id: CommandId,

    /// Method-specific result payload.
    #[serde(default)]
    pub result: Value,
}

// ============================================================================
// ErrorResponse
// ============================================================================

/// Error response payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Matches the command `id`; absent when the browser could not parse
    /// the offending command.
    #[serde(default)]
    pub id: Option<CommandId>,

    /// Protocol error code.
    pub error: String,

    /// Human-readable error message.
    #[serde(default)]
    pub message: String,

    /// Optional stack trace from the remote end.
    #[serde(default)]
    pub stacktrace: Option<String>,
}

// ============================================================================
// EventMessage
// ============================================================================

/// Unsolicited event from the browser.
///
/// This client subscribes to nothing, so events are observed and logged by
/// the event loop rather than routed to a waiter.
#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    /// Event method in `module.eventName` format.
    pub method: String,

    /// Event payload.
    #[serde(default)]
    pub params: Value,
}

// ============================================================================
// Tests
// ============================================================================
