//! Error types for the BiDi client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use bidi_clicker::{Result, Session};
//!
//! async fn example(session: &Session) -> Result<()> {
//!     let info = session.find_element(None, "#submit").await?;
//!     let (x, y) = info.center();
//!     session.click(None, x, y).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Transport | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::WebSocket`] |
//! | Protocol | [`Error::CommandFailed`], [`Error::Decode`] |
//! | Script | [`Error::ScriptException`] |
//! | Lookup | [`Error::NoContextAvailable`], [`Error::ElementNotFound`] |
//! | Timeout | [`Error::CommandTimeout`] |
//! | External | [`Error::Json`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::CommandId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging. Underlying causes
/// are wrapped, never replaced, so callers can tell a browser-reported
/// failure from a broken wire format.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// WebSocket send or connect failed.
    ///
    /// Returned when the channel rejects a write or the endpoint is
    /// unreachable.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Connection closed while commands were outstanding.
    ///
    /// Returned when the event loop terminates before a response arrives.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// The browser answered a command with an error response.
    ///
    /// Carries the protocol error code and human-readable message verbatim.
    #[error("Command failed: {error}: {message}")]
    CommandFailed {
        /// Protocol error code (e.g. "no such frame").
        error: String,
        /// Error message reported by the browser.
        message: String,
    },

    /// A response payload did not decode into the expected shape.
    ///
    /// Indicates protocol-version mismatch or script/schema drift. Never
    /// swallowed; the serde cause is preserved.
    #[error("Failed to decode {what}: {source}")]
    Decode {
        /// Which payload failed to decode.
        what: &'static str,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },

    // ========================================================================
    // Script Errors
    // ========================================================================
    /// The evaluated script threw inside the browser.
    ///
    /// Distinct from [`Error::CommandFailed`]: the command itself succeeded
    /// and the exception payload comes from the page realm.
    #[error("Script exception: {text}")]
    ScriptException {
        /// Stringified exception detail from the browser.
        text: String,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// Context resolution found an empty context set.
    #[error("No browsing contexts available")]
    NoContextAvailable,

    /// Element not found by selector.
    ///
    /// Returned when the locate script matched no element.
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// CSS selector used.
        selector: String,
    },

    // ========================================================================
    // Timeout Errors
    // ========================================================================
    /// Command response not received within the deadline.
    ///
    /// The pending correlation entry is discarded; a late response is
    /// dropped by the event loop.
    #[error("Command {id} timed out after {timeout_ms}ms")]
    CommandTimeout {
        /// The command id that timed out.
        id: CommandId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a command-failed error from a protocol error response.
    #[inline]
    pub fn command_failed(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            error: error.into(),
            message: message.into(),
        }
    }

    /// Creates a decode error naming the payload that failed.
    #[inline]
    pub fn decode(what: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { what, source }
    }

    /// Creates a script exception error.
    #[inline]
    pub fn script_exception(text: impl Into<String>) -> Self {
        Self::ScriptException { text: text.into() }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Creates a command timeout error.
    #[inline]
    pub fn command_timeout(id: CommandId, timeout_ms: u64) -> Self {
        Self::CommandTimeout { id, timeout_ms }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::CommandTimeout { .. })
    }

    /// Returns `true` if this is a transport-level error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionClosed | Self::WebSocket(_)
        )
    }

    /// Returns `true` if the browser reported this error.
    ///
    /// Distinguishes "browser said no" from "wire format broke".
    #[inline]
    #[must_use]
    pub fn is_browser_reported(&self) -> bool {
        matches!(
            self,
            Self::CommandFailed { .. } | Self::ScriptException { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "Connection failed: failed to connect");
    }

    #[test]
    fn test_command_failed_display() {
        let err = Error::command_failed("unknown command", "no such method");
        assert_eq!(
            err.to_string(),
            "Command failed: unknown command: no such method"
        );
    }

    #[test]
    fn test_element_not_found_names_selector() {
        let err = Error::element_not_found("#missing");
        assert_eq!(err.to_string(), "Element not found: #missing");
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::command_timeout(CommandId::from(7), 5000);
        let other_err = Error::connection("test");

        assert!(timeout_err.is_timeout());
        assert!(!other_err.is_timeout());
    }

    #[test]
    fn test_is_connection_error() {
        let conn_err = Error::connection("test");
        let closed_err = Error::ConnectionClosed;
        let other_err = Error::NoContextAvailable;

        assert!(conn_err.is_connection_error());
        assert!(closed_err.is_connection_error());
        assert!(!other_err.is_connection_error());
    }

    #[test]
    fn test_is_browser_reported() {
        let cmd_err = Error::command_failed("invalid argument", "bad params");
        let script_err = Error::script_exception("TypeError: x is null");
        let decode_err = Error::decode(
            "element info",
            serde_json::from_str::<String>("{").unwrap_err(),
        );

        assert!(cmd_err.is_browser_reported());
        assert!(script_err.is_browser_reported());
        assert!(!decode_err.is_browser_reported());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
