//! Browser automation session.
//!
//! A [`Session`] wraps a [`Connection`] and exposes the typed operations:
//! context resolution, element location, and pointer input. Every operation
//! is a stateless request/response round trip — the only state a caller may
//! carry between calls is a resolved [`BrowsingContext`], supplied
//! explicitly to skip re-resolution.
//!
//! # Example
//!
//! ```no_run
//! use bidi_clicker::{Result, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = Session::connect("ws://127.0.0.1:9222/session").await?;
//!
//!     // None = resolve the first open context
//!     session.click_element(None, "#submit").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `element` | Element location and geometry |
//! | `input` | Pointer action synthesis |

// ============================================================================
// Submodules
// ============================================================================

/// Element location and geometry.
pub mod element;

/// Pointer action synthesis.
pub mod input;

// ============================================================================
// Re-exports
// ============================================================================

pub use element::{BoxInfo, ElementInfo};

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::BrowsingContext;
use crate::protocol::{Command, GetTreeParams};
use crate::transport::Connection;

// ============================================================================
// BrowsingContextInfo
// ============================================================================

/// One node of the browsing context tree.
///
/// Enumeration order is browser-defined; the first top-level entry is the
/// conventional default context.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowsingContextInfo {
    /// The context handle.
    pub context: BrowsingContext,

    /// URL currently loaded in the context.
    #[serde(default)]
    pub url: String,

    /// Child contexts (frames), if the browser reports them.
    #[serde(default)]
    pub children: Option<Vec<BrowsingContextInfo>>,
}

/// Result payload of `browsingContext.getTree`.
#[derive(Debug, Deserialize)]
struct GetTreeResult {
    contexts: Vec<BrowsingContextInfo>,
}

// ============================================================================
// Session
// ============================================================================

/// A client session over one browser connection.
///
/// Cheap to clone; clones share the underlying connection.
#[derive(Clone)]
pub struct Session {
    /// The command dispatch channel.
    connection: Connection,
}

impl Session {
    /// Creates a session over an established connection.
    #[inline]
    #[must_use]
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Dials the browser endpoint and wraps it in a session.
    ///
    /// # Errors
    ///
    /// See [`Connection::connect`].
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(Connection::connect(url).await?))
    }

    /// Sends a raw command and returns its uninterpreted result payload.
    ///
    /// # Errors
    ///
    /// See [`Connection::send`].
    pub async fn send_command(&self, command: Command) -> Result<Value> {
        self.connection.send(command).await
    }

    /// Sends a raw command with a caller-supplied deadline.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_with_timeout`].
    pub async fn send_command_with_timeout(
        &self,
        command: Command,
        timeout: Duration,
    ) -> Result<Value> {
        self.connection.send_with_timeout(command, timeout).await
    }

    /// Returns the underlying connection.
    #[inline]
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Closes the session; pending commands fail.
    pub fn close(&self) {
        self.connection.shutdown();
    }

    // ========================================================================
    // Context Resolution
    // ========================================================================

    /// Enumerates the open browsing contexts in browser-defined order.
    ///
    /// # Errors
    ///
    /// - Dispatcher errors from the underlying command
    /// - [`Error::Decode`] if the result payload has an unexpected shape
    pub async fn get_tree(&self) -> Result<Vec<BrowsingContextInfo>> {
        let result = self
            .connection
            .send(Command::GetTree(GetTreeParams::default()))
            .await?;

        let tree: GetTreeResult = serde_json::from_value(result)
            .map_err(|e| Error::decode("browsingContext.getTree result", e))?;

        Ok(tree.contexts)
    }

    /// Resolves the target context for an operation.
    ///
    /// An explicit context passes through unvalidated — an invalid handle
    /// surfaces as an error from the command that uses it. `None` falls
    /// back to the first context in enumeration order. Every operation
    /// that accepts an optional context applies this same policy.
    ///
    /// # Errors
    ///
    /// - [`Error::NoContextAvailable`] if enumeration returns no contexts
    /// - Dispatcher errors from the enumeration command
    pub async fn resolve_context(
        &self,
        requested: Option<&BrowsingContext>,
    ) -> Result<BrowsingContext> {
        if let Some(context) = requested {
            return Ok(context.clone());
        }

        let contexts = self.get_tree().await?;
        match contexts.into_iter().next() {
            Some(info) => {
                debug!(context = %info.context, "Resolved default browsing context");
                Ok(info.context)
            }
            None => Err(Error::NoContextAvailable),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::connection::testwire::{WireHarness, connection_pair};

    use serde_json::json;

    fn session_pair() -> (Session, WireHarness) {
        let (connection, harness) = connection_pair();
        (Session::new(connection), harness)
    }

    #[tokio::test]
    async fn test_resolve_explicit_context_sends_nothing() {
        let (session, mut harness) = session_pair();
        let requested = BrowsingContext::from("abc");

        let resolved = session.resolve_context(Some(&requested)).await.unwrap();

        assert_eq!(resolved, requested);
        assert!(harness.try_next_command().is_none(), "no enumeration call");
    }

    #[tokio::test]
    async fn test_resolve_default_takes_first_context() {
        let (session, mut harness) = session_pair();

        let task = tokio::spawn(async move { session.resolve_context(None).await });

        let envelope = harness.next_command().await;
        assert_eq!(envelope["method"], "browsingContext.getTree");
        harness.respond_success(
            envelope["id"].as_u64().unwrap(),
            json!({"contexts": [
                {"context": "c1", "url": "https://a.example", "children": []},
                {"context": "c2", "url": "https://b.example", "children": null}
            ]}),
        );

        let resolved = task.await.unwrap().unwrap();
        assert_eq!(resolved, BrowsingContext::from("c1"));
    }

    #[tokio::test]
    async fn test_resolve_default_fails_on_empty_tree() {
        let (session, mut harness) = session_pair();

        let task = tokio::spawn(async move { session.resolve_context(None).await });

        let envelope = harness.next_command().await;
        harness.respond_success(envelope["id"].as_u64().unwrap(), json!({"contexts": []}));

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::NoContextAvailable));
    }

    #[tokio::test]
    async fn test_resolve_default_propagates_command_failure() {
        let (session, mut harness) = session_pair();

        let task = tokio::spawn(async move { session.resolve_context(None).await });

        let envelope = harness.next_command().await;
        harness.respond_error(
            envelope["id"].as_u64().unwrap(),
            "unknown error",
            "browser unavailable",
        );

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn test_get_tree_rejects_malformed_result() {
        let (session, mut harness) = session_pair();

        let task = tokio::spawn(async move { session.get_tree().await });

        let envelope = harness.next_command().await;
        harness.respond_success(envelope["id"].as_u64().unwrap(), json!({"unexpected": 1}));

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
