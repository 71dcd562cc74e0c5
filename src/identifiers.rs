//! Type-safe identifiers for protocol entities.
//!
//! Newtype wrappers prevent mixing incompatible identifiers at compile time.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CommandId`] | Command/response correlation id (monotonic integer) |
//! | [`BrowsingContext`] | Opaque handle to a browser tab or frame |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// ============================================================================
// CommandId
// ============================================================================

/// Monotonic counter backing [`CommandId::next`].
static NEXT_COMMAND_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier correlating a command to its response.
///
/// The protocol requires ids to be unique per outstanding request for the
/// lifetime of the connection; a monotonically increasing integer satisfies
/// that and keeps the wire format minimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(u64);

impl CommandId {
    /// Returns a fresh id, greater than all previously issued ids.
    #[inline]
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_COMMAND_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw integer value.
    #[inline]
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for CommandId {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// BrowsingContext
// ============================================================================

/// Opaque handle naming a renderable surface (tab or frame) in the browser.
///
/// The browser owns the handle; the client only holds and forwards the
/// identifier. Handles are never validated locally — an invalid handle
/// surfaces as an error from the command that uses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrowsingContext(String);

impl BrowsingContext {
    /// Creates a context handle from its protocol identifier.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BrowsingContext {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BrowsingContext {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for BrowsingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_id_monotonic() {
        let a = CommandId::next();
        let b = CommandId::next();
        assert!(b.value() > a.value());
    }

    #[test]
    fn test_command_id_serializes_as_integer() {
        let id = CommandId::from(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn test_browsing_context_transparent() {
        let ctx = BrowsingContext::from("ctx-1");
        assert_eq!(serde_json::to_string(&ctx).unwrap(), "\"ctx-1\"");
        assert_eq!(ctx.as_str(), "ctx-1");
        assert_eq!(ctx.to_string(), "ctx-1");
    }
}
