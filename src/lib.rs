//! BiDi Clicker - WebDriver BiDi client for browser automation.
//!
//! This library opens a control channel to a running browser, issues
//! structured JSON commands, and correlates asynchronous responses back to
//! callers.
//!
//! # Architecture
//!
//! The client bridges two execution environments — this process and the
//! browser's JavaScript engine — through an id-correlated wire protocol:
//!
//! - **Dispatcher**: one event loop task owns the WebSocket; callers
//!   suspend on a per-command channel until their response arrives
//! - **Context resolution**: operations without an explicit browsing
//!   context fall back to the first open one, resolved in one place
//! - **Element location**: a script runs inside the page and serializes
//!   tag/text/geometry itself, avoiding the protocol's remote-object model
//! - **Action synthesis**: clicks and moves become atomic pointer batches
//!
//! # Quick Start
//!
//! ```no_run
//! use bidi_clicker::{Result, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = Session::connect("ws://127.0.0.1:9222/session").await?;
//!
//!     // Find a button and click its center; None resolves the first
//!     // open browsing context
//!     let info = session.find_element(None, "#submit").await?;
//!     let (x, y) = info.center();
//!     session.click(None, x, y).await?;
//!
//!     // Or in one call
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
//! | [`session`] | [`Session`], element location, pointer input |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe id wrappers |
//! | [`protocol`] | Wire message types |
//! | [`transport`] | WebSocket dispatch loop |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for protocol entities.
///
/// Newtype wrappers prevent mixing incompatible ids at compile time.
pub mod identifiers;

/// Wire protocol message types.
///
/// Command/response envelopes and script value types.
pub mod protocol;

/// Browser automation session.
///
/// Use [`Session::connect`] to open a session over a WebSocket endpoint.
pub mod session;

/// WebSocket transport layer.
///
/// Command dispatch and response correlation.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Session types
pub use session::{BoxInfo, BrowsingContextInfo, ElementInfo, Session};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{BrowsingContext, CommandId};

// Transport types
pub use transport::Connection;
