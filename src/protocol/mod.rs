//! Wire protocol message types.
//!
//! This module defines the JSON message format exchanged with the browser
//! over the control channel.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | [`CommandEnvelope`] | Client → Browser | Command with correlation id |
//! | [`IncomingMessage::Success`] | Browser → Client | Command result |
//! | [`IncomingMessage::Error`] | Browser → Client | Command failure |
//! | [`IncomingMessage::Event`] | Browser → Client | Unsolicited notification |
//!
//! # Command Naming
//!
//! Commands follow `module.methodName` format:
//!
//! - `browsingContext.getTree`
//! - `script.callFunction`
//! - `input.performActions`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Command definitions and typed params |
//! | `message` | Envelope and inbound message types |
//! | `value` | Script argument and remote value types |

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions organized by module.
pub mod command;

/// Wire message envelopes.
pub mod message;

/// Script value types.
pub mod value;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{
    CallFunctionParams, Command, GetTreeParams, PerformActionsParams, PointerAction,
    PointerParameters, PointerSourceActions, PointerType, ResultOwnership, SourceActions, Target,
    MOUSE_POINTER_ID, PRIMARY_BUTTON,
};
pub use message::{CommandEnvelope, CommandResponse, ErrorResponse, EventMessage, IncomingMessage};
pub use value::{EvaluateResult, ExceptionDetails, LocalValue, RemoteValue};
