//! Command definitions organized by module.
//!
//! Commands follow the protocol's `module.methodName` format. Each command
//! kind carries a fixed params struct, serialized at the boundary — no
//! dynamically built key/value maps, so a wrong key name is a compile
//! error rather than a silently ignored field.
//!
//! # Command Modules
//!
//! | Module | Commands |
//! |--------|----------|
//! | `browsingContext` | Context enumeration |
//! | `script` | In-page function calls |
//! | `input` | Pointer action batches |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::identifiers::BrowsingContext;

use super::value::LocalValue;

// ============================================================================
// Constants
// ============================================================================

/// Device id for the synthetic mouse pointer source.
pub const MOUSE_POINTER_ID: &str = "mouse";

/// Button code for the primary (left) mouse button.
pub const PRIMARY_BUTTON: u64 = 0;

// ============================================================================
// Command
// ============================================================================

/// All protocol commands used by this client.
///
/// Serializes as `{"method": "module.methodName", "params": {...}}`; the
/// dispatcher wraps it with a correlation id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum Command {
    /// Enumerate the open browsing contexts.
    #[serde(rename = "browsingContext.getTree")]
    GetTree(GetTreeParams),

    /// Call a function inside a browsing context.
    #[serde(rename = "script.callFunction")]
    CallFunction(CallFunctionParams),

    /// Submit an atomic batch of input actions.
    #[serde(rename = "input.performActions")]
    PerformActions(PerformActionsParams),
}

// ============================================================================
// BrowsingContext Params
// ============================================================================

/// Parameters for `browsingContext.getTree`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetTreeParams {
    /// Depth limit for the returned tree; `None` returns the full tree.
    #[serde(rename = "maxDepth", skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u64>,
}

// ============================================================================
// Script Params
// ============================================================================

/// Parameters for `script.callFunction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallFunctionParams {
    /// Source of the function to call, e.g. `(selector) => { ... }`.
    #[serde(rename = "functionDeclaration")]
    pub function_declaration: String,

    /// Whether to await a returned promise before responding.
    #[serde(rename = "awaitPromise")]
    pub await_promise: bool,

    /// Realm the function runs in.
    pub target: Target,

    /// Typed arguments passed to the function.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<LocalValue>,

    /// Ownership policy for a returned object handle.
    #[serde(rename = "resultOwnership", skip_serializing_if = "Option::is_none")]
    pub result_ownership: Option<ResultOwnership>,
}

/// Script target naming a browsing context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// The context whose realm the script runs in.
    pub context: BrowsingContext,
}

/// Ownership policy for object handles returned from a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOwnership {
    /// Hand ownership of the handle to the top-level realm.
    ///
    /// Required for fire-and-interpret usage: the browser must not tie
    /// the returned handle's lifetime to the page realm.
    Root,
    /// Leave the handle owned by the realm that produced it.
    None,
}

// ============================================================================
// Input Params
// ============================================================================

/// Parameters for `input.performActions`.
///
/// The whole action list is delivered as one request; the browser executes
/// it as one continuous gesture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformActionsParams {
    /// Context the gesture targets.
    pub context: BrowsingContext,

    /// Input sources with their ordered action steps.
    pub actions: Vec<SourceActions>,
}

/// Actions for one virtual input device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceActions {
    /// A pointer device (mouse, pen, touch).
    #[serde(rename = "pointer")]
    Pointer(PointerSourceActions),
}

impl SourceActions {
    /// Creates a mouse pointer source with the given action steps.
    #[inline]
    #[must_use]
    pub fn mouse(actions: Vec<PointerAction>) -> Self {
        Self::Pointer(PointerSourceActions {
            id: MOUSE_POINTER_ID.to_string(),
            parameters: PointerParameters {
                pointer_type: PointerType::Mouse,
            },
            actions,
        })
    }
}

/// Action steps for a single pointer source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerSourceActions {
    /// Device id, stable across batches on the same connection.
    pub id: String,

    /// Pointer characteristics.
    pub parameters: PointerParameters,

    /// Ordered primitive steps.
    pub actions: Vec<PointerAction>,
}

/// Pointer device characteristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerParameters {
    /// Kind of pointer being simulated.
    #[serde(rename = "pointerType")]
    pub pointer_type: PointerType,
}

/// Kind of pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerType {
    /// Mouse pointer.
    Mouse,
}

/// A primitive pointer input step.
///
/// Coordinates are integer CSS pixels; the protocol rejects fractional
/// values, so callers truncate before building a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PointerAction {
    /// Move the pointer to viewport coordinates.
    #[serde(rename = "pointerMove")]
    Move {
        /// Target x in CSS pixels.
        x: i64,
        /// Target y in CSS pixels.
        y: i64,
        /// Move duration in milliseconds (0 = instantaneous).
        duration: u64,
    },

    /// Press a button.
    #[serde(rename = "pointerDown")]
    Down {
        /// Button code (0 = primary).
        button: u64,
    },

    /// Release a button.
    #[serde(rename = "pointerUp")]
    Up {
        /// Button code (0 = primary).
        button: u64,
    },
}

impl PointerAction {
    /// Creates an instantaneous move, truncating coordinates to integers.
    #[inline]
    #[must_use]
    pub fn move_to(x: f64, y: f64) -> Self {
        Self::Move {
            x: x as i64,
            y: y as i64,
            duration: 0,
        }
    }

    /// Creates a primary-button press.
    #[inline]
    #[must_use]
    pub fn down() -> Self {
        Self::Down {
            button: PRIMARY_BUTTON,
        }
    }

    /// Creates a primary-button release.
    #[inline]
    #[must_use]
    pub fn up() -> Self {
        Self::Up {
            button: PRIMARY_BUTTON,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
