//! Script value types.
//!
//! The protocol wraps every value crossing the script boundary in a typed
//! envelope. Outbound arguments are [`LocalValue`]; returned values are
//! [`RemoteValue`]. A script evaluation as a whole yields an
//! [`EvaluateResult`], which is either a normal result or an exception
//! raised inside the page realm.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// LocalValue
// ============================================================================

/// A value passed from the client into a script evaluation.
///
/// Arguments are always structured — never interpolated into the function
/// source — so selector text cannot break out of the script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LocalValue {
    /// A string argument.
    #[serde(rename = "string")]
    String {
        /// The string payload.
        value: String,
    },

    /// A number argument.
    #[serde(rename = "number")]
    Number {
        /// The numeric payload.
        value: f64,
    },

    /// A boolean argument.
    #[serde(rename = "boolean")]
    Boolean {
        /// The boolean payload.
        value: bool,
    },
}

impl LocalValue {
    /// Creates a string argument.
    #[inline]
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String {
            value: value.into(),
        }
    }
}

// ============================================================================
// RemoteValue
// ============================================================================

/// A value returned from a script evaluation.
///
/// Only the types this client consumes are modeled; anything else decodes
/// to [`RemoteValue::Other`] and is rejected by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum RemoteValue {
    /// A string value, carried inline.
    #[serde(rename = "string")]
    String {
        /// The string payload.
        value: String,
    },

    /// The JavaScript `null` value.
    #[serde(rename = "null")]
    Null,

    /// The JavaScript `undefined` value.
    #[serde(rename = "undefined")]
    Undefined,

    /// Any other remote value type (object, node, array, ...).
    ///
    /// These carry handles into the browser's recursive remote-object
    /// model, which this client deliberately avoids.
    #[serde(other)]
    Other,
}

// ============================================================================
// EvaluateResult
// ============================================================================

/// Outcome of a `script.callFunction` command.
///
/// The command itself succeeding does not mean the script did: an exception
/// raised inside the page arrives as a successful command response with an
/// `exception` outcome.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum EvaluateResult {
    /// The script returned normally.
    #[serde(rename = "success")]
    Success {
        /// The returned value.
        result: RemoteValue,
    },

    /// The script threw.
    #[serde(rename = "exception")]
    Exception {
        /// Details of the thrown exception.
        #[serde(rename = "exceptionDetails")]
        exception_details: ExceptionDetails,
    },
}

// ============================================================================
// ExceptionDetails
// ============================================================================

/// Browser-reported detail of a script exception.
#[derive(Debug, Clone, Deserialize)]
pub struct ExceptionDetails {
    /// Stringified exception message.
    #[serde(default)]
    pub text: String,

    /// Source line where the exception was raised.
    #[serde(rename = "lineNumber", default)]
    pub line_number: Option<u64>,

    /// Source column where the exception was raised.
    #[serde(rename = "columnNumber", default)]
    pub column_number: Option<u64>,
}

// ============================================================================
// Tests
// ============================================================================
