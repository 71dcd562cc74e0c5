//! Element location and geometry.
//!
//! Location runs a small function inside the target context that finds the
//! first node matching a CSS selector and reports its tag, trimmed text,
//! and bounding box. The in-browser script self-serializes its result to a
//! JSON string, sidestepping the protocol's recursive remote-object model:
//! the outer decode (remote value envelope) and the inner decode
//! ([`ElementInfo`]) are two explicit, independently testable stages.

// ============================================================================
// Imports
// ============================================================================

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::BrowsingContext;
use crate::protocol::{
    CallFunctionParams, Command, EvaluateResult, LocalValue, RemoteValue, ResultOwnership, Target,
};

use super::Session;

// ============================================================================
// Constants
// ============================================================================

/// Function body evaluated inside the browsing context.
///
/// The selector arrives as a structured argument, never spliced into the
/// source, so selector text cannot alter the script. Visible text is
/// trimmed and capped at 100 code units.
const LOCATE_SCRIPT: &str = r"
(selector) => {
    const el = document.querySelector(selector);
    if (!el) return null;
    const rect = el.getBoundingClientRect();
    return JSON.stringify({
        tag: el.tagName,
        text: (el.textContent || '').trim().substring(0, 100),
        box: {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height
        }
    });
}";

// ============================================================================
// ElementInfo
// ============================================================================

/// Information about a located element.
///
/// Computed fresh on every locate call from the current DOM snapshot; the
/// client caches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    /// Opaque handle to the script-side element reference, when one was
    /// taken. The locate script does not produce one.
    #[serde(rename = "sharedId", default, skip_serializing_if = "Option::is_none")]
    pub shared_id: Option<String>,

    /// Uppercase element tag name.
    pub tag: String,

    /// Trimmed visible text, capped at 100 code units.
    #[serde(default)]
    pub text: String,

    /// Bounding box geometry.
    pub r#box: BoxInfo,
}

impl ElementInfo {
    /// Returns the center of the bounding box.
    ///
    /// Pure arithmetic; a degenerate zero-size box still yields a defined
    /// center.
    #[inline]
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            self.r#box.x + self.r#box.width / 2.0,
            self.r#box.y + self.r#box.height / 2.0,
        )
    }
}

// ============================================================================
// BoxInfo
// ============================================================================

/// Bounding box in CSS pixels, relative to the viewport.
///
/// Width and height are non-negative when the element has a render box and
/// zero when it is detached or `display: none`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxInfo {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

// ============================================================================
// Session - Element Location
// ============================================================================

impl Session {
    /// Finds the first element matching a CSS selector.
    ///
    /// Resolves the context if `None`, evaluates the locate script inside
    /// it, and decodes the two result stages.
    ///
    /// # Errors
    ///
    /// - [`Error::ElementNotFound`] if no element matches the selector
    /// - [`Error::ScriptException`] if the script threw in the browser
    /// - [`Error::Decode`] if either decode stage fails (protocol or
    ///   script/schema drift, never swallowed)
    /// - Context resolution and dispatcher errors
    pub async fn find_element(
        &self,
        context: Option<&BrowsingContext>,
        selector: &str,
    ) -> Result<ElementInfo> {
        let context = self.resolve_context(context).await?;
        debug!(%context, selector, "Locating element");

        let params = CallFunctionParams {
            function_declaration: LOCATE_SCRIPT.to_string(),
            await_promise: false,
            target: Target { context },
            arguments: vec![LocalValue::string(selector)],
            result_ownership: Some(ResultOwnership::Root),
        };

        let result = self.send_command(Command::CallFunction(params)).await?;

        // Stage 1: the evaluation outcome and its remote value envelope
        let outcome: EvaluateResult = serde_json::from_value(result)
            .map_err(|e| Error::decode("script.callFunction result", e))?;

        let value = match outcome {
            EvaluateResult::Exception { exception_details } => {
                return Err(Error::script_exception(exception_details.text));
            }
            EvaluateResult::Success { result } => result,
        };

        // Stage 2: the JSON string the script serialized itself
        match value {
            RemoteValue::Null | RemoteValue::Undefined => {
                Err(Error::element_not_found(selector))
            }
            RemoteValue::String { value } => {
                serde_json::from_str(&value).map_err(|e| Error::decode("element info", e))
            }
            RemoteValue::Other => Err(Error::decode(
                "remote value",
                serde_json::Error::custom("expected a string value from the locate script"),
            )),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
