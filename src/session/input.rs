//! Pointer action synthesis.
//!
//! Turns high-level intents (click, double-click, move) into the
//! browser-defined sequence of primitive pointer steps and submits them as
//! one atomic `input.performActions` batch. The browser executes the batch
//! as a single continuous gesture; if the send fails, no steps are assumed
//! to have executed.

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::error::Result;
use crate::identifiers::BrowsingContext;
use crate::protocol::{Command, PerformActionsParams, PointerAction, SourceActions};

use super::Session;

// ============================================================================
// Session - Input Actions
// ============================================================================

impl Session {
    /// Submits an action batch to the resolved context.
    ///
    /// # Errors
    ///
    /// Context resolution and dispatcher errors.
    pub async fn perform_actions(
        &self,
        context: Option<&BrowsingContext>,
        actions: Vec<SourceActions>,
    ) -> Result<()> {
        let context = self.resolve_context(context).await?;

        let params = PerformActionsParams { context, actions };
        self.send_command(Command::PerformActions(params)).await?;

        Ok(())
    }

    /// Clicks the primary button at viewport coordinates.
    ///
    /// One pointer source, three steps: instantaneous move to the
    /// truncated coordinates, button down, button up.
    ///
    /// # Errors
    ///
    /// See [`Session::perform_actions`].
    pub async fn click(
        &self,
        context: Option<&BrowsingContext>,
        x: f64,
        y: f64,
    ) -> Result<()> {
        debug!(x, y, "Click");

        let actions = vec![SourceActions::mouse(vec![
            PointerAction::move_to(x, y),
            PointerAction::down(),
            PointerAction::up(),
        ])];

        self.perform_actions(context, actions).await
    }

    /// Double-clicks the primary button at viewport coordinates.
    ///
    /// Same move, then two full click cycles at the same point with zero
    /// inter-click delay.
    ///
    /// # Errors
    ///
    /// See [`Session::perform_actions`].
    pub async fn double_click(
        &self,
        context: Option<&BrowsingContext>,
        x: f64,
        y: f64,
    ) -> Result<()> {
        debug!(x, y, "Double click");

        let actions = vec![SourceActions::mouse(vec![
            PointerAction::move_to(x, y),
            PointerAction::down(),
            PointerAction::up(),
            PointerAction::down(),
            PointerAction::up(),
        ])];

        self.perform_actions(context, actions).await
    }

    /// Moves the pointer to viewport coordinates without any button
    /// transition.
    ///
    /// # Errors
    ///
    /// See [`Session::perform_actions`].
    pub async fn move_mouse(
        &self,
        context: Option<&BrowsingContext>,
        x: f64,
        y: f64,
    ) -> Result<()> {
        debug!(x, y, "Move mouse");

        let actions = vec![SourceActions::mouse(vec![PointerAction::move_to(x, y)])];

        self.perform_actions(context, actions).await
    }

    /// Finds an element by selector and clicks its center.
    ///
    /// # Errors
    ///
    /// Whatever [`Session::find_element`] failed with if the element was
    /// not located, otherwise whatever the click submission failed with.
    pub async fn click_element(
        &self,
        context: Option<&BrowsingContext>,
        selector: &str,
    ) -> Result<()> {
        let info = self.find_element(context, selector).await?;
        let (x, y) = info.center();

        self.click(context, x, y).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::connection::testwire::{WireHarness, connection_pair};

    use serde_json::json;

    fn session_pair() -> (Session, WireHarness) {
        let (connection, harness) = connection_pair();
        (Session::new(connection), harness)
    }

    fn ctx() -> BrowsingContext {
        BrowsingContext::from("ctx-1")
    }

    #[tokio::test]
    async fn test_click_submits_one_source_with_three_steps() {
        let (session, mut harness) = session_pair();
        let context = ctx();

        let task =
            tokio::spawn(async move { session.click(Some(&context), 100.7, 200.2).await });

        let envelope = harness.next_command().await;
        assert_eq!(envelope["method"], "input.performActions");
        assert_eq!(envelope["params"]["context"], "ctx-1");

        let sources = envelope["params"]["actions"].as_array().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0]["type"], "pointer");
        assert_eq!(sources[0]["id"], "mouse");

        let steps = sources[0]["actions"].as_array().unwrap();
        assert_eq!(
            steps,
            &vec![
                json!({"type": "pointerMove", "x": 100, "y": 200, "duration": 0}),
                json!({"type": "pointerDown", "button": 0}),
                json!({"type": "pointerUp", "button": 0}),
            ]
        );

        harness.respond_success(envelope["id"].as_u64().unwrap(), json!({}));
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_double_click_has_one_move_and_four_transitions() {
        let (session, mut harness) = session_pair();
        let context = ctx();

        let task =
            tokio::spawn(async move { session.double_click(Some(&context), 50.0, 60.0).await });

        let envelope = harness.next_command().await;
        let steps = envelope["params"]["actions"][0]["actions"].as_array().unwrap();

        assert_eq!(
            steps,
            &vec![
                json!({"type": "pointerMove", "x": 50, "y": 60, "duration": 0}),
                json!({"type": "pointerDown", "button": 0}),
                json!({"type": "pointerUp", "button": 0}),
                json!({"type": "pointerDown", "button": 0}),
                json!({"type": "pointerUp", "button": 0}),
            ]
        );

        harness.respond_success(envelope["id"].as_u64().unwrap(), json!({}));
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_move_mouse_is_a_single_step() {
        let (session, mut harness) = session_pair();
        let context = ctx();

        let task =
            tokio::spawn(async move { session.move_mouse(Some(&context), 5.9, 7.1).await });

        let envelope = harness.next_command().await;
        let steps = envelope["params"]["actions"][0]["actions"].as_array().unwrap();

        assert_eq!(
            steps,
            &vec![json!({"type": "pointerMove", "x": 5, "y": 7, "duration": 0})]
        );

        harness.respond_success(envelope["id"].as_u64().unwrap(), json!({}));
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_click_resolves_default_context_first() {
        let (session, mut harness) = session_pair();

        let task = tokio::spawn(async move { session.click(None, 1.0, 2.0).await });

        let tree = harness.next_command().await;
        assert_eq!(tree["method"], "browsingContext.getTree");
        harness.respond_success(
            tree["id"].as_u64().unwrap(),
            json!({"contexts": [{"context": "c1", "url": "about:blank"}]}),
        );

        let perform = harness.next_command().await;
        assert_eq!(perform["method"], "input.performActions");
        assert_eq!(perform["params"]["context"], "c1");
        harness.respond_success(perform["id"].as_u64().unwrap(), json!({}));

        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_click_element_clicks_the_located_center() {
        let (session, mut harness) = session_pair();
        let context = ctx();

        let task =
            tokio::spawn(async move { session.click_element(Some(&context), "#go").await });

        let find = harness.next_command().await;
        assert_eq!(find["method"], "script.callFunction");
        let inner = json!({
            "tag": "BUTTON",
            "text": "Go",
            "box": {"x": 10.5, "y": 20.5, "width": 3.0, "height": 5.0}
        });
        harness.respond_success(
            find["id"].as_u64().unwrap(),
            json!({
                "type": "success",
                "result": {"type": "string", "value": inner.to_string()},
                "realm": "realm-1"
            }),
        );

        // Center is (12.0, 23.0); the move step carries it truncated
        let perform = harness.next_command().await;
        assert_eq!(perform["method"], "input.performActions");
        let steps = perform["params"]["actions"][0]["actions"].as_array().unwrap();
        assert_eq!(
            steps[0],
            json!({"type": "pointerMove", "x": 12, "y": 23, "duration": 0})
        );

        harness.respond_success(perform["id"].as_u64().unwrap(), json!({}));
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_click_element_propagates_locate_failure() {
        let (session, mut harness) = session_pair();
        let context = ctx();

        let task =
            tokio::spawn(async move { session.click_element(Some(&context), "#gone").await });

        let find = harness.next_command().await;
        harness.respond_success(
            find["id"].as_u64().unwrap(),
            json!({"type": "success", "result": {"type": "null"}, "realm": "realm-1"}),
        );

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::ElementNotFound { .. }));
        assert!(
            harness.try_next_command().is_none(),
            "no actions submitted after a failed locate"
        );
    }
}
