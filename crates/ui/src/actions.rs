//! Action buttons: one in-flight request per button, busy-state
//! management, and outcome notifications.

use std::fmt::Display;
use std::future::Future;

use crate::notify::{Level, NotificationCenter};

/// Lifecycle of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Busy,
}

/// A button bound to a single one-shot action.
///
/// While a request is in flight the button is disabled and shows its
/// busy label; both the success and failure paths restore the original
/// label and enabled state.
#[derive(Debug)]
pub struct ActionButton {
    label: String,
    busy_label: String,
    state: ButtonState,
}

impl ActionButton {
    pub fn new(label: impl Into<String>, busy_label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            busy_label: busy_label.into(),
            state: ButtonState::Idle,
        }
    }

    /// Label to render right now.
    pub fn display_label(&self) -> &str {
        match self.state {
            ButtonState::Idle => &self.label,
            ButtonState::Busy => &self.busy_label,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state == ButtonState::Idle
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Transition idle → busy. Returns `false` (request must not be
    /// issued) when already busy — the disabled state swallows
    /// re-entrant clicks.
    fn try_begin(&mut self) -> bool {
        if self.state == ButtonState::Busy {
            return false;
        }
        self.state = ButtonState::Busy;
        true
    }

    fn finish(&mut self) {
        self.state = ButtonState::Idle;
    }
}

/// Outcome messages for [`run_action`].
#[derive(Debug, Clone)]
pub struct ActionMessages {
    pub success_title: String,
    pub success_message: String,
    pub failure_title: String,
    pub failure_message: String,
    /// Level of the success notification. Defaults to
    /// [`Level::Success`]; destructive actions acknowledge with a
    /// warning instead.
    pub success_level: Level,
}

impl ActionMessages {
    pub fn new(
        success_title: impl Into<String>,
        success_message: impl Into<String>,
        failure_title: impl Into<String>,
        failure_message: impl Into<String>,
    ) -> Self {
        Self {
            success_title: success_title.into(),
            success_message: success_message.into(),
            failure_title: failure_title.into(),
            failure_message: failure_message.into(),
            success_level: Level::Success,
        }
    }

    pub fn with_success_level(mut self, level: Level) -> Self {
        self.success_level = level;
        self
    }
}

/// Run a button's single request, managing busy state and notifications.
///
/// Returns `None` when the button was already busy (the request is not
/// issued). Otherwise the button is restored to idle on **both** the
/// success and failure paths, a success or error notification is
/// queued, and the request's result is handed back so the caller can
/// apply any state-changing effect (e.g. removing a resolved alert
/// row). A failure leaves application state untouched; no retry is
/// attempted.
pub async fn run_action<T, E, Fut>(
    button: &mut ActionButton,
    notifications: &mut NotificationCenter,
    messages: &ActionMessages,
    request: Fut,
) -> Option<Result<T, E>>
where
    E: Display,
    Fut: Future<Output = Result<T, E>>,
{
    if !button.try_begin() {
        return None;
    }

    let result = request.await;
    button.finish();

    match &result {
        Ok(_) => {
            notifications.push(
                &messages.success_title,
                &messages.success_message,
                messages.success_level,
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "Action request failed");
            notifications.error(&messages.failure_title, &messages.failure_message);
        }
    }

    Some(result)
}
