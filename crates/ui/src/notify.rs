//! Transient user-facing notifications.

use std::collections::VecDeque;

/// Visual style of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Danger,
}

impl Level {
    pub fn css_class(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Warning => "warning",
            Level::Danger => "danger",
        }
    }
}

/// One toast-style notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: Level,
}

/// Bounded queue of pending notifications, oldest first.
///
/// The renderer drains this queue; anything past the cap pushes the
/// oldest entry out, matching the transient 5-second toasts of the
/// original UI.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    pending: VecDeque<Notification>,
}

/// Keep at most this many undrained notifications.
const MAX_PENDING: usize = 10;

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, title: impl Into<String>, message: impl Into<String>, level: Level) {
        while self.pending.len() >= MAX_PENDING {
            self.pending.pop_front();
        }
        self.pending.push_back(Notification {
            title: title.into(),
            message: message.into(),
            level,
        });
    }

    pub fn success(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.push(title, message, Level::Success);
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.push(title, message, Level::Danger);
    }

    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.push(title, message, Level::Info);
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Notification> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
