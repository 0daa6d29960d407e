//! Bounded system-log panel for the configuration page.
//!
//! Fed by `system_log` events and local action log entries. Oldest
//! lines fall off once the cap is reached.

use std::collections::VecDeque;

use fieldsense_core::format;
use fieldsense_core::types::Timestamp;

/// Lines kept in the panel.
const MAX_LINES: usize = 100;

#[derive(Debug, Default)]
pub struct LogPanel {
    lines: VecDeque<String>,
}

impl LogPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `[timestamp] LEVEL: message` line.
    pub fn append(&mut self, now: Timestamp, level: &str, message: &str) {
        while self.lines.len() >= MAX_LINES {
            self.lines.pop_front();
        }
        self.lines
            .push_back(format!("[{}] {level}: {message}", format::format_datetime(now)));
    }

    /// Reset the panel, leaving a single "logs cleared" marker.
    pub fn clear(&mut self, now: Timestamp) {
        self.lines.clear();
        self.append(now, "INFO", "Logs vidés");
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
