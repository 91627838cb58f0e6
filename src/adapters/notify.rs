//! Notifier adapters.

use std::sync::Mutex;

use tracing::{error, info};

use crate::domain::ports::Notifier;

/// Sends notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, is_error: bool) {
        if is_error {
            error!(notification = message, "notification");
        } else {
            info!(notification = message, "notification");
        }
    }
}

/// Keeps every notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, bool)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, with their error flag.
    pub fn messages(&self) -> Vec<(String, bool)> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, is_error: bool) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((message.to_string(), is_error));
        }
    }
}
