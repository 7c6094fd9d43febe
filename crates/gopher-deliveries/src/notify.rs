//! Outbound notifications to the robot's display, LEDs and button lights.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedPattern {
    RetainPrevious,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonLight {
    RetainPrevious,
    On,
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub led_pattern: LedPattern,
    pub button_confirm: ButtonLight,
    pub button_cancel: ButtonLight,
    pub message: String,
}

impl Notification {
    /// Light the confirm button while holding at a location.
    pub fn awaiting_confirmation() -> Self {
        Self {
            led_pattern: LedPattern::RetainPrevious,
            button_confirm: ButtonLight::On,
            button_cancel: ButtonLight::RetainPrevious,
            message: "at location, waiting for button press".to_string(),
        }
    }

    pub fn confirmed() -> Self {
        Self {
            led_pattern: LedPattern::RetainPrevious,
            button_confirm: ButtonLight::Off,
            button_cancel: ButtonLight::RetainPrevious,
            message: "go button was pressed".to_string(),
        }
    }

    pub fn recovering(reason: &str) -> Self {
        Self {
            led_pattern: LedPattern::Error,
            button_confirm: ButtonLight::On,
            button_cancel: ButtonLight::Off,
            message: format!("{reason}: teleop me home, then press go"),
        }
    }
}

/// Destination for notifications. Delivery is fire-and-forget.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, topic: &str, notification: Notification);
}

#[derive(Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _topic: &str, _notification: Notification) {}
}

/// Writes notifications to the log.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, topic: &str, notification: Notification) {
        tracing::debug!(
            topic,
            led = ?notification.led_pattern,
            confirm = ?notification.button_confirm,
            cancel = ?notification.button_cancel,
            message = %notification.message,
            "notification"
        );
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(String, Notification)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<(String, Notification)> {
        self.sent.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .map(|(_, n)| n.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, topic: &str, notification: Notification) {
        self.sent.lock().push((topic.to_string(), notification));
    }
}

/// A sink bound to the configured display topic.
#[derive(Clone)]
pub struct Notifier {
    topic: Arc<str>,
    sink: Arc<dyn NotificationSink>,
}

impl Notifier {
    pub fn new(topic: impl Into<Arc<str>>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            topic: topic.into(),
            sink,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn send(&self, notification: Notification) {
        self.sink.notify(&self.topic, notification);
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").field("topic", &self.topic).finish()
    }
}
