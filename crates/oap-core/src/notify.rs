//! Side-channel notifications for data-quality problems found during a run.
//!
//! Notifications never fail generation: a [`Notifier`] receives each event
//! and is free to drop it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const EVENT_TYPE: &str = "KenticoDocs.Notification.Created";
pub const EVENT_SUBJECT: &str = "OpenAPI Processor notification";
pub const DATA_VERSION: &str = "1.0";
pub const MODE_ERROR: &str = "error";

/// Payload delivered to the notification channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub activity_title: String,
    pub text: String,
    pub mode: String,
}

/// Event envelope wrapping a [`Notification`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub id: Uuid,
    pub subject: String,
    pub event_type: String,
    pub data_version: String,
    pub event_time: DateTime<Utc>,
    pub data: Notification,
}

impl NotificationEvent {
    /// Compose an error-mode event with a fresh id and the current time.
    pub fn error(activity_title: impl Into<String>, text: impl Into<String>) -> Self {
        NotificationEvent {
            id: Uuid::new_v4(),
            subject: EVENT_SUBJECT.to_string(),
            event_type: EVENT_TYPE.to_string(),
            data_version: DATA_VERSION.to_string(),
            event_time: Utc::now(),
            data: Notification {
                activity_title: activity_title.into(),
                text: text.into(),
                mode: MODE_ERROR.to_string(),
            },
        }
    }

    /// Event for an `example` field that should hold JSON but does not parse.
    pub fn malformed_example(
        specification: &str,
        codename: &str,
        error: &serde_json::Error,
    ) -> Self {
        let text = format!(
            "Invalid JSON example in item {codename} of API Specification {specification}: {error}"
        );
        // Underscores are emphasis markers in the chat channel that renders this.
        Self::error("API Reference malformed example", text.replace('_', "\\_"))
    }
}

/// Receiver of notification events.
pub trait Notifier {
    fn notify(&mut self, event: NotificationEvent);
}

/// Writes every event to the log at `error` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, event: NotificationEvent) {
        log::error!("{}: {}", event.data.activity_title, event.data.text);
    }
}

/// Keeps events in memory so callers can forward or inspect them.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    pub events: Vec<NotificationEvent>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&mut self, event: NotificationEvent) {
        log::warn!("{}: {}", event.data.activity_title, event.data.text);
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_error_events() {
        let event = NotificationEvent::error("activity title", "notification text");
        assert!(!event.id.is_nil());
        assert_eq!(event.event_type, EVENT_TYPE);
        assert_eq!(event.data_version, "1.0");
        assert_eq!(event.data.mode, "error");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["data"]["activityTitle"], "activity title");
        assert_eq!(json["data"]["text"], "notification text");
        assert!(json["eventTime"].is_string());
    }

    #[test]
    fn malformed_example_text_escapes_underscores() {
        let error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let event = NotificationEvent::malformed_example("delivery_api", "user_object", &error);
        assert!(event.data.text.contains("user\\_object"));
        assert!(event.data.text.contains("delivery\\_api"));
    }

    #[test]
    fn collecting_notifier_keeps_events() {
        let mut notifier = CollectingNotifier::new();
        notifier.notify(NotificationEvent::error("a", "b"));
        notifier.notify(NotificationEvent::error("c", "d"));
        assert_eq!(notifier.events.len(), 2);
        assert_eq!(notifier.events[1].data.activity_title, "c");
    }

    #[test]
    fn notifiers_are_object_safe() {
        let mut sinks: Vec<Box<dyn Notifier>> =
            vec![Box::new(LogNotifier), Box::new(CollectingNotifier::new())];
        for sink in &mut sinks {
            sink.notify(NotificationEvent::error("title", "text"));
        }
    }
}
