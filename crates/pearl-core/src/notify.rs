//! Notification delivery collaborators.
//!
//! The engine hands every notification to its [`NotificationSink`] as soon as
//! it is produced and also queues it for [`drain_notifications`]. How a
//! notification reaches the player is the sink's business.
//!
//! [`drain_notifications`]: crate::engine::CompanionEngine::drain_notifications

use std::sync::{Arc, Mutex, PoisonError};

use pearl_types::Notification;
use tracing::info;

/// Receives notifications as the engine produces them.
pub trait NotificationSink: Send {
    /// Deliver one notification. Must not block for long.
    fn deliver(&mut self, notification: &Notification);
}

/// Logs each notification through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn deliver(&mut self, notification: &Notification) {
        info!(
            kind = ?notification.kind,
            title = %notification.title,
            body = %notification.body,
            "notification"
        );
    }
}

/// Collects notifications into a shared list. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    delivered: Arc<Mutex<Vec<Notification>>>,
}

impl CollectingSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far.
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationSink for CollectingSink {
    fn deliver(&mut self, notification: &Notification) {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use pearl_types::NotificationKind;

    use super::*;

    #[test]
    fn collecting_sink_shares_between_clones() {
        let sink = CollectingSink::new();
        let mut handle = sink.clone();
        handle.deliver(&Notification::new(NotificationKind::DailyReward, "a", "b"));
        assert_eq!(sink.delivered().len(), 1);
    }
}
