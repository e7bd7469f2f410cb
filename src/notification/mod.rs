//! Single-slot, self-dismissing user notifications.
//!
//! There is at most one notification. `show` replaces whatever is there and
//! restarts the dismiss timer; a timer belonging to a replaced notification
//! does nothing when it fires.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub visible: bool,
}

#[derive(Debug, Default)]
struct Slot {
    notification: Option<Notification>,
    // bumped by every show/hide; a timer only fires for its own generation
    generation: u64,
}

#[derive(Clone)]
pub struct NotificationQueue {
    slot: Arc<watch::Sender<Slot>>,
    timeout: Duration,
}

impl NotificationQueue {
    pub fn new(timeout: Duration) -> Self {
        let (slot, _) = watch::channel(Slot::default());
        Self {
            slot: Arc::new(slot),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Replaces the current notification and schedules its dismissal.
    ///
    /// Outside a tokio runtime nothing is scheduled and the notification stays
    /// until `hide` or the next `show`.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) {
        let message = message.into();
        log::debug!("Notification ({:?}): {}", kind, message);

        let mut generation = 0;
        self.slot.send_modify(|slot| {
            slot.generation += 1;
            generation = slot.generation;
            slot.notification = Some(Notification {
                message,
                kind,
                visible: true,
            });
        });

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::debug!("No runtime, notification will not auto-dismiss");
            return;
        };

        let slot = Arc::clone(&self.slot);
        let timeout = self.timeout;
        handle.spawn(async move {
            tokio::time::sleep(timeout).await;
            slot.send_if_modified(|slot| {
                if slot.generation != generation {
                    return false;
                }
                if let Some(notification) = slot.notification.as_mut() {
                    notification.visible = false;
                }
                true
            });
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Error);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Info);
    }

    /// Hides immediately. Calling it with nothing visible is a no-op.
    pub fn hide(&self) {
        self.slot.send_if_modified(|slot| match slot.notification.as_mut() {
            Some(notification) if notification.visible => {
                notification.visible = false;
                slot.generation += 1;
                true
            }
            _ => false,
        });
    }

    /// The visible notification, if any.
    pub fn current(&self) -> Option<Notification> {
        self.slot
            .borrow()
            .notification
            .as_ref()
            .filter(|n| n.visible)
            .cloned()
    }

    /// Change feed for renderers; yields the visible notification after each change.
    pub fn subscribe(&self) -> NotificationReceiver {
        NotificationReceiver {
            rx: self.slot.subscribe(),
        }
    }
}

pub struct NotificationReceiver {
    rx: watch::Receiver<Slot>,
}

impl NotificationReceiver {
    /// Waits for the next change. `None` once the queue is dropped.
    pub async fn changed(&mut self) -> Option<Option<Notification>> {
        self.rx.changed().await.ok()?;
        let slot = self.rx.borrow_and_update();
        Some(slot.notification.as_ref().filter(|n| n.visible).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(3000);

    #[tokio::test(start_paused = true)]
    async fn test_show_then_auto_dismiss() {
        let queue = NotificationQueue::new(TIMEOUT);
        queue.success("Login successful!");

        assert_eq!(queue.current().map(|n| n.kind), Some(NotificationKind::Success));

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(queue.current().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(queue.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_show_replaces_first_and_restarts_timer() {
        let queue = NotificationQueue::new(TIMEOUT);
        queue.info("first");

        tokio::time::sleep(Duration::from_millis(2000)).await;
        queue.error("second");

        let current = queue.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, NotificationKind::Error);

        // the first timer fires here and must not dismiss the second message
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(queue.current().map(|n| n.message), Some("second".to_string()));

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(queue.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_is_immediate_and_idempotent() {
        let queue = NotificationQueue::new(TIMEOUT);
        queue.success("Deleted successfully.");

        queue.hide();
        assert!(queue.current().is_none());
        queue.hide();
        assert!(queue.current().is_none());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert!(queue.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_changes() {
        let queue = NotificationQueue::new(TIMEOUT);
        let mut rx = queue.subscribe();

        queue.error("Invalid credentials");
        let shown = rx.changed().await.unwrap().unwrap();
        assert_eq!(shown.message, "Invalid credentials");

        let dismissed = rx.changed().await.unwrap();
        assert!(dismissed.is_none());
    }

    #[test]
    fn test_show_without_runtime_stays_until_hidden() {
        let queue = NotificationQueue::new(TIMEOUT);
        queue.info("offline");
        assert!(queue.current().is_some());
        queue.hide();
        assert!(queue.current().is_none());
    }
}
