use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

/// How many notifications stay visible at once; older ones fall out.
const VISIBLE_WINDOW: usize = 5;
/// Per-notification lifetime.
const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: u64,
    pub level: Level,
    pub title: String,
    pub message: String,
    #[serde(skip)]
    deadline: Instant,
}

/// Process-wide, append-only toast queue with a bounded visible window.
/// Teardown is per-notification timeout, not process lifecycle.
pub struct NotificationCenter {
    queue: VecDeque<Notification>,
    next_id: u64,
    window: usize,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::with_settings(VISIBLE_WINDOW, NOTIFICATION_TTL)
    }

    pub fn with_settings(window: usize, ttl: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            next_id: 0,
            window,
            ttl,
        }
    }

    /// Append a notification, trimming the oldest entries past the window.
    pub fn push(&mut self, level: Level, title: &str, message: &str) -> Notification {
        let notification = Notification {
            id: self.next_id,
            level,
            title: title.to_string(),
            message: message.to_string(),
            deadline: Instant::now() + self.ttl,
        };
        self.next_id += 1;
        self.queue.push_back(notification.clone());
        while self.queue.len() > self.window {
            self.queue.pop_front();
        }
        notification
    }

    pub fn visible(&self) -> Vec<Notification> {
        self.visible_at(Instant::now())
    }

    fn visible_at(&self, now: Instant) -> Vec<Notification> {
        self.queue
            .iter()
            .filter(|notification| notification.deadline > now)
            .cloned()
            .collect()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_is_append_only_with_increasing_ids() {
        let mut center = NotificationCenter::new();
        let first = center.push(Level::Success, "Student deleted", "gone");
        let second = center.push(Level::Error, "Error", "failed");
        assert!(second.id > first.id);

        let visible = center.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].id, first.id);
        assert_eq!(visible[1].id, second.id);
    }

    #[test]
    fn test_window_drops_the_oldest() {
        let mut center = NotificationCenter::with_settings(2, Duration::from_secs(60));
        center.push(Level::Success, "a", "");
        center.push(Level::Success, "b", "");
        center.push(Level::Success, "c", "");

        let visible = center.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].title, "b");
        assert_eq!(visible[1].title, "c");
    }

    #[test]
    fn test_notifications_expire_individually() {
        let mut center = NotificationCenter::with_settings(5, Duration::from_secs(5));
        let pushed = center.push(Level::Success, "a", "");

        assert_eq!(center.visible_at(Instant::now()).len(), 1);
        assert!(center
            .visible_at(pushed.deadline + Duration::from_millis(1))
            .is_empty());
    }
}
