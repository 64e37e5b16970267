use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Success,
    Warn,
    Error,
}

/// Transient message shown in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
    pub shown_at: Option<Instant>,
    pub duration: Duration,
}

impl StatusMessage {
    #[must_use]
    pub fn new(level: StatusLevel, text: impl Into<String>, duration: Duration) -> Self {
        Self {
            level,
            text: text.into(),
            shown_at: None,
            duration,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.shown_at
            .is_some_and(|start| now.saturating_duration_since(start) > self.duration)
    }

    fn mark_shown(&mut self, now: Instant) {
        if self.shown_at.is_none() {
            self.shown_at = Some(now);
        }
    }
}

/// FIFO of status messages; the front one is on screen until it expires.
#[derive(Debug)]
pub struct StatusFeed {
    queue: VecDeque<StatusMessage>,
    default_duration: Duration,
    capacity: usize,
}

impl Default for StatusFeed {
    fn default() -> Self {
        Self::new(Duration::from_secs(4))
    }
}

impl StatusFeed {
    const CAPACITY: usize = 8;

    #[must_use]
    pub fn new(default_duration: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            default_duration,
            capacity: Self::CAPACITY,
        }
    }

    /// Queues a message. When full, the oldest waiting message is dropped.
    pub fn push(&mut self, level: StatusLevel, text: impl Into<String>) {
        if self.queue.len() >= self.capacity {
            // Keep the one on screen.
            self.queue.remove(1);
        }
        self.queue
            .push_back(StatusMessage::new(level, text, self.default_duration));
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(StatusLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(StatusLevel::Success, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(StatusLevel::Warn, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(StatusLevel::Error, text);
    }

    /// Advances the queue. Returns `true` if the visible message changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(front) = self.queue.front_mut() else {
            return false;
        };
        front.mark_shown(now);
        if !front.is_expired(now) {
            return false;
        }

        self.queue.pop_front();
        if let Some(next) = self.queue.front_mut() {
            next.mark_shown(now);
        }
        true
    }

    #[must_use]
    pub fn current(&self) -> Option<&StatusMessage> {
        self.queue.front()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_stays_until_expired() {
        let mut feed = StatusFeed::new(Duration::from_secs(2));
        let start = Instant::now();
        feed.info("Saved");

        assert!(!feed.tick(start));
        assert!(!feed.tick(start + Duration::from_secs(1)));
        assert_eq!(feed.current().unwrap().text, "Saved");

        assert!(feed.tick(start + Duration::from_secs(3)));
        assert!(feed.is_empty());
    }

    #[test]
    fn test_queue_advances_in_order() {
        let mut feed = StatusFeed::new(Duration::from_secs(1));
        let start = Instant::now();
        feed.success("first");
        feed.error("second");

        feed.tick(start);
        assert!(feed.tick(start + Duration::from_secs(2)));

        let current = feed.current().unwrap();
        assert_eq!(current.text, "second");
        assert_eq!(current.level, StatusLevel::Error);
        assert_eq!(current.shown_at, Some(start + Duration::from_secs(2)));
    }

    #[test]
    fn test_capacity_keeps_visible_message() {
        let mut feed = StatusFeed::default();
        for i in 0..12 {
            feed.warn(format!("msg {i}"));
        }

        assert_eq!(feed.queue.len(), StatusFeed::CAPACITY);
        assert_eq!(feed.current().unwrap().text, "msg 0");
        assert_eq!(feed.queue.back().unwrap().text, "msg 11");
    }
}
