//! # Narration Log
//!
//! Append-only, ordered record of every narrated [`Message`] in a run.
//! Observers subscribe through a broadcast channel; a message is visible in
//! the log before any observer is notified.

use crate::message::{Message, MessageKind};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Debug, Default)]
struct LogInner {
    messages: Vec<Message>,
    last_id: u64,
}

/// Shared handle to a run's narration history. Cloning shares the log.
#[derive(Debug, Clone)]
pub struct NarrationLog {
    inner: Arc<Mutex<LogInner>>,
    events: broadcast::Sender<Message>,
}

impl NarrationLog {
    pub fn new(capacity: usize) -> Self {
        let (events, _rx) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(Mutex::new(LogInner::default())),
            events,
        }
    }

    /// Append a message and notify observers. Returns the stored message.
    pub fn append(&self, text: impl Into<String>, kind: MessageKind) -> Message {
        let message = {
            let mut inner = self.inner.lock();
            inner.last_id += 1;
            let message = Message {
                id: inner.last_id,
                text: text.into(),
                kind,
            };
            inner.messages.push(message.clone());
            message
        };
        // No subscribers is fine; the log itself is the source of truth.
        let _ = self.events.send(message.clone());
        message
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.events.subscribe()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner.lock().messages.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all history and restart ids at 1.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.messages.clear();
        inner.last_id = 0;
    }
}

impl Default for NarrationLog {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_in_order_and_notifies() {
        let log = NarrationLog::default();
        let mut rx = log.subscribe();

        log.append("first", MessageKind::Header);
        log.append("second", MessageKind::Dim);

        let ids: Vec<u64> = log.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(rx.recv().await.unwrap().text, "first");
        assert_eq!(rx.recv().await.unwrap().text, "second");
    }

    #[test]
    fn clear_restarts_ids() {
        let log = NarrationLog::default();
        log.append("a", MessageKind::System);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.append("b", MessageKind::System).id, 1);
    }
}
