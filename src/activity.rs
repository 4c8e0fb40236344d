use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::{broadcast, RwLock};

use crate::config::ACTIVITY_BUFFER_SIZE;

/// One engine event: a refresh tick, an insight request, a chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub source: ActivitySource,
    pub level: ActivityLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySource {
    Simulator,
    Insights,
    Chat,
    Server,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Info,
    Warn,
    Error,
}

pub struct ActivityLog {
    buffer: RwLock<VecDeque<ActivityEntry>>,
    sender: broadcast::Sender<ActivityEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::with_capacity(ACTIVITY_BUFFER_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(256);
        Self {
            buffer: RwLock::new(VecDeque::with_capacity(capacity)),
            sender,
            capacity: capacity.max(1),
        }
    }

    pub async fn push(&self, entry: ActivityEntry) {
        let mut buf = self.buffer.write().await;
        if buf.len() >= self.capacity {
            buf.pop_front();
        }
        buf.push_back(entry.clone());
        drop(buf);

        let _ = self.sender.send(entry);
    }

    pub async fn history(&self) -> Vec<ActivityEntry> {
        self.buffer.read().await.iter().cloned().collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEntry> {
        self.sender.subscribe()
    }

    pub async fn emit(
        &self,
        source: ActivitySource,
        level: ActivityLevel,
        message: impl Into<String>,
    ) {
        let entry = ActivityEntry {
            timestamp: Utc::now(),
            source,
            level,
            message: message.into(),
        };
        self.push(entry).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ring_buffer_drops_oldest() {
        let log = ActivityLog::with_capacity(3);
        for i in 0..5 {
            log.emit(ActivitySource::Simulator, ActivityLevel::Info, format!("tick {}", i))
                .await;
        }
        let history = log.history().await;
        let messages: Vec<&str> = history.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["tick 2", "tick 3", "tick 4"]);
    }

    #[tokio::test]
    async fn test_subscribers_receive_entries() {
        let log = ActivityLog::new();
        let mut rx = log.subscribe();
        log.emit(ActivitySource::Chat, ActivityLevel::Warn, "fallback sent")
            .await;
        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.source, ActivitySource::Chat);
        assert_eq!(entry.level, ActivityLevel::Warn);
    }
}
