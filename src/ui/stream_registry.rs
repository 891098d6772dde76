use std::sync::Arc;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;
use crate::structs::active_stream::ActiveStream;

/// Streams currently being served, keyed by session id.
#[derive(Clone, Default)]
pub struct StreamRegistry {
    streams: Arc<DashMap<String, ActiveStream>>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new stream until the returned guard is dropped.
    pub fn register(&self, thread_id: &str) -> ActiveStreamGuard {
        let session_id = Uuid::new_v4().to_string();
        self.streams.insert(
            session_id.clone(),
            ActiveStream {
                session_id: session_id.clone(),
                thread_id: thread_id.to_string(),
                started_at: Utc::now(),
            },
        );

        ActiveStreamGuard {
            session_id,
            streams: Arc::clone(&self.streams),
        }
    }

    pub fn active_count(&self) -> usize {
        self.streams.len()
    }

    pub fn get(&self, session_id: &str) -> Option<ActiveStream> {
        self.streams.get(session_id).map(|entry| entry.value().clone())
    }

    pub fn list(&self) -> Vec<ActiveStream> {
        let mut streams: Vec<ActiveStream> = self.streams.iter().map(|entry| entry.value().clone()).collect();
        streams.sort_by_key(|stream| stream.started_at);
        streams
    }
}

/// Removes its stream from the registry on drop.
pub struct ActiveStreamGuard {
    session_id: String,
    streams: Arc<DashMap<String, ActiveStream>>,
}

impl ActiveStreamGuard {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Drop for ActiveStreamGuard {
    fn drop(&mut self) {
        if self.streams.remove(&self.session_id).is_some() {
            log::debug!("🗑️ Released stream {}", self.session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_removes_stream_on_drop() {
        let registry = StreamRegistry::new();
        let first = registry.register("thread_1");
        let second = registry.register("thread_2");
        assert_eq!(registry.active_count(), 2);
        assert_eq!(registry.get(first.session_id()).unwrap().thread_id, "thread_1");

        drop(first);
        assert_eq!(registry.active_count(), 1);
        assert_eq!(registry.list()[0].session_id, second.session_id());

        drop(second);
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn clones_share_state() {
        let registry = StreamRegistry::new();
        let clone = registry.clone();
        let _guard = registry.register("thread");
        assert_eq!(clone.active_count(), 1);
    }
}
