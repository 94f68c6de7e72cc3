use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{error::AppResult, models::QueueEntry};

/// Storage for the watch queue, keyed by title id
#[async_trait::async_trait]
pub trait QueueStore: Send + Sync {
    /// Adds an entry, replacing any entry with the same id
    async fn insert(&self, entry: QueueEntry) -> AppResult<()>;

    /// All entries, oldest first
    async fn list(&self) -> AppResult<Vec<QueueEntry>>;

    /// Removes one entry; `false` if it was not queued
    async fn remove(&self, id: u64) -> AppResult<bool>;

    async fn clear(&self) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Queue ordering shared by all backends
pub fn sort_entries(entries: &mut [QueueEntry]) {
    entries.sort_by(|a, b| a.added_at.cmp(&b.added_at).then(a.id.cmp(&b.id)));
}

/// Process-local queue, lost on restart
#[derive(Clone, Default)]
pub struct InMemoryQueueStore {
    entries: Arc<RwLock<HashMap<u64, QueueEntry>>>,
}

impl InMemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl QueueStore for InMemoryQueueStore {
    async fn insert(&self, entry: QueueEntry) -> AppResult<()> {
        self.entries.write().await.insert(entry.id, entry);
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<QueueEntry>> {
        let mut entries: Vec<QueueEntry> = self.entries.read().await.values().cloned().collect();
        sort_entries(&mut entries);
        Ok(entries)
    }

    async fn remove(&self, id: u64) -> AppResult<bool> {
        Ok(self.entries.write().await.remove(&id).is_some())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
