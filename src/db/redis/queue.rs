use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::QueueEntry;
use crate::services::queue::{sort_entries, QueueStore};

const DEFAULT_NAMESPACE: &str = "showfinder";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueueKey {
    /// Hash of title id → JSON entry
    Entries(String),
}

impl Display for QueueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueKey::Entries(namespace) => write!(f, "{}:queue", namespace.to_lowercase()),
        }
    }
}

/// Creates a Redis client for the watch queue
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Watch queue kept in a single Redis hash
#[derive(Clone)]
pub struct RedisQueueStore {
    redis_client: Client,
    key: QueueKey,
}

impl RedisQueueStore {
    pub fn new(redis_client: Client) -> Self {
        Self::with_namespace(redis_client, DEFAULT_NAMESPACE)
    }

    /// Store under a different key prefix, e.g. to isolate tests
    pub fn with_namespace(redis_client: Client, namespace: &str) -> Self {
        Self {
            redis_client,
            key: QueueKey::Entries(namespace.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl QueueStore for RedisQueueStore {
    async fn insert(&self, entry: QueueEntry) -> AppResult<()> {
        let json = serde_json::to_string(&entry)
            .map_err(|e| AppError::Internal(format!("Queue serialization error: {}", e)))?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.hset(self.key.to_string(), entry.id, json).await?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<QueueEntry>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let values: Vec<String> = conn.hvals(self.key.to_string()).await?;

        let mut entries = Vec::with_capacity(values.len());
        for json in values {
            match serde_json::from_str::<QueueEntry>(&json) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable queue entry");
                }
            }
        }

        sort_entries(&mut entries);
        Ok(entries)
    }

    async fn remove(&self, id: u64) -> AppResult<bool> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let removed: i64 = conn.hdel(self.key.to_string(), id).await?;
        Ok(removed > 0)
    }

    async fn clear(&self) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(self.key.to_string()).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
