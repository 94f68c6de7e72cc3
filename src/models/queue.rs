use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MediaType;

/// A title saved to the watch queue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueEntry {
    /// TMDB id of the title; the queue holds at most one entry per id
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub added_at: DateTime<Utc>,
}

/// Request body for adding a title to the queue
#[derive(Debug, Clone, Deserialize)]
pub struct NewQueueEntry {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl NewQueueEntry {
    /// Stamps the entry with the time it was queued
    pub fn into_entry(self, added_at: DateTime<Utc>) -> QueueEntry {
        QueueEntry {
            id: self.id,
            media_type: self.media_type,
            title: self.title,
            year: self.year.unwrap_or_else(|| "N/A".to_string()),
            poster_url: self
                .poster_url
                .unwrap_or_else(|| crate::helpers::POSTER_PLACEHOLDER.to_string()),
            added_at,
        }
    }
}
