use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

use crate::error::RetrievalError;

pub mod details;
pub mod queue;

pub use details::{
    RawShowDetails, RawWatchProviders, ShowDetails, WatchProvider, WatchProviders,
};
pub use queue::{NewQueueEntry, QueueEntry};

/// Whether a title is a film or a series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[serde(alias = "movie")]
    Film,
    #[serde(alias = "tv")]
    Series,
}

impl MediaType {
    /// Parses both the upstream spellings (`movie`, `tv`) and our own
    pub fn from_upstream(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "movie" | "film" => Some(MediaType::Film),
            "tv" | "series" => Some(MediaType::Series),
            _ => None,
        }
    }

    /// Path segment TMDB uses for this media type
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaType::Film => "movie",
            MediaType::Series => "tv",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Film => write!(f, "film"),
            MediaType::Series => write!(f, "series"),
        }
    }
}

// ============================================================================
// Search page types
// ============================================================================

/// Search response as received, before its shape is checked
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResultPage {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub results: Option<Vec<Value>>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

impl RawResultPage {
    /// Checks the response-level fields the engine depends on
    pub fn into_page(self, requested: u32) -> Result<ResultPage, RetrievalError> {
        let results = self.results.ok_or_else(|| {
            RetrievalError::MalformedResponse("response has no results field".to_string())
        })?;
        let total_pages = self.total_pages.ok_or_else(|| {
            RetrievalError::MalformedResponse("response has no total_pages field".to_string())
        })?;

        Ok(ResultPage {
            page: requested,
            results,
            total_pages,
            total_results: self.total_results.unwrap_or_default(),
        })
    }
}

/// One page of search results with raw, not yet normalized records
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    /// The page number that was requested
    pub page: u32,
    pub results: Vec<Value>,
    pub total_pages: u32,
    pub total_results: u64,
}

/// A film or series record as TMDB returns it from search and recommendations
#[derive(Debug, Clone, Deserialize)]
pub struct RawShow {
    pub id: u64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

/// Uniform search result shape for films and series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedItem {
    pub id: u64,
    pub poster_path: Option<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub overview: String,
    pub media_type: MediaType,
    pub genre_ids: Vec<u64>,
    pub title: String,
    pub release_date: Option<String>,
}

impl RawShow {
    /// Works out whether this record is a film or a series.
    ///
    /// `Ok(None)` means the record is a person and carries no title.
    fn resolve_media_type(
        &self,
        fallback: Option<MediaType>,
    ) -> Result<Option<MediaType>, RetrievalError> {
        match self.media_type.as_deref() {
            Some("person") => Ok(None),
            Some(other) => MediaType::from_upstream(other).map(Some).ok_or_else(|| {
                RetrievalError::ParseException(format!(
                    "record {} has unsupported media type '{}'",
                    self.id, other
                ))
            }),
            // Legacy records without a discriminant
            None if self.title.is_some() => Ok(Some(MediaType::Film)),
            None if self.name.is_some() => Ok(Some(MediaType::Series)),
            None => fallback.map(Some).ok_or_else(|| {
                RetrievalError::MalformedResponse(format!("record {} has no media type", self.id))
            }),
        }
    }

    /// Normalizes this record; people are dropped.
    pub fn normalize(
        self,
        fallback: Option<MediaType>,
    ) -> Result<Option<NormalizedItem>, RetrievalError> {
        let Some(media_type) = self.resolve_media_type(fallback)? else {
            return Ok(None);
        };

        let (title, release_date) = match media_type {
            MediaType::Film => (self.title, self.release_date),
            MediaType::Series => (self.name, self.first_air_date),
        };

        let title = title.ok_or_else(|| {
            RetrievalError::MalformedResponse(format!(
                "{} record {} has no display title",
                media_type, self.id
            ))
        })?;

        Ok(Some(NormalizedItem {
            id: self.id,
            poster_path: self.poster_path,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            overview: self.overview.unwrap_or_default(),
            media_type,
            genre_ids: self.genre_ids,
            title,
            release_date: release_date.filter(|d| !d.is_empty()),
        }))
    }
}

/// Normalizes a whole page of raw records.
///
/// Either every record is normalized or an error is returned; a partially
/// normalized page is never produced.
pub fn normalize_records(
    records: Vec<Value>,
    fallback: Option<MediaType>,
) -> Result<Vec<NormalizedItem>, RetrievalError> {
    let mut items = Vec::with_capacity(records.len());

    for record in records {
        let raw: RawShow = serde_json::from_value(record).map_err(|e| {
            RetrievalError::MalformedResponse(format!("unexpected record shape: {}", e))
        })?;

        if let Some(item) = raw.normalize(fallback)? {
            items.push(item);
        }
    }

    Ok(items)
}
