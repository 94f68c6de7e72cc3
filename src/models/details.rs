use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::helpers::{self, DateSize};

use super::MediaType;

// ============================================================================
// TMDB details types
// ============================================================================

/// Response from `GET /movie/{id}` or `GET /tv/{id}`
///
/// Films are requested with `append_to_response=release_dates`, series with
/// `append_to_response=content_ratings`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawShowDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<RawGenre>,
    #[serde(default)]
    pub release_dates: Option<RawReleaseDates>,
    #[serde(default)]
    pub content_ratings: Option<RawContentRatings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGenre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReleaseDates {
    pub results: Vec<RawCountryReleases>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCountryReleases {
    pub iso_3166_1: String,
    pub release_dates: Vec<RawReleaseDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReleaseDate {
    #[serde(default)]
    pub certification: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawContentRatings {
    pub results: Vec<RawContentRating>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawContentRating {
    pub iso_3166_1: String,
    #[serde(default)]
    pub rating: String,
}

/// Details of a single title returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowDetails {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_url: String,
    pub vote_average: f64,
    pub vote_count: u64,
    pub overview: String,
    pub release_date: Option<String>,
    pub formatted_release_date: Option<String>,
    /// Abbreviated month, for compact cards
    pub short_release_date: Option<String>,
    pub release_year: String,
    pub runtime: Option<u32>,
    pub age_rating: Option<String>,
    pub genres: Vec<String>,
}

impl RawShowDetails {
    /// Certification for the region: film release certification or series
    /// content rating, whichever was appended
    fn age_rating(&self, region: &str) -> Option<String> {
        let from_releases = self.release_dates.as_ref().and_then(|dates| {
            dates
                .results
                .iter()
                .find(|country| country.iso_3166_1.eq_ignore_ascii_case(region))
                .and_then(|country| {
                    country
                        .release_dates
                        .iter()
                        .map(|r| r.certification.trim())
                        .find(|c| !c.is_empty())
                        .map(str::to_string)
                })
        });

        from_releases.or_else(|| {
            self.content_ratings.as_ref().and_then(|ratings| {
                ratings
                    .results
                    .iter()
                    .find(|r| r.iso_3166_1.eq_ignore_ascii_case(region) && !r.rating.is_empty())
                    .map(|r| r.rating.clone())
            })
        })
    }

    pub fn into_details(self, media_type: MediaType, image_base: &str, region: &str) -> ShowDetails {
        let age_rating = self.age_rating(region);

        let (title, release_date) = match media_type {
            MediaType::Film => (self.title.or(self.name), self.release_date),
            MediaType::Series => (self.name.or(self.title), self.first_air_date),
        };
        let release_date = release_date.filter(|d| !d.is_empty());

        let runtime = match media_type {
            MediaType::Film => self.runtime,
            MediaType::Series => self.episode_run_time.first().copied().or(self.runtime),
        }
        .filter(|minutes| *minutes > 0);

        ShowDetails {
            id: self.id,
            media_type,
            title: title.unwrap_or_default(),
            poster_url: helpers::poster_url(image_base, self.poster_path.as_deref()),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            overview: self.overview.unwrap_or_default(),
            formatted_release_date: release_date
                .as_deref()
                .and_then(|d| helpers::format_release_date(d, DateSize::Long)),
            short_release_date: release_date
                .as_deref()
                .and_then(|d| helpers::format_release_date(d, DateSize::Short)),
            release_year: helpers::release_year(release_date.as_deref()),
            release_date,
            runtime,
            age_rating,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
        }
    }
}

// ============================================================================
// TMDB watch provider types
// ============================================================================

/// Response from `GET /{movie|tv}/{id}/watch/providers`
#[derive(Debug, Clone, Deserialize)]
pub struct RawWatchProviders {
    #[serde(default)]
    pub results: HashMap<String, RawRegionProviders>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRegionProviders {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<RawProvider>,
    #[serde(default)]
    pub rent: Vec<RawProvider>,
    #[serde(default)]
    pub buy: Vec<RawProvider>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProvider {
    pub provider_id: u64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

/// Where a title can be watched in one region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProviders {
    pub region: String,
    pub link: Option<String>,
    pub flatrate: Vec<WatchProvider>,
    pub rent: Vec<WatchProvider>,
    pub buy: Vec<WatchProvider>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProvider {
    pub id: u64,
    pub name: String,
    pub logo_url: Option<String>,
}

impl RawWatchProviders {
    /// Picks out one region. A region TMDB does not list has no providers.
    pub fn for_region(mut self, region: &str, image_base: &str) -> WatchProviders {
        let region = region.to_uppercase();
        let convert = |providers: Vec<RawProvider>| -> Vec<WatchProvider> {
            providers
                .into_iter()
                .map(|p| WatchProvider {
                    id: p.provider_id,
                    name: p.provider_name,
                    logo_url: p.logo_path.map(|path| helpers::logo_url(image_base, &path)),
                })
                .collect()
        };

        match self.results.remove(&region) {
            Some(found) => WatchProviders {
                region,
                link: found.link,
                flatrate: convert(found.flatrate),
                rent: convert(found.rent),
                buy: convert(found.buy),
            },
            None => WatchProviders {
                region,
                link: None,
                flatrate: Vec::new(),
                rent: Vec::new(),
                buy: Vec::new(),
            },
        }
    }
}
