use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Language passed to TMDB search
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Default region for watch provider lookups
    #[serde(default = "default_watch_region")]
    pub watch_region: String,

    /// TasteDive API key; suggestions are disabled without one
    #[serde(default)]
    pub tastedive_api_key: Option<String>,

    /// TasteDive API base URL
    #[serde(default = "default_tastedive_api_url")]
    pub tastedive_api_url: String,

    /// Redis connection URL; the watch queue is kept in memory without one
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Upper bound on upstream requests. Unset means requests never time out.
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,

    /// Search sessions untouched for this long are dropped
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_watch_region() -> String {
    "US".to_string()
}

fn default_tastedive_api_url() -> String {
    "https://tastedive.com/api".to_string()
}

fn default_session_idle_secs() -> u64 {
    1800
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
