use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL for the persisted watchlist/history state
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Catalog (TMDB) API bearer token
    pub tmdb_api_token: String,

    /// Catalog API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base prefix for poster- and cast-sized images
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,

    /// Base prefix for full-size backdrop images
    #[serde(default = "default_backdrop_base_url")]
    pub backdrop_base_url: String,

    /// Identity service API key
    pub identity_api_key: String,

    /// Identity service base URL
    #[serde(default = "default_identity_api_url")]
    pub identity_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_poster_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_backdrop_base_url() -> String {
    "https://image.tmdb.org/t/p/original".to_string()
}

fn default_identity_api_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
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
}
