use serde::Deserialize;

/// Application configuration loaded from environment variables
///
/// The two API keys are injected secrets with no defaults; startup fails if
/// they are absent.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Places directory API key
    pub places_api_key: String,

    /// Places directory base URL
    #[serde(default = "default_places_api_url")]
    pub places_api_url: String,

    /// Generative model API key
    pub gemini_api_key: String,

    /// Generative model base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Generative model name
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Nearby-search radius in meters
    #[serde(default = "default_search_radius_m")]
    pub search_radius_m: u32,

    /// Delay between successive place-details fetches, in milliseconds
    #[serde(default = "default_detail_fetch_delay_ms")]
    pub detail_fetch_delay_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_places_api_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_search_radius_m() -> u32 {
    5000
}

fn default_detail_fetch_delay_ms() -> u64 {
    100
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
