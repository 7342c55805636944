use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the exported dataset files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Catalog rows sampled per content recommendation; must not exceed
    /// the catalog size
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_sample_size() -> usize {
    crate::services::recommender::DEFAULT_SAMPLE_SIZE
}

fn default_host() -> String {
    "0.0.0.0".to_string()
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
