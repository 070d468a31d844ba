use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding movies.csv, ratings.csv and tags.csv
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default number of parallel scoring chunks per request
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,

    /// Default neighbour bound for user/item algorithms
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum rating for a movie to seed item-based neighbours
    #[serde(default = "default_liked_threshold")]
    pub liked_threshold: f32,

    /// Optional cap on rows read from each CSV file
    #[serde(default)]
    pub max_records: Option<usize>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_num_threads() -> usize {
    8
}

fn default_top_k() -> usize {
    128
}

fn default_liked_threshold() -> f32 {
    4.0
}

/// Engine-facing subset of the configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub num_threads: usize,
    pub top_k: usize,
    pub liked_threshold: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            num_threads: default_num_threads(),
            top_k: default_top_k(),
            liked_threshold: default_liked_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs (upper-case keys)
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        if config.num_threads == 0 {
            anyhow::bail!("NUM_THREADS must be at least 1");
        }
        if config.top_k == 0 {
            anyhow::bail!("TOP_K must be at least 1");
        }
        Ok(config)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            num_threads: self.num_threads,
            top_k: self.top_k,
            liked_threshold: self.liked_threshold,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.engine_settings(), EngineSettings::default());
        assert_eq!(config.max_records, None);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("DATA_DIR", "/srv/movielens"),
            ("PORT", "9000"),
            ("NUM_THREADS", "2"),
            ("TOP_K", "16"),
            ("MAX_RECORDS", "500"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/movielens"));
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.engine_settings().num_threads, 2);
        assert_eq!(config.engine_settings().top_k, 16);
        assert_eq!(config.max_records, Some(500));
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(Config::from_vars(vars(&[("NUM_THREADS", "0")])).is_err());
    }
}
