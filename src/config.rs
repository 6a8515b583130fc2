//! Configuration loading
//!
//! Settings live in `config.toml` under the user config directory; every
//! field has a default so a missing or partial file is fine.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::srs::NewCardOrder;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where card content and scheduling records are stored
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub review: ReviewConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            server: ServerConfig::default(),
            review: ReviewConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join("kioku")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP service binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4989
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Where New cards sort relative to dated due cards
    #[serde(default)]
    pub new_card_order: NewCardOrder,

    /// Default review batch size when the caller does not pass a limit
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    20
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            new_card_order: NewCardOrder::default(),
            batch_size: default_batch_size(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or the default location. A missing file
    /// yields the defaults; it is not an error.
    pub fn load(path: Option<&std::path::Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("kioku")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 4989);
        assert_eq!(config.review.batch_size, 20);
        assert_eq!(config.review.new_card_order, NewCardOrder::First);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [review]
            new_card_order = "last"
            "#,
        )
        .unwrap();
        assert_eq!(config.review.new_card_order, NewCardOrder::Last);
        assert_eq!(config.review.batch_size, 20);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
    }
}
