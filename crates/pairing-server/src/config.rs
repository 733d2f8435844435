//! Server configuration

use crate::cli::{Cli, Commands};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Serialized classifier artifact (read-only)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Submission dataset (append-only CSV)
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Rows reported as recent submissions
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Maximum accepted request body size
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("failed to read config {}", config_path))?;
            Self::from_yaml_str(&content)
                .with_context(|| format!("failed to parse config {}", config_path))?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(model) = &cli.model {
            config.model_path = model.clone();
        }

        if let Some(dataset) = &cli.dataset {
            config.dataset_path = dataset.clone();
        }

        if let Commands::Serve { listen, port } = &cli.command {
            if let Some(listen) = listen {
                config.listen = listen.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
        }

        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            model_path: default_model_path(),
            dataset_path: default_dataset_path(),
            recent_limit: default_recent_limit(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model_path() -> PathBuf {
    PathBuf::from("./models/model.json")
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("./data/newdata.csv")
}

fn default_recent_limit() -> usize {
    pairing_dataset::DEFAULT_RECENT_LIMIT
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}
