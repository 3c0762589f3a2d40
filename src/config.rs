use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "pmf-upgrade.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Admin base URL, e.g. `https://faq.example.org/admin/`.
    pub base_url: String,
    pub health_endpoint: String,
    /// Release channel label of the installation; `nightly` switches downloads to nightly builds.
    pub release_environment: String,
    pub csrf_token: Option<String>,
    pub request_timeout_secs: u64,
    /// Give up on a backup/install stream after this long without a chunk.
    pub stream_stall_timeout_secs: Option<u64>,
    pub categories: Vec<i64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/admin/".to_string(),
            health_endpoint: "api/health-check".to_string(),
            release_environment: "production".to_string(),
            csrf_token: None,
            request_timeout_secs: 30,
            stream_stall_timeout_secs: Some(600),
            categories: Vec::new(),
            log_file: None,
        }
    }
}

impl Settings {
    /// Loads `path`, or `./pmf-upgrade.toml` when present, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn stall_timeout(&self) -> Option<Duration> {
        self.stream_stall_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn csrf(&self) -> String {
        self.csrf_token.clone().unwrap_or_default()
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("pmf-upgrade.log"))
    }
}
