use anyhow::{Context, Result};
use api_client::{ClientConfig, CredentialsMode, DEFAULT_TIMEOUT};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_STORAGE_PATH: &str = ".hiretrack/storage.json";

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub storage_path: PathBuf,
    pub credentials: CredentialsMode,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout = match lookup("HIRETRACK_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(
                raw.trim()
                    .parse()
                    .context("HIRETRACK_TIMEOUT_MS must be a whole number of milliseconds")?,
            ),
            None => DEFAULT_TIMEOUT,
        };

        let credentials = match lookup("HIRETRACK_CREDENTIALS") {
            Some(raw) => raw
                .parse()
                .context("HIRETRACK_CREDENTIALS must be include, omit or same-origin")?,
            None => CredentialsMode::default(),
        };

        Ok(Self {
            api_url: lookup("HIRETRACK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout,
            storage_path: lookup("HIRETRACK_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH)),
            credentials,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            timeout: self.timeout,
            credentials: self.credentials,
        }
    }
}
