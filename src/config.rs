use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, Result};

pub const ENV_API_URL: &str = "JOBFINDER_API_URL";
pub const ENV_TIMEOUT: &str = "JOBFINDER_TIMEOUT_SECS";
pub const ENV_SESSION: &str = "JOBFINDER_SESSION";

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST API, e.g. `http://localhost:8800/api-v1`
    pub api_url: String,
    /// Per-request timeout enforced by the HTTP client
    pub timeout: Duration,
    /// File holding the persisted session record
    pub session_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8800/api-v1".to_string(),
            timeout: Duration::from_secs(30),
            session_path: default_session_path(),
        }
    }
}

impl Config {
    /// Defaults overridden by `JOBFINDER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT, secs)))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(path) = lookup(ENV_SESSION) {
            config.session_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api_url)
            .map_err(|e| ClientError::Config(format!("bad API url '{}': {}", self.api_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!("API url must be http(s), got '{}'", self.api_url)));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::Config("timeout must be positive".to_string()));
        }
        Ok(())
    }
}

fn default_session_path() -> PathBuf {
    // XDG data directory or current directory
    if let Some(dirs) = directories::ProjectDirs::from("", "", "jobfinder") {
        dirs.data_dir().join("session.json")
    } else {
        PathBuf::from("jobfinder-session.json")
    }
}
