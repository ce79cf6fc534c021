//! Configuration module

use std::env;

/// Environment variable holding the scoring service origin
pub const BACKEND_URL_VAR: &str = "BACKEND_URL";

/// Older name used by the web front end; read when `BACKEND_URL` is unset
pub const LEGACY_BACKEND_URL_VAR: &str = "REACT_APP_BACKEND_URL";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origin of the scoring service, without trailing slash
    pub backend_url: String,
}

impl Config {
    /// Load configuration from the process environment, after `.env`
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an explicit key lookup
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = [BACKEND_URL_VAR, LEGACY_BACKEND_URL_VAR]
            .into_iter()
            .filter_map(|key| lookup(key))
            .find(|value| !value.trim().is_empty());

        match url {
            Some(url) => Self::with_backend_url(&url),
            None => anyhow::bail!(
                "{} is not set; point it at the scoring service origin (e.g. http://localhost:8001)",
                BACKEND_URL_VAR
            ),
        }
    }

    /// Build from an explicit origin such as a `--backend-url` flag
    pub fn with_backend_url(url: &str) -> crate::Result<Self> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("Backend URL must start with http:// or https://, got '{}'", url);
        }
        Ok(Self {
            backend_url: url.to_string(),
        })
    }

    /// Full URL of the cluster prediction endpoint
    pub fn predict_url(&self) -> String {
        format!("{}/api/predict_cluster", self.backend_url)
    }
}
