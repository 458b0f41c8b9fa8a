//! Server settings read from the environment.

use std::path::PathBuf;

use codedarpan_core::DEFAULT_ANALYZER_URL;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5173;

/// Listen address and collaborators for the web front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Base URL of the analysis service.
    pub api_url: String,
    /// TTF font used for certificate images.
    pub font: Option<PathBuf>,
}

impl ServerConfig {
    /// Build the config from process environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let port = match value("CODEDARPAN_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| format!("CODEDARPAN_PORT must be a u16 number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            host: value("CODEDARPAN_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            api_url: value("CODEDARPAN_API_URL").unwrap_or_else(|| DEFAULT_ANALYZER_URL.to_string()),
            font: value("CODEDARPAN_FONT").map(PathBuf::from),
        })
    }
}
