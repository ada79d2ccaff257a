// Startup configuration read from the process environment.
//
// A `.env` file in the working directory (or any parent) is loaded first,
// so the token can live next to the project instead of in the shell:
//
//     auth_bitly_token=0123456789abcdef
//     BITLY_API_URL=https://api-ssl.bitly.com/v4   # optional

use std::env;

use crate::error::LinkError;

pub const TOKEN_VAR: &str = "auth_bitly_token";
pub const API_URL_VAR: &str = "BITLY_API_URL";
pub const DEFAULT_API_URL: &str = "https://api-ssl.bitly.com/v4";

/// Credentials and endpoint for one invocation. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub api_base_url: String,
}

impl Config {
    pub fn new(token: impl Into<String>, api_base_url: impl AsRef<str>) -> Self {
        Config {
            token: token.into(),
            api_base_url: api_base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Load `.env` (if any) and read the token and optional base URL.
    pub fn from_env() -> Result<Self, LinkError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. An empty token counts as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LinkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LinkError::MissingCredentials)?;
        let api_base_url = lookup(API_URL_VAR)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Ok(Config::new(token.trim(), api_base_url.trim()))
    }

    pub fn with_api_base_url(mut self, api_base_url: &str) -> Self {
        self.api_base_url = api_base_url.trim_end_matches('/').to_string();
        self
    }
}
