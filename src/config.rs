//! Environment-driven configuration.
//!
//! Priority order:
//! 1. `ALPHA_PROXY_URL` → same-origin proxy, which holds the credential
//! 2. `GOOGLE_API_KEY` → talk to the Gemini API directly

use crate::transport::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiTransport, ProxyTransport, Transport,
    UnconfiguredTransport,
};
use anyhow::{Context, Result, bail};
use std::env;
use std::sync::Arc;

/// Bundled defaults for builds that ship without a `.env` (web, mobile).
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    Proxy { endpoint: String },
    Direct {
        base_url: String,
        model: String,
        api_key: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves configuration from any key lookup, so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(endpoint) = non_empty("ALPHA_PROXY_URL") {
            let parsed = reqwest::Url::parse(&endpoint)
                .with_context(|| format!("ALPHA_PROXY_URL is not an absolute URL: {endpoint}"))?;
            return Ok(Self {
                backend: Backend::Proxy {
                    endpoint: parsed.to_string(),
                },
            });
        }

        if let Some(api_key) = non_empty("GOOGLE_API_KEY") {
            return Ok(Self {
                backend: Backend::Direct {
                    base_url: non_empty("GEMINI_BASE_URL")
                        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                    model: non_empty("GEMINI_MODEL")
                        .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                    api_key,
                },
            });
        }

        bail!(
            "No generation backend configured. Set ALPHA_PROXY_URL for the proxy, or GOOGLE_API_KEY to call Gemini directly."
        )
    }

    pub fn build_transport(&self) -> Arc<dyn Transport> {
        match &self.backend {
            Backend::Proxy { endpoint } => Arc::new(ProxyTransport::new(endpoint.clone())),
            Backend::Direct {
                base_url,
                model,
                api_key,
            } => Arc::new(GeminiTransport::new(
                base_url.clone(),
                model.clone(),
                api_key.clone(),
            )),
        }
    }
}

/// The configured transport, or one that reports the configuration error inside the chat.
pub fn transport_from_env() -> Arc<dyn Transport> {
    match Config::from_env() {
        Ok(config) => config.build_transport(),
        Err(err) => {
            tracing::error!(error = %err, "no generation backend");
            Arc::new(UnconfiguredTransport::new(err.to_string()))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
pub fn load_dotenv() {
    load_bundled_config();
}

/// `KEY=VALUE` lines, skipping blanks and `#` comments.
pub fn parse_env_lines(source: &str) -> Vec<(&str, &str)> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn load_bundled_config() {
    for (key, value) in parse_env_lines(BUNDLED_CONFIG) {
        // Only set if not already set (allow env override)
        if env::var(key).is_err() {
            // SAFETY: called at startup before any threads are spawned
            unsafe {
                env::set_var(key, value);
            }
        }
    }
}
