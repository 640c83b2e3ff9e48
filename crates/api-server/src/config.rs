use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Shared secrets accepted in the `token` parameter. Empty disables auth.
    pub auth_tokens: Vec<String>,
    pub bind_addr: SocketAddr,
    /// Details page prefix the ticker is appended to.
    pub upstream_base_url: String,
    pub json_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            auth_tokens: parse_token_list(&env::var("AUTH_TOKENS").unwrap_or_default()),
            bind_addr: bind_addr
                .parse()
                .with_context(|| format!("invalid BIND_ADDR '{}'", bind_addr))?,
            upstream_base_url: env::var("FUNDAMENTUS_BASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| fundamentus_client::BASE_URL.to_string()),
            json_logging: env::var("RUST_LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth_tokens: Vec::new(),
            bind_addr: ([0, 0, 0, 0], 3000).into(),
            upstream_base_url: fundamentus_client::BASE_URL.to_string(),
            json_logging: false,
        }
    }
}

/// Split a comma-separated token list, trimming entries and dropping blanks.
pub fn parse_token_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}
