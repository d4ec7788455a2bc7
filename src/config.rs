//! Static service configuration.
//!
//! The upstream endpoint and token are fixed; there is no environment or file
//! based configuration. The struct exists so the fetch layer takes its
//! settings explicitly instead of reading ambient globals.

const UPSTREAM_BASE_URL: &str = "https://sidebar.stract.to/api";
const UPSTREAM_TOKEN: &str = "ProcessoSeletivoStract2025";
const BIND_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the advertising-metrics API, without a trailing slash.
    pub base_url: String,
    /// Access token, passed as a query parameter on every upstream call.
    pub token: String,
    /// Local address the HTTP server binds at startup.
    pub bind_addr: String,
}

impl Config {
    pub fn new() -> Self {
        Self::with_base_url(UPSTREAM_BASE_URL)
    }

    /// Same settings against a different upstream; used by tests that point
    /// the fetch layer at a local stub.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: UPSTREAM_TOKEN.to_string(),
            bind_addr: BIND_ADDR.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
