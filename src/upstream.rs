//! Fetch layer for the advertising-metrics API.
//!
//! Three read-only endpoints: the platform list, the account list per
//! platform, and the insight rows per platform + account. All are GET with
//! the access token as a query parameter. Calls are sequential per request;
//! this layer never fans out.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::report::Record;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("upstream returned {status} for {url}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode response from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },
}

/// Unwrap a fetch result, degrading any failure to an empty list.
///
/// The service's error policy: an upstream problem costs the affected scope
/// its rows, never the whole response. The failure is logged and swallowed.
pub fn or_empty<T>(result: Result<Vec<T>, FetchError>, scope: &str) -> Vec<T> {
    result.unwrap_or_else(|err| {
        warn!("could not fetch {scope}: {err}");
        Vec::new()
    })
}

/// Upstream list elements arrive either as plain identifiers or as objects
/// carrying a `name` field; both shapes normalize to a plain name here, at
/// the boundary.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListItem {
    Plain(String),
    Named {
        #[serde(default)]
        name: String,
    },
}

impl ListItem {
    fn into_name(self) -> String {
        match self {
            ListItem::Plain(name) => name,
            ListItem::Named { name } => name,
        }
    }
}

/// Client for the metrics API. Holds one reqwest client and the static
/// configuration; shared across requests behind an `Arc`.
pub struct StractApi {
    client: Client,
    config: Config,
}

impl StractApi {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("AdReport/1.0 (Report Proxy)")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    /// List all advertising platforms.
    pub async fn platforms(&self) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/platforms", self.config.base_url);
        let items: Vec<ListItem> = self
            .get_json(&url, &[("token", self.config.token.as_str())])
            .await?;
        debug!("fetched {} platforms", items.len());
        Ok(items.into_iter().map(ListItem::into_name).collect())
    }

    /// List the ad accounts of one platform.
    pub async fn accounts(&self, platform: &str) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/accounts", self.config.base_url);
        let items: Vec<ListItem> = self
            .get_json(&url, &[("platform", platform), ("token", &self.config.token)])
            .await?;
        debug!("fetched {} accounts for {platform}", items.len());
        Ok(items.into_iter().map(ListItem::into_name).collect())
    }

    /// Fetch the insight rows of one account. Row shape varies per platform,
    /// so rows come back as raw ordered maps.
    pub async fn insights(&self, platform: &str, account: &str) -> Result<Vec<Record>, FetchError> {
        let url = format!("{}/insights", self.config.base_url);
        self.get_json(
            &url,
            &[
                ("platform", platform),
                ("account", account),
                ("token", &self.config.token),
            ],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status });
        }

        response
            .json()
            .await
            .map_err(|source| FetchError::Decode { url: url.to_string(), source })
    }
}
