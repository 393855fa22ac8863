//! Document retrieval
//!
//! Thin HTTP wrapper: build the URL, GET it, reject non-success statuses and
//! hand the body to [`Crawler::parse`]. No retries; failures go straight back
//! to the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::crawler::Crawler;
use crate::error::FetchError;

/// HTTP client settings shared by async and blocking loads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("typed_crawler/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            headers: Vec::new(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }
        Ok(())
    }
}

/// Target URL plus query parameters to append
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadRequest {
    pub url: String,
    /// Each value of a multi-valued parameter is appended separately
    #[serde(default)]
    pub query: Vec<(String, Vec<String>)>,
}

impl LoadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), vec![value.into()]));
        self
    }

    pub fn query_all<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.query
            .push((key.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Final URL with query parameters appended after any already present
    pub fn resolve_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.url).map_err(|source| FetchError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, values) in &self.query {
                for value in values {
                    pairs.append_pair(key, value);
                }
            }
        }

        Ok(url)
    }
}

/// GET the page asynchronously and return its body
pub async fn fetch_markup(request: &LoadRequest, config: &FetchConfig) -> Result<String, FetchError> {
    config.validate().map_err(FetchError::InvalidConfig)?;
    let url = request.resolve_url()?;
    tracing::debug!(%url, "fetching document");

    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .build()?;

    let mut builder = client.get(url.clone());
    for (name, value) in &config.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let response = builder.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(%url, status = status.as_u16(), "document fetch rejected");
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

/// GET the page with a blocking client and return its body
pub fn fetch_markup_blocking(
    request: &LoadRequest,
    config: &FetchConfig,
) -> Result<String, FetchError> {
    config.validate().map_err(FetchError::InvalidConfig)?;
    let url = request.resolve_url()?;
    tracing::debug!(%url, "fetching document (blocking)");

    let agent = ureq::Agent::new_with_config(
        ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .user_agent(config.user_agent.as_str())
            .http_status_as_error(false)
            .build(),
    );

    let mut builder = agent.get(url.as_str());
    for (name, value) in &config.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let response = builder.call()?;
    let status = response.status();
    let body = response.into_body().read_to_string()?;

    if !status.is_success() {
        tracing::warn!(%url, status = status.as_u16(), "document fetch rejected");
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

impl Crawler {
    /// Fetch and parse a page
    pub async fn load(request: &LoadRequest, config: &FetchConfig) -> Result<Self, FetchError> {
        let markup = fetch_markup(request, config).await?;
        Ok(Self::parse(&markup))
    }

    pub fn load_blocking(request: &LoadRequest, config: &FetchConfig) -> Result<Self, FetchError> {
        let markup = fetch_markup_blocking(request, config)?;
        Ok(Self::parse(&markup))
    }
}
