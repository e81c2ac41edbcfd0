//! HTTP fetcher for the status and promotions APIs
//!
//! One attempt per call, bounded by a per-request timeout. Failures come
//! back as [`FetchError`] and are logged here, never raised past the caller.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Outcome of a lightweight `HEAD` health probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Endpoint answered 200
    Ok,
    /// Endpoint answered with another status
    HttpStatus(u16),
    /// No answer at all
    Unreachable,
}

impl ProbeStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ProbeStatus::Ok)
    }
}

/// Source of upstream JSON.
///
/// The report assembler only talks to this trait, so a cycle can run
/// against canned data.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `url` and parse the body as JSON.
    async fn fetch_json(&self, url: &str, timeout: Duration) -> Result<Value, FetchError>;

    /// HEAD `url` to check the endpoint is alive.
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeStatus;
}

/// Decode a fetched JSON value into a wire type.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    Ok(serde_json::from_value(value)?)
}

/// Fetch and decode in one step.
pub async fn fetch_decoded<T: DeserializeOwned>(
    fetcher: &dyn Fetch,
    url: &str,
    timeout: Duration,
) -> Result<T, FetchError> {
    let value = fetcher.fetch_json(url, timeout).await?;
    decode(value).inspect_err(|e| warn!("Unexpected response shape from {}: {}", url, e))
}

/// reqwest-backed [`Fetch`]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client that sends `user_agent` plus JSON accept headers on
    /// every request.
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// Single fetch attempt
    async fn fetch_attempt(&self, url: &str, timeout: Duration) -> Result<Value, FetchError> {
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_json(&self, url: &str, timeout: Duration) -> Result<Value, FetchError> {
        debug!("GET {} (timeout {:?})", url, timeout);

        match self.fetch_attempt(url, timeout).await {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                Err(e)
            }
        }
    }

    async fn probe(&self, url: &str, timeout: Duration) -> ProbeStatus {
        match self.client.head(url).timeout(timeout).send().await {
            Ok(response) if response.status() == StatusCode::OK => ProbeStatus::Ok,
            Ok(response) => {
                debug!("Probe {} answered {}", url, response.status());
                ProbeStatus::HttpStatus(response.status().as_u16())
            }
            Err(e) => {
                debug!("Probe {} failed: {}", url, e);
                ProbeStatus::Unreachable
            }
        }
    }
}
