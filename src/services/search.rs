// src/services/search.rs

//! Job search provider client.
//!
//! One GET per (query, location) pair against a SerpApi-compatible
//! endpoint. No retries and no pagination: whatever the first page holds
//! is the result for that pair.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{RawJob, SearchConfig};
use crate::models::env::SERPAPI_KEY;
use crate::utils::http::{create_async_client, redact_query_param};

/// A source of raw job postings.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch the postings for one query in one location.
    async fn search(&self, query: &str, location: &str) -> Result<Vec<RawJob>>;
}

/// Body of a provider search response. Only the fields we read.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    jobs_results: Option<Vec<RawJob>>,

    #[serde(default)]
    error: Option<String>,
}

/// Client for the SerpApi Google Jobs engine.
pub struct SerpApiClient {
    client: Client,
    config: SearchConfig,
    api_key: Option<String>,
}

impl SerpApiClient {
    /// Create a client. A missing `api_key` is not an error here; every
    /// search will report it instead.
    pub fn new(config: &SearchConfig, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            config: config.clone(),
            api_key,
        })
    }

    /// Whether searches can actually be issued.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_url(&self, query: &str, location: &str, api_key: &str) -> Result<Url> {
        let url = Url::parse_with_params(
            &self.config.endpoint,
            &[
                ("engine", self.config.engine.as_str()),
                ("q", query),
                ("location", location),
                ("api_key", api_key),
                ("hl", self.config.language.as_str()),
                ("chips", self.config.chips.as_str()),
            ],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl JobSource for SerpApiClient {
    async fn search(&self, query: &str, location: &str) -> Result<Vec<RawJob>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::missing_credential(SERPAPI_KEY))?;

        let url = self.request_url(query, location, api_key)?;
        log::debug!("GET {}", redact_query_param(&url, "api_key"));

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::search(
                format!("'{}' in '{}'", query, location),
                format!("HTTP {}", status),
            ));
        }

        let body: SearchResponse = response.json().await?;
        match body.jobs_results {
            Some(jobs) => Ok(jobs),
            None => {
                if let Some(message) = body.error {
                    log::debug!("Provider returned no results: {}", message);
                }
                Ok(Vec::new())
            }
        }
    }
}
