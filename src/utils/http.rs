// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use url::Url;

use crate::error::Result;
use crate::models::SearchConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &SearchConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Copy of `url` with the value of `param` masked, for logging.
pub fn redact_query_param(url: &Url, param: &str) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == param { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
