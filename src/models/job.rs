//! Job posting data structures.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the identity digest.
pub const IDENTITY_KEY_LEN: usize = 12;

/// A single result record as returned by the search provider.
///
/// Every field is optional; the provider omits whatever it does not know.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawJob {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub company_name: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub detected_extensions: Option<BTreeMap<String, serde_json::Value>>,

    #[serde(default)]
    pub apply_options: Option<Vec<ApplyOption>>,

    #[serde(default)]
    pub share_link: Option<String>,

    #[serde(default)]
    pub via: Option<String>,
}

/// One entry of the provider's structured apply-options list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApplyOption {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub link: Option<String>,
}

/// A canonical job posting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRecord {
    /// Identity key derived from title, company and location
    pub id: String,

    /// Posting title
    pub title: String,

    /// Hiring organisation
    pub company_name: String,

    /// Location as reported by the provider
    pub location: String,

    /// First 500 characters of the description
    pub description_snippet: String,

    /// Free-form annotations (schedule type, posted_at, salary, ...)
    pub detected_extensions: BTreeMap<String, serde_json::Value>,

    /// Where to apply; empty if the provider gave nothing usable
    pub apply_link: String,

    /// Source attribution, e.g. "via LinkedIn"
    pub via: String,

    /// When this record was normalized
    pub scraped_at: DateTime<Utc>,
}

impl JobRecord {
    /// Recompute the identity key from the current identity fields.
    pub fn identity(&self) -> String {
        identity_key(&self.title, &self.company_name, &self.location)
    }

    /// `scraped_at` in the ISO-8601 form persisted in the seen-set.
    pub fn scraped_at_iso(&self) -> String {
        self.scraped_at.to_rfc3339_opts(SecondsFormat::Micros, false)
    }

    /// Extension annotations rendered as `key: value` strings.
    pub fn extension_labels(&self) -> Vec<String> {
        self.detected_extensions
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => format!("{}: {}", humanize(key), s),
                serde_json::Value::Bool(true) => humanize(key),
                other => format!("{}: {}", humanize(key), other),
            })
            .collect()
    }
}

/// Derive the deduplication key for a posting.
///
/// SHA-256 over `"{title}-{company_name}-{location}"`, truncated to
/// [`IDENTITY_KEY_LEN`] lowercase hex characters.
pub fn identity_key(title: &str, company_name: &str, location: &str) -> String {
    let raw = format!("{}-{}-{}", title, company_name, location);
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(IDENTITY_KEY_LEN);
    digest
}

fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
