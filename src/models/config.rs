//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Places to search, in order
    #[serde(default)]
    pub locations: Vec<Location>,

    /// Search strings sent to the provider for every location
    #[serde(default)]
    pub search_queries: Vec<String>,

    /// Case-insensitive substrings a posting must contain to be kept
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Whether the email digest is rendered and sent at all
    #[serde(default = "defaults::email_enabled")]
    pub email_enabled: bool,

    /// Public URL of the published report, linked from the email
    #[serde(default)]
    pub page_url: String,

    /// Search provider settings
    #[serde(default)]
    pub search: SearchConfig,

    /// File locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Email digest settings
    #[serde(default)]
    pub email: EmailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.search.endpoint.trim().is_empty() {
            return Err(AppError::validation("search.endpoint is empty"));
        }
        url::Url::parse(&self.search.endpoint)?;
        if self.search.timeout_secs == 0 {
            return Err(AppError::validation("search.timeout_secs must be > 0"));
        }
        if self.search.user_agent.trim().is_empty() {
            return Err(AppError::validation("search.user_agent is empty"));
        }
        if self.email.default_port == 0 {
            return Err(AppError::validation("email.default_port must be > 0"));
        }
        if let Some(loc) = self
            .locations
            .iter()
            .find(|l| l.search_string.trim().is_empty())
        {
            return Err(AppError::validation(format!(
                "location with empty search_string: {:?}",
                loc
            )));
        }
        Ok(())
    }

    /// Settings that are legal but make a run pointless.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.locations.is_empty() {
            warnings.push("No locations configured; nothing will be searched".to_string());
        }
        if self.search_queries.is_empty() {
            warnings.push("No search_queries configured; nothing will be searched".to_string());
        }
        if self.keywords.is_empty() {
            warnings.push("No keywords configured; every posting will be filtered out".to_string());
        }
        if self.email_enabled && self.page_url.trim().is_empty() {
            warnings.push("page_url is empty; the email will not link to the report".to_string());
        }
        warnings
    }

    /// Number of provider calls one run makes.
    pub fn search_pair_count(&self) -> usize {
        self.locations.len() * self.search_queries.len()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            search_queries: Vec::new(),
            keywords: Vec::new(),
            email_enabled: defaults::email_enabled(),
            page_url: String::new(),
            search: SearchConfig::default(),
            paths: PathsConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

/// A place to search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// Location string passed verbatim to the provider
    pub search_string: String,
}

/// Search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Provider search endpoint
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Provider engine name
    #[serde(default = "defaults::engine")]
    pub engine: String,

    /// Result language
    #[serde(default = "defaults::language")]
    pub language: String,

    /// Result window filter
    #[serde(default = "defaults::chips")]
    pub chips: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            engine: defaults::engine(),
            language: defaults::language(),
            chips: defaults::chips(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// File locations. Relative paths resolve against the config file directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Persisted seen-set
    #[serde(default = "defaults::seen_file")]
    pub seen_file: String,

    /// Directory the HTML report is written into
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,

    /// Directory holding template overrides
    #[serde(default = "defaults::templates_dir")]
    pub templates_dir: String,
}

impl PathsConfig {
    pub fn seen_file(&self, base: &Path) -> PathBuf {
        base.join(&self.seen_file)
    }

    pub fn output_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.output_dir)
    }

    pub fn templates_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.templates_dir)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            seen_file: defaults::seen_file(),
            output_dir: defaults::output_dir(),
            templates_dir: defaults::templates_dir(),
        }
    }
}

/// Email digest settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Leading part of the subject line
    #[serde(default = "defaults::subject_prefix")]
    pub subject_prefix: String,

    /// Relay used when `SMTP_SERVER` is unset
    #[serde(default = "defaults::smtp_server")]
    pub default_server: String,

    /// Port used when `SMTP_PORT` is unset
    #[serde(default = "defaults::smtp_port")]
    pub default_port: u16,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            subject_prefix: defaults::subject_prefix(),
            default_server: defaults::smtp_server(),
            default_port: defaults::smtp_port(),
        }
    }
}

mod defaults {
    pub fn email_enabled() -> bool {
        true
    }

    // Search defaults
    pub fn endpoint() -> String {
        "https://serpapi.com/search".into()
    }
    pub fn engine() -> String {
        "google_jobs".into()
    }
    pub fn language() -> String {
        "en".into()
    }
    pub fn chips() -> String {
        "date_posted:week".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; jobscan/0.1)".into()
    }

    // Path defaults
    pub fn seen_file() -> String {
        "data/seen_jobs.json".into()
    }
    pub fn output_dir() -> String {
        "docs".into()
    }
    pub fn templates_dir() -> String {
        "templates".into()
    }

    // Email defaults
    pub fn subject_prefix() -> String {
        "GA Nurse Jobs".into()
    }
    pub fn smtp_server() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }
}
