// src/pipeline/filter.rs

//! Keyword relevance filter.

use crate::models::JobRecord;

/// Keeps postings whose title or description mentions a configured keyword.
///
/// Matching is a case-folded substring test against
/// `"{title} {description_snippet}"`. With no keywords nothing matches.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether `job` should be kept.
    pub fn matches(&self, job: &JobRecord) -> bool {
        let combined = format!("{} {}", job.title, job.description_snippet).to_lowercase();
        self.keywords.iter().any(|kw| combined.contains(kw.as_str()))
    }
}
