// src/pipeline/normalize.rs

//! Provider record → canonical job record.

use chrono::{DateTime, Utc};

use crate::models::{JobRecord, RawJob};
use crate::utils::truncate_chars;

/// Longest description kept, in characters.
pub const SNIPPET_MAX_CHARS: usize = 500;

/// Title and company used when the provider omits them.
pub const UNKNOWN: &str = "Unknown";

/// Map a raw provider record onto a [`JobRecord`].
///
/// Total over missing fields. The identity key is left empty; it is
/// assigned once the record survives filtering.
pub fn normalize(raw: RawJob, scraped_at: DateTime<Utc>) -> JobRecord {
    let apply_link = match raw.apply_options.as_ref().and_then(|opts| opts.first()) {
        Some(first) => first.link.clone().unwrap_or_default(),
        None => raw.share_link.clone().unwrap_or_default(),
    };

    JobRecord {
        id: String::new(),
        title: raw.title.unwrap_or_else(|| UNKNOWN.to_string()),
        company_name: raw.company_name.unwrap_or_else(|| UNKNOWN.to_string()),
        location: raw.location.unwrap_or_default(),
        description_snippet: truncate_chars(
            raw.description.as_deref().unwrap_or(""),
            SNIPPET_MAX_CHARS,
        ),
        detected_extensions: raw.detected_extensions.unwrap_or_default(),
        apply_link,
        via: raw.via.unwrap_or_default(),
        scraped_at,
    }
}
