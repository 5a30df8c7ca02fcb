// src/models/mod.rs

//! Domain models for the job scanner.

mod config;
pub mod env;
mod job;

pub use config::{Config, EmailConfig, Location, PathsConfig, SearchConfig};
pub use env::{RunEnv, SmtpSettings};
pub use job::{ApplyOption, IDENTITY_KEY_LEN, JobRecord, RawJob, identity_key};

/// Outcome of one scan: every kept posting, and those not seen before.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Deduplicated postings observed in this run, in first-seen order
    pub all_jobs: Vec<JobRecord>,

    /// Subset of `all_jobs` absent from the seen-set at run start
    pub new_jobs: Vec<JobRecord>,

    pub stats: ScanStats,
}

/// Counters collected while scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// (location, query) pairs attempted
    pub pairs: usize,

    /// Pairs that failed or were skipped
    pub failed_pairs: usize,

    /// Raw results received
    pub fetched: usize,

    /// Results that passed the keyword filter
    pub matched: usize,
}
