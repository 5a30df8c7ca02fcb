//! Pipeline entry points for scanner operations.
//!
//! - `run_scan`: Fetch, normalize, filter and dedup postings; update the seen-set
//! - `run_pipeline`: Scan, then publish the report and send the digest

pub mod filter;
pub mod normalize;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod scan;

pub use filter::KeywordFilter;
pub use normalize::normalize;
pub use pipeline::{RunOptions, RunSummary, run_pipeline};
pub use scan::{dedup_jobs, run_scan};
