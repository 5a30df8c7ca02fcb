// src/pipeline/scan.rs

//! Fetch → normalize → filter → dedup → persist.

use std::collections::HashMap;

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, JobRecord, ScanResult, ScanStats};
use crate::services::JobSource;
use crate::storage::SeenStore;
use crate::utils::log::sub_item;

use super::filter::KeywordFilter;
use super::normalize::normalize;

/// Run one scan over every (location, query) pair in configuration order.
///
/// A pair that fails is logged and contributes nothing; the scan itself
/// only fails if the seen-set cannot be loaded or saved.
pub async fn run_scan(
    config: &Config,
    source: &dyn JobSource,
    store: &dyn SeenStore,
) -> Result<ScanResult> {
    let seen_before = store.load().await?;
    let filter = KeywordFilter::new(&config.keywords);
    if filter.is_empty() {
        log::warn!("No keywords configured; every posting will be dropped");
    }

    let mut stats = ScanStats::default();
    let mut kept = Vec::new();

    for location in &config.locations {
        for query in &config.search_queries {
            stats.pairs += 1;
            log::info!("Searching: '{}' in '{}'", query, location.search_string);

            let results = match source.search(query, &location.search_string).await {
                Ok(results) => results,
                Err(e) if e.is_missing_credential() => {
                    stats.failed_pairs += 1;
                    log::warn!(
                        "{}; skipping: {} in {}",
                        e,
                        query,
                        location.search_string
                    );
                    Vec::new()
                }
                Err(e) => {
                    stats.failed_pairs += 1;
                    log::error!("Search request failed: {}", e);
                    Vec::new()
                }
            };
            sub_item(&format!("Found {} results", results.len()));
            stats.fetched += results.len();

            for raw in results {
                let mut job = normalize(raw, Utc::now());
                if !filter.matches(&job) {
                    continue;
                }
                job.id = job.identity();
                stats.matched += 1;
                kept.push(job);
            }
        }
    }

    let all_jobs = dedup_jobs(kept);
    let new_jobs: Vec<JobRecord> = all_jobs
        .iter()
        .filter(|job| !seen_before.contains_key(&job.id))
        .cloned()
        .collect();

    let mut seen = seen_before;
    for job in &new_jobs {
        seen.entry(job.id.clone())
            .or_insert_with(|| job.scraped_at_iso());
    }
    store.save(&seen).await?;

    log::info!(
        "Scan complete: {} jobs ({} new) from {} pairs ({} failed)",
        all_jobs.len(),
        new_jobs.len(),
        stats.pairs,
        stats.failed_pairs
    );

    Ok(ScanResult {
        all_jobs,
        new_jobs,
        stats,
    })
}

/// Collapse records sharing an identity key.
///
/// Each key keeps the position of its first occurrence; the fields of the
/// last occurrence win.
pub fn dedup_jobs(jobs: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<JobRecord> = Vec::with_capacity(jobs.len());

    for job in jobs {
        match index.get(&job.id) {
            Some(&pos) => deduped[pos] = job,
            None => {
                index.insert(job.id.clone(), deduped.len());
                deduped.push(job);
            }
        }
    }
    deduped
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tempfile::TempDir;

    use super::testing::{StaticSource, raw};
    use super::*;
    use crate::models::Location;
    use crate::storage::{LocalSeenStore, SeenSet};

    fn config() -> Config {
        Config {
            locations: vec![
                Location {
                    search_string: "Tifton, Georgia".into(),
                },
                Location {
                    search_string: "Valdosta, Georgia".into(),
                },
            ],
            search_queries: vec!["infection control nurse".into(), "PRN RN".into()],
            keywords: vec!["infection control".into(), "infectious disease".into()],
            ..Config::default()
        }
    }

    fn source() -> StaticSource {
        StaticSource::default()
            .with(
                "infection control nurse",
                "Tifton, Georgia",
                vec![
                    raw("PRN Infection Control Nurse", "Tift Regional", "Tifton, GA", "PRN role"),
                    raw("Med Surg RN", "Tift Regional", "Tifton, GA", "Floor nursing"),
                ],
            )
            .with(
                "PRN RN",
                "Tifton, Georgia",
                vec![raw(
                    "PRN Infection Control Nurse",
                    "Tift Regional",
                    "Tifton, GA",
                    "Updated listing text",
                )],
            )
            .with(
                "infection control nurse",
                "Valdosta, Georgia",
                vec![raw(
                    "Infectious Disease RN",
                    "SGMC",
                    "Valdosta, GA",
                    "Outpatient clinic",
                )],
            )
    }

    fn store(tmp: &TempDir) -> LocalSeenStore {
        LocalSeenStore::new(tmp.path().join("seen_jobs.json"))
    }

    fn ids(jobs: &[JobRecord]) -> Vec<String> {
        jobs.iter().map(|j| j.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_pairs_visited_in_config_order() {
        let tmp = TempDir::new().unwrap();
        let src = source();
        run_scan(&config(), &src, &store(&tmp)).await.unwrap();

        assert_eq!(
            src.call_log(),
            vec![
                ("infection control nurse".into(), "Tifton, Georgia".into()),
                ("PRN RN".into(), "Tifton, Georgia".into()),
                ("infection control nurse".into(), "Valdosta, Georgia".into()),
                ("PRN RN".into(), "Valdosta, Georgia".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_filter_and_dedup() {
        let tmp = TempDir::new().unwrap();
        let result = run_scan(&config(), &source(), &store(&tmp)).await.unwrap();

        let titles: Vec<&str> = result.all_jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["PRN Infection Control Nurse", "Infectious Disease RN"]);

        let unique: HashSet<String> = ids(&result.all_jobs).into_iter().collect();
        assert_eq!(unique.len(), result.all_jobs.len());

        // later duplicate's fields win
        assert_eq!(result.all_jobs[0].description_snippet, "Updated listing text");

        assert_eq!(result.stats.pairs, 4);
        assert_eq!(result.stats.fetched, 4);
        assert_eq!(result.stats.matched, 3);
    }

    #[tokio::test]
    async fn test_first_run_everything_new_and_persisted() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let result = run_scan(&config(), &source(), &store).await.unwrap();

        assert_eq!(ids(&result.new_jobs), ids(&result.all_jobs));
        let seen = store.load().await.unwrap();
        for job in &result.all_jobs {
            assert_eq!(seen.get(&job.id), Some(&job.scraped_at_iso()));
        }
    }

    #[tokio::test]
    async fn test_second_run_finds_nothing_new() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let first = run_scan(&config(), &source(), &store).await.unwrap();
        let seen_after_first = store.load().await.unwrap();

        let second = run_scan(&config(), &source(), &store).await.unwrap();
        assert!(second.new_jobs.is_empty());
        assert_eq!(ids(&second.all_jobs), ids(&first.all_jobs));

        // first-seen timestamps are not overwritten
        assert_eq!(store.load().await.unwrap(), seen_after_first);
    }

    #[tokio::test]
    async fn test_new_jobs_exclude_previously_seen() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let known = crate::models::identity_key("Infectious Disease RN", "SGMC", "Valdosta, GA");
        let mut seen = SeenSet::new();
        seen.insert(known.clone(), "2026-09-01T00:00:00.000000+00:00".into());
        seen.insert("000000000000".into(), "2026-08-01T00:00:00.000000+00:00".into());
        store.save(&seen).await.unwrap();

        let result = run_scan(&config(), &source(), &store).await.unwrap();

        assert_eq!(result.all_jobs.len(), 2);
        assert_eq!(result.new_jobs.len(), 1);
        assert_ne!(result.new_jobs[0].id, known);

        let after = store.load().await.unwrap();
        for (key, value) in &seen {
            assert_eq!(after.get(key), Some(value));
        }
        assert_eq!(after.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_pair_does_not_abort() {
        let tmp = TempDir::new().unwrap();
        let src = source().failing("PRN RN", "Tifton, Georgia");
        let result = run_scan(&config(), &src, &store(&tmp)).await.unwrap();

        assert_eq!(result.stats.failed_pairs, 1);
        assert_eq!(src.call_log().len(), 4);
        assert_eq!(result.all_jobs.len(), 2);
        assert_eq!(result.all_jobs[0].description_snippet, "PRN role");
    }

    #[tokio::test]
    async fn test_malformed_seen_set_is_fatal() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("seen_jobs.json"), b"[[[").unwrap();
        let src = source();

        assert!(run_scan(&config(), &src, &store(&tmp)).await.is_err());
        assert!(src.call_log().is_empty());
    }

    #[tokio::test]
    async fn test_empty_config_saves_unchanged_set() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let result = run_scan(&Config::default(), &source(), &store).await.unwrap();

        assert!(result.all_jobs.is_empty());
        assert!(result.new_jobs.is_empty());
        assert!(store.load().await.unwrap().is_empty());
        assert!(store.path().exists());
    }

    #[test]
    fn test_dedup_keeps_first_position_last_fields() {
        let make = |id: &str, via: &str| JobRecord {
            id: id.into(),
            title: String::new(),
            company_name: String::new(),
            location: String::new(),
            description_snippet: String::new(),
            detected_extensions: Default::default(),
            apply_link: String::new(),
            via: via.into(),
            scraped_at: Utc::now(),
        };
        let out = dedup_jobs(vec![make("a", "1"), make("b", "2"), make("a", "3")]);
        let pairs: Vec<(&str, &str)> = out.iter().map(|j| (j.id.as_str(), j.via.as_str())).collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }
}
