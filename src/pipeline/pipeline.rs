// src/pipeline/pipeline.rs

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, ScanResult};
use crate::report::{ReportMeta, Renderer};
use crate::services::{JobSource, Notifier, NotifyOutcome};
use crate::storage::SeenStore;
use crate::utils::log;

use super::scan::run_scan;

/// Switches for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Send the digest even with no new postings
    pub force_email: bool,

    /// Do not render or send the digest at all
    pub skip_email: bool,
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub result: ScanResult,
    pub report_path: PathBuf,
    /// `None` when email was disabled for this run
    pub notify: Option<NotifyOutcome>,
}

/// Run the full pipeline: scan, publish the report, send the digest.
pub async fn run_pipeline(
    config: &Config,
    base_path: &Path,
    source: &dyn JobSource,
    store: &dyn SeenStore,
    notifier: &Notifier,
    options: RunOptions,
) -> Result<RunSummary> {
    let email_step = config.email_enabled && !options.skip_email;
    let total_steps = if email_step { 3 } else { 2 };

    log::step(1, total_steps, "Scan - Searching for postings");
    let result = run_scan(config, source, store).await?;

    log::step(2, total_steps, "Report - Rendering HTML");
    let renderer = Renderer::load(&config.paths.templates_dir(base_path))?;
    let meta = ReportMeta::from_config(config, Utc::now());
    let html = renderer.render_report(&result, &meta)?;
    let report_path = renderer
        .write_report(&html, &config.paths.output_dir(base_path))
        .await?;
    ::log::info!(
        "Wrote {} with {} jobs ({} new)",
        report_path.display(),
        result.all_jobs.len(),
        result.new_jobs.len()
    );

    let notify = if email_step {
        log::step(3, total_steps, "Email - Sending digest");
        let body = renderer.render_email(&result, &meta)?;
        Some(
            notifier
                .notify(&body, result.new_jobs.len(), options.force_email)
                .await,
        )
    } else {
        ::log::info!("Email disabled - skipping digest.");
        None
    };

    Ok(RunSummary {
        result,
        report_path,
        notify,
    })
}
