//! jobscan CLI
//!
//! One invocation performs at most one scan. Scheduling is left to cron or
//! whatever triggers the binary.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use jobscan::{
    config::load_config,
    error::Result,
    models::RunEnv,
    pipeline::{self, RunOptions},
    report::REPORT_FILE,
    services::{Notifier, NotifyOutcome, SerpApiClient, SmtpMailer},
    storage::{LocalSeenStore, SeenStore},
    utils::log as console,
};

/// jobscan - Nursing Job Posting Scanner
#[derive(Parser, Debug)]
#[command(
    name = "jobscan",
    version,
    about = "Scans a job-search API for nursing postings and publishes a report"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan, write the HTML report and send the email digest
    Run {
        /// Send the digest even if nothing is new (same as FORCE_EMAIL)
        #[arg(long)]
        force_email: bool,

        /// Skip the email digest for this run
        #[arg(long, conflicts_with = "force_email")]
        no_email: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Show seen-set and report status
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .target(env_logger::Target::Stdout)
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let loaded = load_config(&cli.config)?;
    let config = &loaded.config;
    let base_path = &loaded.base_path;
    log::debug!("Loaded configuration from {}", cli.config.display());

    let command = cli.command.unwrap_or(Command::Run {
        force_email: false,
        no_email: false,
    });

    match command {
        Command::Run {
            force_email,
            no_email,
        } => {
            console::header(&format!("GA Nurse Jobs Scanner - {}", Utc::now().to_rfc3339()));

            let env = RunEnv::from_env();
            let source = SerpApiClient::new(&config.search, env.serpapi_key.clone())?;
            if !source.has_credential() {
                log::warn!("No SERPAPI_KEY set; every search will be skipped");
            }
            let store = LocalSeenStore::new(config.paths.seen_file(base_path));
            let notifier = Notifier::new(&config.email, &env, Arc::new(SmtpMailer));
            let options = RunOptions {
                force_email: force_email || env.force_email,
                skip_email: no_email,
            };

            let summary =
                pipeline::run_pipeline(config, base_path, &source, &store, &notifier, options)
                    .await?;

            let email = match &summary.notify {
                None => "disabled".to_string(),
                Some(NotifyOutcome::Sent { recipients }) => format!("sent to {}", recipients),
                Some(NotifyOutcome::SkippedNoNewJobs) => "skipped (nothing new)".to_string(),
                Some(NotifyOutcome::SkippedNotConfigured) => "skipped (not configured)".to_string(),
                Some(NotifyOutcome::Failed(reason)) => format!("failed: {}", reason),
            };
            let stats = &summary.result.stats;
            console::separator();
            console::summary(
                "Run",
                &[
                    ("Searches", format!("{} ({} failed)", stats.pairs, stats.failed_pairs)),
                    ("Results fetched", stats.fetched.to_string()),
                    ("Keyword matches", stats.matched.to_string()),
                    ("Unique postings", summary.result.all_jobs.len().to_string()),
                    ("New postings", summary.result.new_jobs.len().to_string()),
                    ("Report", summary.report_path.display().to_string()),
                    ("Email", email),
                ],
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            console::summary(
                "Configuration",
                &[
                    ("Locations", config.locations.len().to_string()),
                    ("Search queries", config.search_queries.len().to_string()),
                    ("Keywords", config.keywords.len().to_string()),
                    ("Searches per run", config.search_pair_count().to_string()),
                    ("Email enabled", config.email_enabled.to_string()),
                ],
            );
            log::info!("✓ Config OK");
        }

        Command::Info => {
            let store = LocalSeenStore::new(config.paths.seen_file(base_path));
            let seen = store.load().await?;
            let latest = seen
                .values()
                .max()
                .cloned()
                .unwrap_or_else(|| "never".to_string());
            let report = config.paths.output_dir(base_path).join(REPORT_FILE);

            console::summary(
                "Status",
                &[
                    ("Seen-set", store.path().display().to_string()),
                    ("Postings seen", seen.len().to_string()),
                    ("Latest first-seen", latest),
                    (
                        "Report",
                        if report.exists() {
                            report.display().to_string()
                        } else {
                            "not written yet".to_string()
                        },
                    ),
                ],
            );
        }
    }

    log::info!("Done.");

    Ok(())
}
