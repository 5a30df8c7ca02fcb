// src/report/mod.rs

//! HTML report page and email digest rendering.

pub mod template;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{Config, JobRecord, ScanResult};

pub use template::{Context, Template};

pub const REPORT_TEMPLATE: &str = "index.html";
pub const EMAIL_TEMPLATE: &str = "email.html";
pub const JOB_CARD_TEMPLATE: &str = "job_card.html";

/// File name of the published report.
pub const REPORT_FILE: &str = "index.html";

const DEFAULT_REPORT: &str = include_str!("../../templates/index.html");
const DEFAULT_EMAIL: &str = include_str!("../../templates/email.html");
const DEFAULT_JOB_CARD: &str = include_str!("../../templates/job_card.html");

/// Run metadata shown alongside the job lists.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub scan_time: DateTime<Utc>,
    pub locations: Vec<String>,
    pub queries: Vec<String>,
    pub page_url: String,
}

impl ReportMeta {
    pub fn from_config(config: &Config, scan_time: DateTime<Utc>) -> Self {
        Self {
            scan_time,
            locations: config
                .locations
                .iter()
                .map(|l| l.search_string.clone())
                .collect(),
            queries: config.search_queries.clone(),
            page_url: config.page_url.clone(),
        }
    }
}

/// Human-readable scan time, e.g. `October 19, 2026 at 02:05 PM UTC`.
pub fn format_scan_time(time: &DateTime<Utc>) -> String {
    time.format("%B %d, %Y at %I:%M %p UTC").to_string()
}

/// Renders the report page and the email body from one scan result.
#[derive(Debug, Clone)]
pub struct Renderer {
    report: Template,
    email: Template,
    job_card: Template,
}

impl Renderer {
    /// Renderer using the built-in templates.
    pub fn embedded() -> Self {
        Self {
            report: Template::new(REPORT_TEMPLATE, DEFAULT_REPORT),
            email: Template::new(EMAIL_TEMPLATE, DEFAULT_EMAIL),
            job_card: Template::new(JOB_CARD_TEMPLATE, DEFAULT_JOB_CARD),
        }
    }

    /// Renderer preferring templates found in `dir`, falling back to the
    /// built-in ones for any file that is absent.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            report: load_template(dir, REPORT_TEMPLATE, DEFAULT_REPORT)?,
            email: load_template(dir, EMAIL_TEMPLATE, DEFAULT_EMAIL)?,
            job_card: load_template(dir, JOB_CARD_TEMPLATE, DEFAULT_JOB_CARD)?,
        })
    }

    /// Full report page.
    pub fn render_report(&self, result: &ScanResult, meta: &ReportMeta) -> Result<String> {
        let mut ctx = self.base_context(result, meta)?;
        ctx.html("locations", list_items(&meta.locations))
            .html("queries", list_items(&meta.queries));
        self.report.render(&ctx)
    }

    /// Email digest body.
    pub fn render_email(&self, result: &ScanResult, meta: &ReportMeta) -> Result<String> {
        let mut ctx = self.base_context(result, meta)?;
        ctx.text("page_url", &meta.page_url);
        self.email.render(&ctx)
    }

    /// Write the report page into `output_dir`, replacing any previous one.
    pub async fn write_report(&self, html: &str, output_dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(output_dir).await?;
        let path = output_dir.join(REPORT_FILE);
        tokio::fs::write(&path, html).await?;
        Ok(path)
    }

    fn base_context(&self, result: &ScanResult, meta: &ReportMeta) -> Result<Context> {
        let new_ids: HashSet<&str> = result.new_jobs.iter().map(|j| j.id.as_str()).collect();

        let mut ctx = Context::new();
        ctx.text("scan_time", format_scan_time(&meta.scan_time))
            .text("new_count", result.new_jobs.len().to_string())
            .text("total_count", result.all_jobs.len().to_string())
            .html("new_jobs", self.render_cards(&result.new_jobs, &new_ids)?)
            .html("all_jobs", self.render_cards(&result.all_jobs, &new_ids)?);
        Ok(ctx)
    }

    fn render_cards(&self, jobs: &[JobRecord], new_ids: &HashSet<&str>) -> Result<String> {
        if jobs.is_empty() {
            return Ok("<p class=\"empty\">No postings.</p>".to_string());
        }

        let mut html = String::new();
        for job in jobs {
            html.push_str(&self.render_card(job, new_ids.contains(job.id.as_str()))?);
        }
        Ok(html)
    }

    fn render_card(&self, job: &JobRecord, is_new: bool) -> Result<String> {
        let apply_button = if job.apply_link.is_empty() {
            String::new()
        } else {
            format!(
                "<a class=\"apply\" href=\"{}\">Apply</a>",
                html_escape::encode_double_quoted_attribute(&job.apply_link)
            )
        };
        let badge = if is_new {
            "<span class=\"badge\">NEW</span>"
        } else {
            ""
        };
        let tags: String = job
            .extension_labels()
            .iter()
            .map(|label| {
                format!(
                    "<span class=\"tag\">{}</span>",
                    html_escape::encode_text(label)
                )
            })
            .collect();

        let mut ctx = Context::new();
        ctx.text("id", &job.id)
            .text("title", &job.title)
            .text("company_name", &job.company_name)
            .text("location", &job.location)
            .text("description_snippet", &job.description_snippet)
            .text("apply_link", &job.apply_link)
            .text("via", &job.via)
            .text("scraped_at", job.scraped_at_iso())
            .html("apply_button", apply_button)
            .html("badge", badge)
            .html("extensions", tags);
        self.job_card.render(&ctx)
    }
}

fn load_template(dir: &Path, name: &str, fallback: &str) -> Result<Template> {
    let path = dir.join(name);
    match std::fs::read_to_string(&path) {
        Ok(source) => {
            log::debug!("Using template override {}", path.display());
            Ok(Template::new(name, source))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Template::new(name, fallback)),
        Err(e) => Err(AppError::template(name, e)),
    }
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", html_escape::encode_text(item)))
        .collect()
}
