// src/services/notifier.rs

//! Email digest delivery.
//!
//! Nothing here fails a run. Missing credentials and delivery errors are
//! logged and reported through [`NotifyOutcome`].

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::{EmailConfig, RunEnv, SmtpSettings};
use crate::utils::plural_suffix;

/// A rendered email ready to hand to a relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

/// Delivers one email per call, in one SMTP session.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, smtp: &SmtpSettings, port: u16, email: &OutgoingEmail) -> Result<()>;
}

/// Mailer backed by an SMTP relay with STARTTLS and login.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailer;

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, smtp: &SmtpSettings, port: u16, email: &OutgoingEmail) -> Result<()> {
        let from: Mailbox = email.from.parse().map_err(AppError::email)?;
        let mut builder = Message::builder()
            .from(from)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML);
        for to in &email.to {
            let mailbox: Mailbox = to.parse().map_err(AppError::email)?;
            builder = builder.to(mailbox);
        }
        let message = builder
            .body(email.html_body.clone())
            .map_err(AppError::email)?;

        let credentials = Credentials::new(smtp.username.clone(), smtp.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.server)
            .map_err(AppError::email)?
            .port(port)
            .credentials(credentials)
            .build();

        transport.send(message).await.map_err(AppError::email)?;
        Ok(())
    }
}

/// What the notifier did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Delivered to this many recipients
    Sent { recipients: usize },
    /// Nothing new and not forced
    SkippedNoNewJobs,
    /// Credentials or recipients missing or invalid
    SkippedNotConfigured,
    /// The relay refused or could not be reached
    Failed(String),
}

/// Applies the send gate and hands the digest to a [`Mailer`].
pub struct Notifier {
    subject_prefix: String,
    smtp: Option<SmtpSettings>,
    mailer: Arc<dyn Mailer>,
}

impl Notifier {
    pub fn new(config: &EmailConfig, env: &RunEnv, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            subject_prefix: config.subject_prefix.clone(),
            smtp: env.smtp_settings(config),
            mailer,
        }
    }

    /// Subject line for a digest announcing `new_count` postings.
    pub fn subject(&self, new_count: usize) -> String {
        format!(
            "{}: {} new posting{}",
            self.subject_prefix,
            new_count,
            plural_suffix(new_count)
        )
    }

    /// Send the digest if there is something new, or if forced.
    pub async fn notify(&self, html_body: &str, new_count: usize, force: bool) -> NotifyOutcome {
        if new_count == 0 && !force {
            log::info!("No new jobs - skipping email.");
            return NotifyOutcome::SkippedNoNewJobs;
        }

        let Some(smtp) = &self.smtp else {
            log::warn!("Email not configured, skipping.");
            return NotifyOutcome::SkippedNotConfigured;
        };
        let Some(port) = smtp.port() else {
            log::warn!("SMTP_PORT is not a valid port number, skipping email.");
            return NotifyOutcome::SkippedNotConfigured;
        };

        let email = OutgoingEmail {
            from: smtp.username.clone(),
            to: smtp.recipients.clone(),
            subject: self.subject(new_count),
            html_body: html_body.to_string(),
        };

        match self.mailer.send(smtp, port, &email).await {
            Ok(()) => {
                log::info!("Email sent to {}", email.to.join(","));
                NotifyOutcome::Sent {
                    recipients: email.to.len(),
                }
            }
            Err(e) => {
                log::error!("Failed to send email: {}", e);
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingMailer;
    use super::*;

    fn configured_env() -> RunEnv {
        RunEnv {
            smtp_user: Some("scanner@example.com".into()),
            smtp_pass: Some("app-password".into()),
            email_to: Some("nurse@example.com,backup@example.com".into()),
            ..RunEnv::default()
        }
    }

    fn notifier(env: &RunEnv, mailer: Arc<RecordingMailer>) -> Notifier {
        Notifier::new(&EmailConfig::default(), env, mailer)
    }

    #[tokio::test]
    async fn test_no_new_jobs_no_session() {
        let mailer = Arc::new(RecordingMailer::default());
        let outcome = notifier(&configured_env(), mailer.clone())
            .notify("<p>digest</p>", 0, false)
            .await;

        assert_eq!(outcome, NotifyOutcome::SkippedNoNewJobs);
        assert!(mailer.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_one_new_job_singular_subject() {
        let mailer = Arc::new(RecordingMailer::default());
        let outcome = notifier(&configured_env(), mailer.clone())
            .notify("<p>digest</p>", 1, false)
            .await;

        assert_eq!(outcome, NotifyOutcome::Sent { recipients: 2 });
        let sessions = mailer.sessions();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].subject.contains("1 new posting"));
        assert!(!sessions[0].subject.contains("1 new postings"));
        assert_eq!(sessions[0].from, "scanner@example.com");
        assert_eq!(sessions[0].to, vec!["nurse@example.com", "backup@example.com"]);
        assert_eq!(sessions[0].html_body, "<p>digest</p>");
    }

    #[tokio::test]
    async fn test_force_sends_with_zero_new() {
        let mailer = Arc::new(RecordingMailer::default());
        let outcome = notifier(&configured_env(), mailer.clone())
            .notify("<p>digest</p>", 0, true)
            .await;

        assert_eq!(outcome, NotifyOutcome::Sent { recipients: 2 });
        assert_eq!(mailer.sessions()[0].subject, "GA Nurse Jobs: 0 new postings");
    }

    #[tokio::test]
    async fn test_missing_credentials_is_noop() {
        let mailer = Arc::new(RecordingMailer::default());
        let env = RunEnv {
            smtp_pass: None,
            ..configured_env()
        };
        let outcome = notifier(&env, mailer.clone()).notify("x", 3, false).await;

        assert_eq!(outcome, NotifyOutcome::SkippedNotConfigured);
        assert!(mailer.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_port_is_noop() {
        let mailer = Arc::new(RecordingMailer::default());
        let env = RunEnv {
            smtp_port: Some("not-a-port".into()),
            ..configured_env()
        };
        let outcome = notifier(&env, mailer.clone()).notify("x", 3, false).await;

        assert_eq!(outcome, NotifyOutcome::SkippedNotConfigured);
        assert!(mailer.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_is_swallowed() {
        let mailer = Arc::new(RecordingMailer::failing("535 authentication failed"));
        let outcome = notifier(&configured_env(), mailer.clone())
            .notify("x", 2, false)
            .await;

        assert!(matches!(outcome, NotifyOutcome::Failed(ref m) if m.contains("535")));
        assert_eq!(mailer.sessions().len(), 1);
    }

    #[test]
    fn test_subject_pluralization() {
        let n = notifier(&configured_env(), Arc::new(RecordingMailer::default()));
        assert_eq!(n.subject(1), "GA Nurse Jobs: 1 new posting");
        assert_eq!(n.subject(2), "GA Nurse Jobs: 2 new postings");
    }
}
