//! Credentials and switches taken from the process environment.

use std::fmt;

use crate::models::EmailConfig;

pub const SERPAPI_KEY: &str = "SERPAPI_KEY";
pub const SMTP_SERVER: &str = "SMTP_SERVER";
pub const SMTP_PORT: &str = "SMTP_PORT";
pub const SMTP_USER: &str = "SMTP_USER";
pub const SMTP_PASS: &str = "SMTP_PASS";
pub const EMAIL_TO: &str = "EMAIL_TO";
pub const FORCE_EMAIL: &str = "FORCE_EMAIL";

/// Everything a run reads from the environment, captured once at startup.
#[derive(Clone, Default)]
pub struct RunEnv {
    /// Search provider credential
    pub serpapi_key: Option<String>,

    /// Relay host, when overridden
    pub smtp_server: Option<String>,

    /// Relay port, as given (parsed by the notifier)
    pub smtp_port: Option<String>,

    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,

    /// Comma-separated recipients
    pub email_to: Option<String>,

    /// Send the digest even without new postings
    pub force_email: bool,
}

impl RunEnv {
    /// Capture from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Capture through an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            serpapi_key: get(SERPAPI_KEY),
            smtp_server: get(SMTP_SERVER),
            smtp_port: get(SMTP_PORT),
            smtp_user: get(SMTP_USER),
            smtp_pass: get(SMTP_PASS),
            email_to: get(EMAIL_TO),
            force_email: get(FORCE_EMAIL).is_some(),
        }
    }

    /// Resolve SMTP settings, or `None` when user, password or recipient is missing.
    pub fn smtp_settings(&self, defaults: &EmailConfig) -> Option<SmtpSettings> {
        let username = self.smtp_user.clone()?;
        let password = self.smtp_pass.clone()?;
        let recipients: Vec<String> = self
            .email_to
            .as_deref()?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if recipients.is_empty() {
            return None;
        }

        Some(SmtpSettings {
            server: self
                .smtp_server
                .clone()
                .unwrap_or_else(|| defaults.default_server.clone()),
            port: self.smtp_port.clone(),
            default_port: defaults.default_port,
            username,
            password,
            recipients,
        })
    }
}

impl fmt::Debug for RunEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunEnv")
            .field("serpapi_key", &self.serpapi_key.as_ref().map(|_| "[REDACTED]"))
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_pass", &self.smtp_pass.as_ref().map(|_| "[REDACTED]"))
            .field("email_to", &self.email_to)
            .field("force_email", &self.force_email)
            .finish()
    }
}

/// Resolved SMTP relay settings.
#[derive(Clone)]
pub struct SmtpSettings {
    pub server: String,
    port: Option<String>,
    default_port: u16,
    pub username: String,
    pub password: String,
    pub recipients: Vec<String>,
}

impl SmtpSettings {
    /// Relay port; `None` if `SMTP_PORT` is set but not a port number.
    pub fn port(&self) -> Option<u16> {
        match &self.port {
            Some(raw) => raw.trim().parse().ok().filter(|p| *p != 0),
            None => Some(self.default_port),
        }
    }
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("server", &self.server)
            .field("port", &self.port())
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("recipients", &self.recipients)
            .finish()
    }
}
