//! Service layer for the job scanner.
//!
//! - Job search against the provider (`SerpApiClient`)
//! - Email digest delivery (`Notifier`, `SmtpMailer`)

pub mod notifier;
pub mod search;

pub use notifier::{Mailer, Notifier, NotifyOutcome, OutgoingEmail, SmtpMailer};
pub use search::{JobSource, SerpApiClient};
