//! Email notification templates and delivery abstractions.
//!
//! Booking and contact flows render an `EmailTemplate` into an
//! `EmailMessage` and hand it to an `EmailSender`. The sender decides how to
//! deliver; the default for local dev is `LogEmailSender`, which logs and
//! returns `Ok(())`, while deployments use `FunctionEmailSender` to dispatch
//! through the serverless send-email function. Delivery is attempted exactly
//! once per message; there is no outbox or retry in this crate.

use crate::{api, errors::ApiError};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

/// Path of the send-email function on the resolved base.
pub const SEND_EMAIL_PATH: &str = "/.netlify/functions/send-email";

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to_email: String,
    pub subject: String,
    pub body: String,
}

/// Notification templates the site sends.
#[derive(Clone, Debug)]
pub enum EmailTemplate {
    BookingConfirmation {
        guest_name: String,
        check_in: String,
        check_out: String,
        guests: u32,
    },
    ContactReceived {
        name: String,
    },
    Welcome {
        name: String,
        newsletter_subscribed: bool,
    },
}

impl EmailTemplate {
    fn subject(&self) -> String {
        match self {
            EmailTemplate::BookingConfirmation { check_in, .. } => {
                format!("Your Solmar booking for {check_in} is confirmed")
            }
            EmailTemplate::ContactReceived { .. } => "We received your message".to_string(),
            EmailTemplate::Welcome { .. } => "Welcome to Solmar".to_string(),
        }
    }

    fn body(&self) -> String {
        match self {
            EmailTemplate::BookingConfirmation {
                guest_name,
                check_in,
                check_out,
                guests,
            } => format!(
                "Hi {guest_name},\n\nYour stay is confirmed: {check_in} to {check_out} \
                 for {guests} guest(s).\n\nSee you soon,\nThe Solmar team"
            ),
            EmailTemplate::ContactReceived { name } => format!(
                "Hi {name},\n\nThanks for reaching out. We will reply within one \
                 business day.\n\nThe Solmar team"
            ),
            EmailTemplate::Welcome {
                name,
                newsletter_subscribed,
            } => {
                let newsletter_line = if *newsletter_subscribed {
                    "You are on the newsletter list; expect occasional updates.\n\n"
                } else {
                    ""
                };
                format!(
                    "Hi {name},\n\nYour account is ready.\n\n{newsletter_line}The Solmar team"
                )
            }
        }
    }

    /// Renders the template into a deliverable message.
    #[must_use]
    pub fn render(&self, to_email: &str) -> EmailMessage {
        EmailMessage {
            to_email: to_email.trim().to_string(),
            subject: self.subject(),
            body: self.body(),
        }
    }
}

/// Email delivery abstraction.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error for the caller to report.
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to_email = %message.to_email,
            subject = %message.subject,
            "email send stub"
        );
        Ok(())
    }
}

/// Sender that dispatches through the serverless send-email function.
pub struct FunctionEmailSender {
    base_url: String,
}

impl FunctionEmailSender {
    /// Builds a sender targeting an explicit base URL. An empty base means
    /// origin-relative calls.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Builds a sender with the base resolved from the current host.
    #[must_use]
    pub fn from_host(current_host: &str, is_production: bool) -> Self {
        Self::new(api::resolve(current_host, is_production))
    }
}

#[async_trait]
impl EmailSender for FunctionEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let payload = json!({
            "to": message.to_email,
            "subject": message.subject,
            "body": message.body,
        });
        api::post_json(&self.base_url, SEND_EMAIL_PATH, &payload, &[])
            .await
            .map_err(|err: ApiError| anyhow::anyhow!("send-email function failed: {err}"))
    }
}
