//! # Messaging Transports
//!
//! Capability traits for the three outbound channels. The core builds the
//! recipients and payloads; the transports own delivery. Every send is
//! best-effort from the caller's point of view: a failed push or email is
//! logged and never rolls back a state transition.
//!
//! ## Implementations
//!
//! - [`LogMailer`] / [`LogPush`] / [`LogSms`] - development/testing
//!   implementations that log the message instead of sending it

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::models::{Job, NotificationEnvelope};

/// Errors that can occur during message delivery.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to send message: {0}")]
    SendFailed(String),
}

/// Email template identifier plus the template-specific data. Bodies are
/// rendered by the external mail system; the core only names the template
/// and supplies its parameters.
#[derive(Debug, Clone)]
pub enum EmailTemplate {
    JobCreated,
    JobAccepted,
    /// Timedout booking reset to pending by an admin.
    JobReopenedCustomer,
    /// Booking left pending/assigned for a non-acceptance reason.
    StatusChangedCustomer,
    /// Tells the active translator their booking was cancelled.
    JobCancelTranslator,
    SessionEnded {
        session_time: String,
        /// `faktura` towards the customer, `lön` towards the translator.
        for_text: &'static str,
    },
    ChangedDate {
        old_time: OffsetDateTime,
    },
    ChangedLang {
        old_lang: String,
    },
    ChangedTranslatorCustomer,
    ChangedTranslatorOldTranslator,
    ChangedTranslatorNewTranslator,
}

impl EmailTemplate {
    /// Stable template key understood by the mail system.
    pub fn key(&self) -> &'static str {
        match self {
            EmailTemplate::JobCreated => "emails.job-created",
            EmailTemplate::JobAccepted => "emails.job-accepted",
            EmailTemplate::JobReopenedCustomer => "emails.job-change-status-to-customer",
            EmailTemplate::StatusChangedCustomer => {
                "emails.status-changed-from-pending-or-assigned-customer"
            }
            EmailTemplate::JobCancelTranslator => "emails.job-cancel-translator",
            EmailTemplate::SessionEnded { .. } => "emails.session-ended",
            EmailTemplate::ChangedDate { .. } => "emails.job-changed-date",
            EmailTemplate::ChangedLang { .. } => "emails.job-changed-lang",
            EmailTemplate::ChangedTranslatorCustomer => {
                "emails.job-changed-translator-customer"
            }
            EmailTemplate::ChangedTranslatorOldTranslator => {
                "emails.job-changed-translator-old-translator"
            }
            EmailTemplate::ChangedTranslatorNewTranslator => {
                "emails.job-changed-translator-new-translator"
            }
        }
    }
}

/// Trait for email sending services.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends a templated email about `job` to the given address.
    async fn send(
        &self,
        to: &str,
        name: &str,
        subject: &str,
        template: &EmailTemplate,
        job: &Job,
    ) -> Result<(), TransportError>;
}

/// Trait for the push transport. `recipients` is the OR-combined
/// exact-email tag expression built by the dispatcher; the transport
/// resolves it to device registrations.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(
        &self,
        recipients: &Value,
        envelope: &NotificationEnvelope,
    ) -> Result<(), TransportError>;
}

/// One queued SMS.
#[derive(Debug, Clone)]
pub struct SmsMessage {
    pub to: String,
    pub body: String,
}

/// Delivery report for an SMS batch.
#[derive(Debug, Clone, Copy)]
pub struct SmsDeliveryStatus {
    pub accepted: usize,
}

/// Trait for batched SMS sending.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send_batch(
        &self,
        messages: &[SmsMessage],
    ) -> Result<SmsDeliveryStatus, TransportError>;
}

/// Mock mailer for development and testing; logs instead of sending.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    #[instrument(skip(self, template, job), fields(to = %to, subject = %subject))]
    async fn send(
        &self,
        to: &str,
        name: &str,
        subject: &str,
        template: &EmailTemplate,
        job: &Job,
    ) -> Result<(), TransportError> {
        info!(template = template.key(), job_id = %job.id, "Sending mock email");

        println!("====== MOCK EMAIL SENT ======");
        println!("To: {name} <{to}>");
        println!("Subject: {subject}");
        println!("Template: {}", template.key());
        println!("=============================");

        Ok(())
    }
}

/// Mock push transport for development and testing.
pub struct LogPush;

#[async_trait]
impl PushTransport for LogPush {
    #[instrument(skip_all, fields(job_id = %envelope.job_id))]
    async fn send(
        &self,
        recipients: &Value,
        envelope: &NotificationEnvelope,
    ) -> Result<(), TransportError> {
        info!(
            notification_type = %envelope.notification_type,
            delayed = envelope.delay_until.is_some(),
            "Sending mock push"
        );

        println!("====== MOCK PUSH SENT =======");
        println!("Recipients: {recipients}");
        println!("Message: {}", envelope.message);
        if let Some(delay_until) = envelope.delay_until {
            println!("Send after: {delay_until}");
        }
        println!("=============================");

        Ok(())
    }
}

/// Mock SMS transport for development and testing.
pub struct LogSms;

#[async_trait]
impl SmsTransport for LogSms {
    async fn send_batch(
        &self,
        messages: &[SmsMessage],
    ) -> Result<SmsDeliveryStatus, TransportError> {
        info!(count = messages.len(), "Sending mock SMS batch");

        for message in messages {
            println!("====== MOCK SMS SENT ========");
            println!("To: {}", message.to);
            println!("{}", message.body);
            println!("=============================");
        }

        Ok(SmsDeliveryStatus {
            accepted: messages.len(),
        })
    }
}
