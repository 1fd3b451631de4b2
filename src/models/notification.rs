//! # Notification Envelope
//!
//! The typed value handed to the push transport: one envelope per fan-out,
//! never persisted. Replaces the upstream system's loose associative
//! payloads with a closed tag set.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Closed set of push-notification tags; the transport may map these to
/// per-type sounds or channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    SuitableJob,
    JobAccepted,
    JobCancelled,
    SessionStartRemind,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationType::SuitableJob => "suitable_job",
            NotificationType::JobAccepted => "job_accepted",
            NotificationType::JobCancelled => "job_cancelled",
            NotificationType::SessionStartRemind => "session_start_remind",
        };
        write!(f, "{s}")
    }
}

/// Ephemeral per-dispatch value: constructed by the dispatcher, consumed by
/// the push transport.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEnvelope {
    pub job_id: Uuid,
    pub notification_type: NotificationType,
    /// Human-readable language name of the job, already resolved.
    pub language: String,
    /// Localized message text, already rendered.
    pub message: String,
    /// When set, the transport must hold delivery until this instant
    /// (night-time delay policy).
    pub delay_until: Option<OffsetDateTime>,
}
