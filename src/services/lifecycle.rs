//! # Job Lifecycle Engine
//!
//! Pure state machine for the admin update flow. [`LifecycleEngine::apply`]
//! mutates the job in place and reports which notification effects the
//! caller must run; it never touches storage or transports itself.
//!
//! Transition rules are keyed on the job's *current* status. A requested
//! target that the current status lists but whose guard fails (for example
//! a completed transition without session time) is a silent no-op, matching
//! the fail-soft behavior of the upstream update form. A current status
//! with no transition rules at all is a hard conflict error.

use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};
use crate::models::{Job, JobStatus, JobUpdate};
use crate::utils::time_format::session_label;

/// Side effect a successful transition asks the coordinator to perform.
/// The engine decides *what* to announce; the coordinator knows *whom*.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Customer email for a timedout booking reset to pending.
    EmailJobReopened,
    /// Fan the booking out to all eligible translators again.
    NotifyAllEligible,
    /// Customer acceptance email after an admin-side (re)assignment.
    EmailAcceptConfirmation,
    /// Acceptance email plus session-start reminder pushes to both parties.
    EmailAcceptConfirmationWithReminders,
    /// Customer email when a pending booking moves anywhere but timedout.
    EmailCancellationFromPending,
    /// Session settled by the update form rather than the end flow.
    EmailSessionEnded { session_time: String },
    /// Customer and translator notifications for a withdrawn booking.
    NotifyWithdrawal,
}

/// What a transition attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied { effects: Vec<TransitionEffect> },
    /// Guard failed or the target is not reachable from here; job untouched.
    NoOp,
}

impl TransitionOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, TransitionOutcome::Applied { .. })
    }
}

/// Result of applying a full [`JobUpdate`]: the transition outcome plus the
/// previous values of the always-overwritten fields, so the caller can send
/// "changed" notifications.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub transition: TransitionOutcome,
    pub old_due: Option<OffsetDateTime>,
    pub old_language_id: Option<Uuid>,
}

pub struct LifecycleEngine;

impl LifecycleEngine {
    /// Applies an admin update to the job in place.
    ///
    /// Runs the status transition first (when a different status is
    /// requested), then unconditionally overwrites due time, language,
    /// comments and reference, reporting the old due/language values when
    /// they actually changed.
    #[instrument(skip_all, fields(job_id = %job.id, from = %job.status))]
    pub fn apply(
        job: &mut Job,
        update: &JobUpdate,
        translator_changed: bool,
        now: OffsetDateTime,
    ) -> BookingResult<UpdateOutcome> {
        let transition = match update.status {
            Some(target) if target != job.status => {
                Self::transition(job, target, update, translator_changed, now)?
            }
            _ => TransitionOutcome::NoOp,
        };

        if transition.changed() {
            debug!(to = %job.status, "status transition applied");
        }

        let old_due = (job.due != update.due).then_some(job.due);
        job.due = update.due;

        let old_language_id =
            (job.from_language_id != update.from_language_id).then_some(job.from_language_id);
        job.from_language_id = update.from_language_id;

        job.admin_comments = update.admin_comments.clone();
        job.reference = update.reference.clone();

        Ok(UpdateOutcome {
            transition,
            old_due,
            old_language_id,
        })
    }

    fn transition(
        job: &mut Job,
        target: JobStatus,
        update: &JobUpdate,
        translator_changed: bool,
        now: OffsetDateTime,
    ) -> BookingResult<TransitionOutcome> {
        match job.status {
            JobStatus::Timedout => Ok(Self::from_timedout(job, target, translator_changed, now)),
            JobStatus::Completed => Ok(Self::from_completed(job, target, update)),
            JobStatus::Started => Ok(Self::from_started(job, target, update, now)),
            JobStatus::Pending => {
                Ok(Self::from_pending(job, target, update, translator_changed))
            }
            JobStatus::Withdrawafter24 => Ok(Self::from_withdrawafter24(job, target, update)),
            JobStatus::Assigned => Ok(Self::from_assigned(job, target, update)),
            other => Err(BookingError::StateConflict(format!(
                "no transition from status `{other}`"
            ))),
        }
    }

    /// Timedout bookings can be reset to pending (a reopen through the
    /// update form) or handed straight to a translator.
    fn from_timedout(
        job: &mut Job,
        target: JobStatus,
        translator_changed: bool,
        now: OffsetDateTime,
    ) -> TransitionOutcome {
        if target == JobStatus::Pending {
            job.status = JobStatus::Pending;
            job.created_at = now;
            job.cust_16h_email_sent = false;
            job.cust_48h_email_sent = false;
            return TransitionOutcome::Applied {
                effects: vec![
                    TransitionEffect::EmailJobReopened,
                    TransitionEffect::NotifyAllEligible,
                ],
            };
        }
        if translator_changed {
            job.status = target;
            return TransitionOutcome::Applied {
                effects: vec![TransitionEffect::EmailAcceptConfirmation],
            };
        }
        TransitionOutcome::NoOp
    }

    /// A completed booking can only be pushed back to timedout, and only
    /// with an explanation on record.
    fn from_completed(job: &mut Job, target: JobStatus, update: &JobUpdate) -> TransitionOutcome {
        if target == JobStatus::Timedout && update.admin_comments.is_empty() {
            return TransitionOutcome::NoOp;
        }
        job.status = target;
        TransitionOutcome::Applied { effects: vec![] }
    }

    /// Started bookings always require admin comments to move; completing
    /// one additionally requires the recorded session time.
    fn from_started(
        job: &mut Job,
        target: JobStatus,
        update: &JobUpdate,
        now: OffsetDateTime,
    ) -> TransitionOutcome {
        if update.admin_comments.is_empty() {
            return TransitionOutcome::NoOp;
        }
        if target == JobStatus::Completed {
            let Some(session) = update.session_time.as_deref().filter(|s| !s.is_empty()) else {
                return TransitionOutcome::NoOp;
            };
            job.status = JobStatus::Completed;
            job.end_at = Some(now);
            job.session_time = Some(session.to_string());
            return TransitionOutcome::Applied {
                effects: vec![TransitionEffect::EmailSessionEnded {
                    session_time: session_label(session),
                }],
            };
        }
        job.status = target;
        TransitionOutcome::Applied { effects: vec![] }
    }

    fn from_pending(
        job: &mut Job,
        target: JobStatus,
        update: &JobUpdate,
        translator_changed: bool,
    ) -> TransitionOutcome {
        if target == JobStatus::Timedout && update.admin_comments.is_empty() {
            return TransitionOutcome::NoOp;
        }
        if target == JobStatus::Assigned && translator_changed {
            job.status = JobStatus::Assigned;
            return TransitionOutcome::Applied {
                effects: vec![TransitionEffect::EmailAcceptConfirmationWithReminders],
            };
        }
        job.status = target;
        TransitionOutcome::Applied {
            effects: vec![TransitionEffect::EmailCancellationFromPending],
        }
    }

    fn from_withdrawafter24(
        job: &mut Job,
        target: JobStatus,
        update: &JobUpdate,
    ) -> TransitionOutcome {
        if target != JobStatus::Timedout || update.admin_comments.is_empty() {
            return TransitionOutcome::NoOp;
        }
        job.status = JobStatus::Timedout;
        TransitionOutcome::Applied { effects: vec![] }
    }

    /// Assigned bookings move only towards withdrawal or timeout; timing
    /// out needs an explanation, withdrawing notifies both parties.
    fn from_assigned(job: &mut Job, target: JobStatus, update: &JobUpdate) -> TransitionOutcome {
        match target {
            JobStatus::Timedout => {
                if update.admin_comments.is_empty() {
                    return TransitionOutcome::NoOp;
                }
                job.status = JobStatus::Timedout;
                TransitionOutcome::Applied { effects: vec![] }
            }
            JobStatus::Withdrawbefore24 | JobStatus::Withdrawafter24 => {
                job.status = target;
                TransitionOutcome::Applied {
                    effects: vec![TransitionEffect::NotifyWithdrawal],
                }
            }
            _ => TransitionOutcome::NoOp,
        }
    }
}
