//! # Notification Dispatcher
//!
//! Recipient selection and delivery policy for the push and SMS channels.
//! The dispatcher decides who hears about a job and when (night-time pushes
//! are delayed to business hours for opted-out users); actual delivery is
//! the transports' problem and a failed send is logged, never propagated.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::BookingResult;
use crate::models::{
    CustomerProfile, Job, NotificationEnvelope, NotificationType, TranslatorProfile,
};
use crate::services::clock::Clock;
use crate::services::localization::{Localizer, Message};
use crate::services::matching::MatcherService;
use crate::services::transport::{PushTransport, SmsMessage, SmsTransport};
use crate::store::{AssignmentStore, BlacklistStore, JobStore, UserDirectory};
use crate::utils::time_format::{convert_to_hours_mins, due_date_time};

/// The delivery-relevant slice of a profile. Both customer and translator
/// profiles project into one of these, so the targeted-push helpers do not
/// care which side of the booking they are addressing.
pub struct PushTarget<'a> {
    pub email: &'a str,
    pub not_get_notification: bool,
    pub not_get_nighttime: bool,
}

impl<'a> From<&'a TranslatorProfile> for PushTarget<'a> {
    fn from(profile: &'a TranslatorProfile) -> Self {
        Self {
            email: &profile.email,
            not_get_notification: profile.not_get_notification,
            not_get_nighttime: profile.not_get_nighttime,
        }
    }
}

impl<'a> From<&'a CustomerProfile> for PushTarget<'a> {
    fn from(profile: &'a CustomerProfile) -> Self {
        Self {
            email: &profile.email,
            not_get_notification: profile.not_get_notification,
            not_get_nighttime: profile.not_get_nighttime,
        }
    }
}

/// Builds the OR-combined exact-email tag expression the push transport
/// resolves to device registrations.
pub fn recipient_tags(emails: &[&str]) -> Value {
    let mut tags = Vec::with_capacity(emails.len() * 2);
    for (i, email) in emails.iter().enumerate() {
        if i > 0 {
            tags.push(json!({ "operator": "OR" }));
        }
        tags.push(json!({
            "key": "email",
            "relation": "=",
            "value": email.to_lowercase(),
        }));
    }
    Value::Array(tags)
}

pub struct NotificationDispatcher {
    jobs: Arc<dyn JobStore>,
    assignments: Arc<dyn AssignmentStore>,
    users: Arc<dyn UserDirectory>,
    blacklist: Arc<dyn BlacklistStore>,
    push: Arc<dyn PushTransport>,
    sms: Arc<dyn SmsTransport>,
    localizer: Arc<dyn Localizer>,
    clock: Arc<dyn Clock>,
}

impl NotificationDispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        jobs: Arc<dyn JobStore>,
        assignments: Arc<dyn AssignmentStore>,
        users: Arc<dyn UserDirectory>,
        blacklist: Arc<dyn BlacklistStore>,
        push: Arc<dyn PushTransport>,
        sms: Arc<dyn SmsTransport>,
        localizer: Arc<dyn Localizer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            jobs,
            assignments,
            users,
            blacklist,
            push,
            sms,
            localizer,
            clock,
        }
    }

    /// True when this recipient's pushes must be held until business hours.
    fn push_delay_needed(&self, not_get_nighttime: bool) -> bool {
        self.clock.is_night_time() && not_get_nighttime
    }

    /// Fans a pending job out to every eligible translator, split into an
    /// immediate batch and a delayed batch per the night-time policy.
    ///
    /// Returns the number of translators notified. `exclude` drops one
    /// translator from the audience (the one who just backed out).
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    pub async fn notify_suitable_translators(
        &self,
        job: &Job,
        exclude: Option<Uuid>,
    ) -> BookingResult<usize> {
        let candidates =
            MatcherService::find_candidate_translators(job, &*self.users, &*self.blacklist)
                .await?;

        let mut immediate: Vec<&str> = Vec::new();
        let mut delayed: Vec<&str> = Vec::new();

        for translator in &candidates {
            if exclude == Some(translator.user_id) {
                continue;
            }
            if translator.not_get_notification {
                continue;
            }
            if job.immediate && translator.not_get_emergency {
                continue;
            }
            if MatcherService::has_schedule_conflict(
                job,
                translator.user_id,
                &*self.assignments,
                &*self.jobs,
            )
            .await?
            {
                continue;
            }

            if self.push_delay_needed(translator.not_get_nighttime) {
                delayed.push(&translator.email);
            } else {
                immediate.push(&translator.email);
            }
        }

        let language = self.localizer.language_name(job.from_language_id);
        let message = if job.immediate {
            Message::NewEmergencyBooking {
                language: language.clone(),
                duration_minutes: job.duration_minutes,
            }
        } else {
            Message::NewBooking {
                language: language.clone(),
                duration_minutes: job.duration_minutes,
            }
        };
        let text = self.localizer.render(&message);

        let notified = immediate.len() + delayed.len();
        info!(
            immediate = immediate.len(),
            delayed = delayed.len(),
            "fanning out suitable-job notifications"
        );

        if !immediate.is_empty() {
            let envelope = NotificationEnvelope {
                job_id: job.id,
                notification_type: NotificationType::SuitableJob,
                language: language.clone(),
                message: text.clone(),
                delay_until: None,
            };
            self.push_to(&recipient_tags(&immediate), &envelope).await;
        }
        if !delayed.is_empty() {
            let envelope = NotificationEnvelope {
                job_id: job.id,
                notification_type: NotificationType::SuitableJob,
                language,
                message: text,
                delay_until: Some(self.clock.next_business_time()),
            };
            self.push_to(&recipient_tags(&delayed), &envelope).await;
        }

        Ok(notified)
    }

    /// SMS counterpart of the fan-out: one text per eligible translator,
    /// worded for phone or on-site sessions. Returns the candidate count.
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    pub async fn sms_suitable_translators(&self, job: &Job) -> BookingResult<usize> {
        let candidates =
            MatcherService::find_candidate_translators(job, &*self.users, &*self.blacklist)
                .await?;

        let (date, time) = due_date_time(job.due);
        let duration = convert_to_hours_mins(job.duration_minutes);

        // On-site wording only for physical-only bookings; anything
        // phone-capable gets the phone text.
        let message = if job.customer_physical_type && !job.customer_phone_type {
            Message::SmsPhysicalJob {
                date,
                time,
                duration,
                town: job.town.clone().unwrap_or_default(),
                job_id: job.id,
            }
        } else {
            Message::SmsPhoneJob {
                date,
                time,
                duration,
                job_id: job.id,
            }
        };
        let body = self.localizer.render(&message);

        let batch: Vec<SmsMessage> = candidates
            .iter()
            .map(|t| SmsMessage {
                to: t.mobile.clone(),
                body: body.clone(),
            })
            .collect();

        if !batch.is_empty() {
            match self.sms.send_batch(&batch).await {
                Ok(status) => {
                    info!(sent = batch.len(), accepted = status.accepted, "SMS batch sent");
                }
                Err(e) => warn!(error = %e, "SMS batch failed"),
            }
        }

        Ok(candidates.len())
    }

    /// Tells the customer their booking has been accepted.
    pub async fn notify_booking_accepted(&self, job: &Job, customer: &CustomerProfile) {
        let language = self.localizer.language_name(job.from_language_id);
        let text = self.localizer.render(&Message::BookingAccepted {
            language: language.clone(),
            duration_minutes: job.duration_minutes,
            due: job.due,
        });
        self.push_targeted(
            job,
            customer.into(),
            NotificationType::JobAccepted,
            language,
            text,
        )
        .await;
    }

    /// Tells the active translator the customer withdrew.
    pub async fn notify_customer_cancelled(&self, job: &Job, translator: &TranslatorProfile) {
        let language = self.localizer.language_name(job.from_language_id);
        let text = self.localizer.render(&Message::CustomerCancelled {
            language: language.clone(),
            duration_minutes: job.duration_minutes,
            due: job.due,
        });
        self.push_targeted(
            job,
            translator.into(),
            NotificationType::JobCancelled,
            language,
            text,
        )
        .await;
    }

    /// Tells the customer their translator backed out and the search restarted.
    pub async fn notify_translator_cancelled(&self, job: &Job, customer: &CustomerProfile) {
        let language = self.localizer.language_name(job.from_language_id);
        let text = self.localizer.render(&Message::TranslatorCancelled {
            language: language.clone(),
            duration_minutes: job.duration_minutes,
            due: job.due,
        });
        self.push_targeted(
            job,
            customer.into(),
            NotificationType::JobCancelled,
            language,
            text,
        )
        .await;
    }

    /// Session-start reminder, worded for on-site or phone sessions.
    pub async fn send_session_start_reminder(&self, job: &Job, target: PushTarget<'_>) {
        let language = self.localizer.language_name(job.from_language_id);
        let (due_date, due_time) = due_date_time(job.due);
        let text = self.localizer.render(&Message::SessionStartReminder {
            language: language.clone(),
            town: job.town.clone().unwrap_or_default(),
            physical: job.customer_physical_type,
            due_date,
            due_time,
            duration_minutes: job.duration_minutes,
        });
        self.push_targeted(
            job,
            target,
            NotificationType::SessionStartRemind,
            language,
            text,
        )
        .await;
    }

    /// Push to a single recipient, honoring their opt-out and night-time
    /// delay preferences.
    async fn push_targeted(
        &self,
        job: &Job,
        target: PushTarget<'_>,
        notification_type: NotificationType,
        language: String,
        message: String,
    ) {
        if target.not_get_notification {
            return;
        }
        let delay_until = self
            .push_delay_needed(target.not_get_nighttime)
            .then(|| self.clock.next_business_time());
        let envelope = NotificationEnvelope {
            job_id: job.id,
            notification_type,
            language,
            message,
            delay_until,
        };
        self.push_to(&recipient_tags(&[target.email]), &envelope).await;
    }

    async fn push_to(&self, recipients: &Value, envelope: &NotificationEnvelope) {
        if let Err(e) = self.push.send(recipients, envelope).await {
            warn!(
                job_id = %envelope.job_id,
                notification_type = %envelope.notification_type,
                error = %e,
                "push delivery failed"
            );
        }
    }
}
