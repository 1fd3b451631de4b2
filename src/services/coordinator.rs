//! # Assignment Coordinator
//!
//! The write-side entry point: create, accept, update, cancel, reopen, end
//! and the no-show settlement all live here. Each operation mutates storage
//! first and messages second; a transport failure is logged and never undoes
//! the mutation.

use std::sync::Arc;

use time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};
use crate::models::{
    BookingRequest, CustomerProfile, Job, JobStatus, JobUpdate, TranslatorAssignment,
    TranslatorProfile,
};
use crate::services::clock::Clock;
use crate::services::dispatcher::NotificationDispatcher;
use crate::services::lifecycle::{LifecycleEngine, TransitionEffect};
use crate::services::localization::{Localizer, Message};
use crate::services::matching::MatcherService;
use crate::services::transport::{EmailTemplate, Mailer, PushTransport, SmsTransport};
use crate::store::{AssignmentStore, BlacklistStore, JobStore, UserDirectory};
use crate::utils::constant::{
    CANCEL_WITHIN_24H_MESSAGE, IMMEDIATE_DUE_OFFSET_MINUTES, SELF_SERVICE_CANCEL_CUTOFF_HOURS,
};
use crate::utils::expiry::will_expire_at;
use crate::utils::time_format::{format_datetime, session_interval};

/// Result of a successful accept: the assigned job, the translator's
/// refreshed list of still-open candidates, and the confirmation text.
#[derive(Debug)]
pub struct AcceptOutcome {
    pub job: Job,
    pub candidate_jobs: Vec<Job>,
    pub message: String,
}

/// How a cancellation resolved.
#[derive(Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The customer withdrew; the job is closed in the given status.
    WithdrawnByCustomer { status: JobStatus },
    /// The translator backed out; the job is pending again and was fanned
    /// out to the remaining eligible translators.
    ReturnedToPool,
}

/// How an end-session request resolved.
#[derive(Debug, PartialEq, Eq)]
pub enum EndOutcome {
    /// The job was not in progress; nothing happened.
    NotStarted,
    Ended {
        /// Recorded `HH:MM:SS` interval.
        session_time: String,
        /// The party other than the one who ended the session, if known.
        other_party: Option<Uuid>,
    },
}

pub struct AssignmentCoordinator {
    jobs: Arc<dyn JobStore>,
    assignments: Arc<dyn AssignmentStore>,
    users: Arc<dyn UserDirectory>,
    blacklist: Arc<dyn BlacklistStore>,
    mailer: Arc<dyn Mailer>,
    dispatcher: Arc<NotificationDispatcher>,
    localizer: Arc<dyn Localizer>,
    clock: Arc<dyn Clock>,
}

impl AssignmentCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        jobs: Arc<dyn JobStore>,
        assignments: Arc<dyn AssignmentStore>,
        users: Arc<dyn UserDirectory>,
        blacklist: Arc<dyn BlacklistStore>,
        mailer: Arc<dyn Mailer>,
        push: Arc<dyn PushTransport>,
        sms: Arc<dyn SmsTransport>,
        localizer: Arc<dyn Localizer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&jobs),
            Arc::clone(&assignments),
            Arc::clone(&users),
            Arc::clone(&blacklist),
            push,
            sms,
            Arc::clone(&localizer),
            Arc::clone(&clock),
        ));
        Self {
            jobs,
            assignments,
            users,
            blacklist,
            mailer,
            dispatcher,
            localizer,
            clock,
        }
    }

    pub fn dispatcher(&self) -> Arc<NotificationDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    /// Creates a pending booking for the customer. Validation reports the
    /// first offending field; the job is stored silently, fan-out happens
    /// in [`Self::store_job_email`] once the contact details arrive.
    #[instrument(skip(self, request), fields(customer = %customer_id))]
    pub async fn create(
        &self,
        customer_id: Uuid,
        request: &BookingRequest,
    ) -> BookingResult<Job> {
        let customer = self
            .users
            .customer(customer_id)
            .await?
            .ok_or(BookingError::NotFound("customer"))?;

        let from_language_id = request
            .from_language_id
            .ok_or(BookingError::Validation { field: "from_language_id" })?;
        let duration_minutes = request
            .duration_minutes
            .ok_or(BookingError::Validation { field: "duration" })?;

        let now = self.clock.now();

        let (due, customer_phone_type, customer_physical_type) = if request.immediate {
            // Immediate jobs are due shortly and always phone-capable.
            (
                now + Duration::minutes(IMMEDIATE_DUE_OFFSET_MINUTES),
                true,
                request.customer_physical_type.unwrap_or(false),
            )
        } else {
            let due = request
                .due
                .ok_or(BookingError::Validation { field: "due_date" })?;
            let phone = request.customer_phone_type.unwrap_or(false);
            let physical = request.customer_physical_type.unwrap_or(false);
            if !phone && !physical {
                return Err(BookingError::Validation { field: "customer_phone_type" });
            }
            (due, phone, physical)
        };

        if due <= now {
            return Err(BookingError::BadRequest("Can't create booking in past"));
        }

        let job = Job {
            id: Uuid::new_v4(),
            customer_id,
            status: JobStatus::Pending,
            from_language_id,
            immediate: request.immediate,
            duration_minutes,
            due,
            gender: request.gender,
            certified: request.certified,
            job_type: customer.consumer_type.job_type(),
            customer_phone_type,
            customer_physical_type,
            town: request.town.clone().or(customer.town),
            customer_email: None,
            reference: String::new(),
            admin_comments: String::new(),
            created_at: now,
            will_expire_at: will_expire_at(due, now),
            withdraw_at: None,
            end_at: None,
            session_time: None,
            by_admin: request.by_admin,
            cust_16h_email_sent: false,
            cust_48h_email_sent: false,
        };

        self.jobs.insert(job.clone()).await?;
        info!(job_id = %job.id, immediate = job.immediate, "booking created");
        Ok(job)
    }

    /// Second half of booking creation: records contact details, confirms
    /// to the customer by email and fans the job out to translators.
    #[instrument(skip(self, customer_email, reference, town), fields(job_id = %job_id))]
    pub async fn store_job_email(
        &self,
        job_id: Uuid,
        customer_email: Option<String>,
        reference: String,
        town: Option<String>,
    ) -> BookingResult<Job> {
        let mut job = self.find_job(job_id).await?;

        job.customer_email = customer_email;
        job.reference = reference;
        if town.is_some() {
            job.town = town;
        }
        self.jobs.save(&job).await?;

        let customer = self.users.customer(job.customer_id).await?;
        if let Some(customer) = &customer {
            let subject = format!("Vi har mottagit er tolkbokning. Bokningsnr: #{}", job.id);
            self.email_customer(&job, customer, &subject, &EmailTemplate::JobCreated)
                .await;
        }

        self.dispatcher.notify_suitable_translators(&job, None).await?;
        Ok(job)
    }

    /// Translator accepts a pending booking.
    ///
    /// The pending-to-assigned flip is a compare-and-set on the job store,
    /// so exactly one of two racing translators wins; the loser gets a
    /// state-conflict error carrying the user-facing text.
    #[instrument(skip(self), fields(job_id = %job_id, translator = %translator_id))]
    pub async fn accept(
        &self,
        job_id: Uuid,
        translator_id: Uuid,
    ) -> BookingResult<AcceptOutcome> {
        let job = self.find_job(job_id).await?;
        let translator = self
            .users
            .translator(translator_id)
            .await?
            .ok_or(BookingError::NotFound("translator"))?;

        if MatcherService::has_schedule_conflict(
            &job,
            translator_id,
            &*self.assignments,
            &*self.jobs,
        )
        .await?
        {
            return Err(BookingError::StateConflict(format!(
                "Du har redan en bokning den tiden {}. Du har inte fått denna tolkning",
                format_datetime(job.due)
            )));
        }

        let won = self
            .jobs
            .compare_and_set_status(job_id, JobStatus::Pending, JobStatus::Assigned)
            .await?;
        if !won {
            let language = self.localizer.language_name(job.from_language_id);
            return Err(BookingError::StateConflict(format!(
                "Denna {language}tolkning {}min {} har redan accepterats av annan tolk. \
                 Du har inte fått denna tolkning",
                job.duration_minutes,
                format_datetime(job.due)
            )));
        }

        let now = self.clock.now();
        self.assignments
            .insert(TranslatorAssignment::new(job_id, translator_id, now))
            .await?;

        let job = self.find_job(job_id).await?;
        info!("booking accepted");

        if let Some(customer) = self.users.customer(job.customer_id).await? {
            let subject = format!(
                "Bekräftelse - tolk har accepterat er bokning (bokning # {})",
                job.id
            );
            self.email_customer(&job, &customer, &subject, &EmailTemplate::JobAccepted)
                .await;
            self.dispatcher.notify_booking_accepted(&job, &customer).await;
        }

        let candidate_jobs = MatcherService::find_candidate_jobs(
            &translator,
            &*self.jobs,
            &*self.users,
            &*self.blacklist,
        )
        .await?;

        let language = self.localizer.language_name(job.from_language_id);
        let message = self.localizer.render(&Message::AcceptConfirmation {
            language,
            duration_minutes: job.duration_minutes,
            due: job.due,
        });

        Ok(AcceptOutcome {
            job,
            candidate_jobs,
            message,
        })
    }

    /// Admin update flow: optional reassignment, the status transition with
    /// its effects, then the always-applied field overwrites. Past-due jobs
    /// still run effects but skip the changed-field notifications.
    #[instrument(skip(self, update), fields(job_id = %job_id))]
    pub async fn update(&self, job_id: Uuid, update: &JobUpdate) -> BookingResult<Job> {
        let mut job = self.find_job(job_id).await?;
        let now = self.clock.now();

        let current = match self.assignments.active_for_job(job_id).await? {
            Some(a) => Some(a),
            None => self.assignments.latest_completed_for_job(job_id).await?,
        };
        let current_translator = current.as_ref().map(|a| a.translator_id);
        let translator_changed = update.translator.is_some()
            && update.translator != current_translator;
        let old_translator = translator_changed.then_some(current_translator).flatten();

        // Validate the transition before touching the assignment store: a
        // rejected update must leave no trace in either store.
        let outcome = LifecycleEngine::apply(&mut job, update, translator_changed, now)?;

        if translator_changed
            && let Some(new_translator) = update.translator
        {
            self.assignments.cancel_open_for_job(job_id, now).await?;
            self.assignments
                .insert(TranslatorAssignment::new(job_id, new_translator, now))
                .await?;
        }
        self.jobs.save(&job).await?;

        self.run_effects(&job, &outcome.transition).await?;

        // Changed-field notifications only make sense for upcoming sessions.
        if job.due <= now {
            return Ok(job);
        }

        if let Some(old_due) = outcome.old_due {
            self.send_changed_date(&job, old_due).await?;
        }
        if translator_changed {
            self.send_changed_translator(&job, old_translator, update.translator)
                .await?;
        }
        if let Some(old_language_id) = outcome.old_language_id {
            self.send_changed_lang(&job, old_language_id).await?;
        }

        Ok(job)
    }

    /// Cancels a booking on behalf of `acting_user`.
    ///
    /// The customer may always withdraw; the resulting status depends on
    /// whether 24 hours remain. A translator cancelling with more than 24
    /// hours to go returns the job to the pool; inside the window the
    /// request is refused and must go through support.
    #[instrument(skip(self), fields(job_id = %job_id, user = %acting_user))]
    pub async fn cancel(
        &self,
        job_id: Uuid,
        acting_user: Uuid,
    ) -> BookingResult<CancelOutcome> {
        let mut job = self.find_job(job_id).await?;
        let now = self.clock.now();
        let hours_until_due = (job.due - now).whole_hours();

        if acting_user == job.customer_id {
            job.withdraw_at = Some(now);
            // Status naming is inverted on purpose, kept for compatibility:
            // `withdrawbefore24` means at least 24 hours of notice remained.
            job.status = if hours_until_due >= SELF_SERVICE_CANCEL_CUTOFF_HOURS {
                JobStatus::Withdrawbefore24
            } else {
                JobStatus::Withdrawafter24
            };
            self.jobs.save(&job).await?;
            info!(status = %job.status, "booking withdrawn by customer");

            if let Some(assignment) = self.assignments.active_for_job(job_id).await?
                && let Some(translator) = self.users.translator(assignment.translator_id).await?
            {
                self.dispatcher.notify_customer_cancelled(&job, &translator).await;
            }
            return Ok(CancelOutcome::WithdrawnByCustomer { status: job.status });
        }

        if hours_until_due <= SELF_SERVICE_CANCEL_CUTOFF_HOURS {
            return Err(BookingError::PolicyRefusal(CANCEL_WITHIN_24H_MESSAGE));
        }

        if let Some(customer) = self.users.customer(job.customer_id).await? {
            self.dispatcher.notify_translator_cancelled(&job, &customer).await;
        }

        job.status = JobStatus::Pending;
        job.created_at = now;
        job.will_expire_at = will_expire_at(job.due, now);
        self.jobs.save(&job).await?;
        self.assignments.cancel_open_for_job(job_id, now).await?;
        info!("translator cancelled, booking returned to pool");

        self.dispatcher
            .notify_suitable_translators(&job, Some(acting_user))
            .await?;
        Ok(CancelOutcome::ReturnedToPool)
    }

    /// Reopens a closed booking.
    ///
    /// A timedout booking is reopened as a *new* pending job that references
    /// the old one; any other closed booking is reset in place. Either way
    /// open assignments are closed and the job is fanned out again.
    #[instrument(skip(self), fields(job_id = %job_id, user = %user_id))]
    pub async fn reopen(&self, job_id: Uuid, user_id: Uuid) -> BookingResult<Job> {
        let job = self.find_job(job_id).await?;
        let now = self.clock.now();

        let reopened = if job.status == JobStatus::Timedout {
            let mut copy = job.clone();
            copy.id = Uuid::new_v4();
            copy.status = JobStatus::Pending;
            copy.created_at = now;
            copy.will_expire_at = will_expire_at(copy.due, now);
            copy.admin_comments = format!("This booking is a reopening of booking #{job_id}");
            copy.withdraw_at = None;
            copy.end_at = None;
            copy.session_time = None;
            copy.cust_16h_email_sent = false;
            copy.cust_48h_email_sent = false;
            self.jobs.insert(copy.clone()).await?;
            copy
        } else {
            let mut job = job;
            job.status = JobStatus::Pending;
            job.created_at = now;
            job.will_expire_at = will_expire_at(job.due, now);
            job.withdraw_at = None;
            job.end_at = None;
            job.session_time = None;
            self.jobs.save(&job).await?;
            job
        };

        self.assignments.cancel_open_for_job(job_id, now).await?;

        // Closed audit marker recording who triggered the reopen.
        let mut marker = TranslatorAssignment::new(job_id, user_id, now);
        marker.cancel_at = Some(now);
        self.assignments.insert(marker).await?;

        info!(reopened_id = %reopened.id, "booking reopened");
        self.dispatcher.notify_suitable_translators(&reopened, None).await?;
        Ok(reopened)
    }

    /// Ends an in-progress session, settling the elapsed time against the
    /// due time and emailing both parties. A no-op on any other status.
    #[instrument(skip(self), fields(job_id = %job_id, user = %ending_user))]
    pub async fn end(&self, job_id: Uuid, ending_user: Uuid) -> BookingResult<EndOutcome> {
        let mut job = self.find_job(job_id).await?;
        if job.status != JobStatus::Started {
            return Ok(EndOutcome::NotStarted);
        }

        let now = self.clock.now();
        let (interval, label) = session_interval(job.due, now);
        job.status = JobStatus::Completed;
        job.end_at = Some(now);
        job.session_time = Some(interval.clone());
        self.jobs.save(&job).await?;

        if let Some(customer) = self.users.customer(job.customer_id).await? {
            let subject = format!(
                "Information om avslutad tolkning för bokningsnummer #{}",
                job.id
            );
            self.email_customer(
                &job,
                &customer,
                &subject,
                &EmailTemplate::SessionEnded {
                    session_time: label.clone(),
                    for_text: "faktura",
                },
            )
            .await;
        }

        let assignment = self.assignments.active_for_job(job_id).await?;
        let mut other_party = None;

        if let Some(mut assignment) = assignment {
            if let Some(translator) = self.users.translator(assignment.translator_id).await? {
                let subject = format!(
                    "Information om avslutad tolkning för bokningsnummer # {}",
                    job.id
                );
                self.email_translator(
                    &job,
                    &translator,
                    &subject,
                    &EmailTemplate::SessionEnded {
                        session_time: label,
                        for_text: "lön",
                    },
                )
                .await;
            }

            assignment.completed_at = Some(now);
            assignment.completed_by = Some(ending_user);
            other_party = if ending_user == job.customer_id {
                Some(assignment.translator_id)
            } else {
                Some(job.customer_id)
            };
            self.assignments.save(&assignment).await?;
        }

        info!(session_time = %interval, "session ended");
        Ok(EndOutcome::Ended {
            session_time: interval,
            other_party,
        })
    }

    /// Settles a no-show: the customer never called. The assignment is
    /// completed by its own translator, who is still owed for the slot.
    #[instrument(skip(self), fields(job_id = %job_id))]
    pub async fn customer_not_call(&self, job_id: Uuid) -> BookingResult<Job> {
        let mut job = self.find_job(job_id).await?;
        let now = self.clock.now();

        job.status = JobStatus::NotCarriedOutCustomer;
        job.end_at = Some(now);
        self.jobs.save(&job).await?;

        match self.assignments.active_for_job(job_id).await? {
            Some(mut assignment) => {
                assignment.completed_at = Some(now);
                assignment.completed_by = Some(assignment.translator_id);
                self.assignments.save(&assignment).await?;
            }
            None => warn!("no active assignment to settle for no-show"),
        }

        info!("booking settled as customer no-show");
        Ok(job)
    }

    async fn find_job(&self, job_id: Uuid) -> BookingResult<Job> {
        self.jobs
            .find(job_id)
            .await?
            .ok_or(BookingError::NotFound("job"))
    }

    /// Runs the notification effects a lifecycle transition produced.
    async fn run_effects(
        &self,
        job: &Job,
        outcome: &crate::services::lifecycle::TransitionOutcome,
    ) -> BookingResult<()> {
        use crate::services::lifecycle::TransitionOutcome;

        let TransitionOutcome::Applied { effects } = outcome else {
            return Ok(());
        };

        let customer = self.users.customer(job.customer_id).await?;

        for effect in effects {
            match effect {
                TransitionEffect::EmailJobReopened => {
                    if let Some(customer) = &customer {
                        let language = self.localizer.language_name(job.from_language_id);
                        let subject = format!(
                            "Vi har nu återöppnat er bokning av {language}tolk för bokning #{}",
                            job.id
                        );
                        self.email_customer(
                            job,
                            customer,
                            &subject,
                            &EmailTemplate::JobReopenedCustomer,
                        )
                        .await;
                    }
                }
                TransitionEffect::NotifyAllEligible => {
                    self.dispatcher.notify_suitable_translators(job, None).await?;
                }
                TransitionEffect::EmailAcceptConfirmation => {
                    if let Some(customer) = &customer {
                        let subject = format!(
                            "Bekräftelse - tolk har accepterat er bokning (bokning # {})",
                            job.id
                        );
                        self.email_customer(job, customer, &subject, &EmailTemplate::JobAccepted)
                            .await;
                    }
                }
                TransitionEffect::EmailAcceptConfirmationWithReminders => {
                    let subject = format!(
                        "Bekräftelse - tolk har accepterat er bokning (bokning # {})",
                        job.id
                    );
                    if let Some(customer) = &customer {
                        self.email_customer(job, customer, &subject, &EmailTemplate::JobAccepted)
                            .await;
                        self.dispatcher
                            .send_session_start_reminder(job, customer.into())
                            .await;
                    }
                    if let Some(assignment) = self.assignments.active_for_job(job.id).await?
                        && let Some(translator) =
                            self.users.translator(assignment.translator_id).await?
                    {
                        self.email_translator(
                            job,
                            &translator,
                            &subject,
                            &EmailTemplate::ChangedTranslatorNewTranslator,
                        )
                        .await;
                        self.dispatcher
                            .send_session_start_reminder(job, (&translator).into())
                            .await;
                    }
                }
                TransitionEffect::EmailCancellationFromPending => {
                    if let Some(customer) = &customer {
                        let subject = format!("Avbokning av bokningsnr: #{}", job.id);
                        self.email_customer(
                            job,
                            customer,
                            &subject,
                            &EmailTemplate::StatusChangedCustomer,
                        )
                        .await;
                    }
                }
                TransitionEffect::EmailSessionEnded { session_time } => {
                    if let Some(customer) = &customer {
                        let subject = format!(
                            "Information om avslutad tolkning för bokningsnummer #{}",
                            job.id
                        );
                        self.email_customer(
                            job,
                            customer,
                            &subject,
                            &EmailTemplate::SessionEnded {
                                session_time: session_time.clone(),
                                for_text: "faktura",
                            },
                        )
                        .await;
                    }
                    if let Some(assignment) = self.assignments.active_for_job(job.id).await?
                        && let Some(translator) =
                            self.users.translator(assignment.translator_id).await?
                    {
                        let subject = format!(
                            "Information om avslutad tolkning för bokningsnummer # {}",
                            job.id
                        );
                        self.email_translator(
                            job,
                            &translator,
                            &subject,
                            &EmailTemplate::SessionEnded {
                                session_time: session_time.clone(),
                                for_text: "lön",
                            },
                        )
                        .await;
                    }
                }
                TransitionEffect::NotifyWithdrawal => {
                    if let Some(customer) = &customer {
                        let subject = format!(
                            "Information om avslutad tolkning för bokningsnummer #{}",
                            job.id
                        );
                        self.email_customer(
                            job,
                            customer,
                            &subject,
                            &EmailTemplate::StatusChangedCustomer,
                        )
                        .await;
                    }
                    if let Some(assignment) = self.assignments.active_for_job(job.id).await?
                        && let Some(translator) =
                            self.users.translator(assignment.translator_id).await?
                    {
                        let subject = format!(
                            "Information om avslutad tolkning för bokningsnummer # {}",
                            job.id
                        );
                        self.email_translator(
                            job,
                            &translator,
                            &subject,
                            &EmailTemplate::JobCancelTranslator,
                        )
                        .await;
                    }
                }
            }
        }
        Ok(())
    }

    async fn send_changed_date(&self, job: &Job, old_due: time::OffsetDateTime) -> BookingResult<()> {
        let subject = format!(
            "Meddelande om ändring av tolkbokning för uppdrag # {}",
            job.id
        );
        let template = EmailTemplate::ChangedDate { old_time: old_due };

        if let Some(customer) = self.users.customer(job.customer_id).await? {
            self.email_customer(job, &customer, &subject, &template).await;
        }
        if let Some(assignment) = self.assignments.active_for_job(job.id).await?
            && let Some(translator) = self.users.translator(assignment.translator_id).await?
        {
            self.email_translator(job, &translator, &subject, &template).await;
        }
        Ok(())
    }

    async fn send_changed_translator(
        &self,
        job: &Job,
        old_translator: Option<Uuid>,
        new_translator: Option<Uuid>,
    ) -> BookingResult<()> {
        let subject = format!(
            "Meddelande om tilldelning av tolkuppdrag för uppdrag # {})",
            job.id
        );

        if let Some(customer) = self.users.customer(job.customer_id).await? {
            self.email_customer(
                job,
                &customer,
                &subject,
                &EmailTemplate::ChangedTranslatorCustomer,
            )
            .await;
        }
        if let Some(old_translator) = old_translator
            && let Some(translator) = self.users.translator(old_translator).await?
        {
            self.email_translator(
                job,
                &translator,
                &subject,
                &EmailTemplate::ChangedTranslatorOldTranslator,
            )
            .await;
        }
        if let Some(new_translator) = new_translator
            && let Some(translator) = self.users.translator(new_translator).await?
        {
            self.email_translator(
                job,
                &translator,
                &subject,
                &EmailTemplate::ChangedTranslatorNewTranslator,
            )
            .await;
        }
        Ok(())
    }

    async fn send_changed_lang(&self, job: &Job, old_language_id: Uuid) -> BookingResult<()> {
        let subject = format!(
            "Meddelande om ändring av tolkbokning för uppdrag # {}",
            job.id
        );
        let old_lang = self.localizer.language_name(old_language_id);

        if let Some(customer) = self.users.customer(job.customer_id).await? {
            self.email_customer(
                job,
                &customer,
                &subject,
                &EmailTemplate::ChangedLang { old_lang },
            )
            .await;
        }
        // The translator copy reuses the changed-date template; kept from
        // the upstream system.
        if let Some(assignment) = self.assignments.active_for_job(job.id).await?
            && let Some(translator) = self.users.translator(assignment.translator_id).await?
        {
            self.email_translator(
                job,
                &translator,
                &subject,
                &EmailTemplate::ChangedDate { old_time: job.due },
            )
            .await;
        }
        Ok(())
    }

    /// Booking-specific email override beats the account address.
    async fn email_customer(
        &self,
        job: &Job,
        customer: &CustomerProfile,
        subject: &str,
        template: &EmailTemplate,
    ) {
        let to = job.customer_email.as_deref().unwrap_or(&customer.email);
        self.log_send(self.mailer.send(to, &customer.name, subject, template, job).await);
    }

    async fn email_translator(
        &self,
        job: &Job,
        translator: &TranslatorProfile,
        subject: &str,
        template: &EmailTemplate,
    ) {
        self.log_send(
            self.mailer
                .send(&translator.email, &translator.name, subject, template, job)
                .await,
        );
    }

    fn log_send(&self, result: Result<(), crate::services::transport::TransportError>) {
        if let Err(e) = result {
            warn!(error = %e, "email delivery failed");
        }
    }
}
