//! # Job and Status Types
//!
//! The [`Job`] is the unit of work: one interpretation-booking request.
//! Its status is a closed enum with an explicit transition table owned by
//! the lifecycle engine; no operation ever produces a status outside this
//! set.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Represents the possible status values for a job.
///
/// The literal wire strings (`withdrawbefore24`, `not_carried_out_customer`,
/// ...) are preserved from the upstream system, including the inverted-looking
/// withdraw naming: `Withdrawbefore24` is the status for cancellations made
/// with *at least* 24 hours remaining.
///
/// # Status Flow
///
/// - `Pending` - created or reopened, waiting for a translator to accept
/// - `Assigned` - a translator holds the active assignment
/// - `Started` - the session is in progress
/// - `Completed` - the session ended and was settled
/// - `Withdrawbefore24` / `Withdrawafter24` - withdrawn by the customer
/// - `Timedout` - expired without acceptance
/// - `NotCarriedOutCustomer` - customer never showed up / never called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Assigned,
    Started,
    Completed,
    Withdrawbefore24,
    Withdrawafter24,
    Timedout,
    NotCarriedOutCustomer,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status_str = match self {
            JobStatus::Pending => "pending",
            JobStatus::Assigned => "assigned",
            JobStatus::Started => "started",
            JobStatus::Completed => "completed",
            JobStatus::Withdrawbefore24 => "withdrawbefore24",
            JobStatus::Withdrawafter24 => "withdrawafter24",
            JobStatus::Timedout => "timedout",
            JobStatus::NotCarriedOutCustomer => "not_carried_out_customer",
        };
        write!(f, "{status_str}")
    }
}

impl JobStatus {
    /// Returns true for states that end a job's life for good.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed
                | JobStatus::Withdrawbefore24
                | JobStatus::Withdrawafter24
                | JobStatus::NotCarriedOutCustomer
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// How a job is settled, derived from the requesting customer's consumer
/// category. Matched one-to-one against [`super::TranslatorType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Paid,
    Rws,
    Unpaid,
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobType::Paid => "paid",
            JobType::Rws => "rws",
            JobType::Unpaid => "unpaid",
        };
        write!(f, "{s}")
    }
}

/// Consumer category of a customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumerType {
    Paid,
    Rwsconsumer,
    Ngo,
}

impl ConsumerType {
    /// Job type assigned to bookings created by this consumer category.
    #[inline]
    pub fn job_type(self) -> JobType {
        match self {
            ConsumerType::Paid => JobType::Paid,
            ConsumerType::Rwsconsumer => JobType::Rws,
            ConsumerType::Ngo => JobType::Unpaid,
        }
    }
}

/// Certification requirement a customer may put on a booking.
///
/// `NLaw`/`NHealth` are the combined "normal or specialised" variants the
/// booking form produces when both boxes are ticked; the matcher expands
/// them to the same specialist levels as `Law`/`Health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationRequirement {
    Normal,
    Certified,
    Law,
    Health,
    Both,
    NLaw,
    NHealth,
}

/// One interpretation-booking request. Owned exclusively by the job store;
/// the core mutates a job only through lifecycle-engine operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: JobStatus,
    pub from_language_id: Uuid,
    /// Near-term fulfillment (due ~ now + 5 min) rather than a scheduled slot.
    pub immediate: bool,
    pub duration_minutes: i64,
    pub due: OffsetDateTime,
    pub gender: Option<Gender>,
    pub certified: Option<CertificationRequirement>,
    pub job_type: JobType,
    /// Customer can take the session over the phone.
    pub customer_phone_type: bool,
    /// Customer requires a physically present translator.
    pub customer_physical_type: bool,
    pub town: Option<String>,
    /// Booking-specific email override; falls back to the customer's account email.
    pub customer_email: Option<String>,
    pub reference: String,
    pub admin_comments: String,
    pub created_at: OffsetDateTime,
    pub will_expire_at: OffsetDateTime,
    pub withdraw_at: Option<OffsetDateTime>,
    pub end_at: Option<OffsetDateTime>,
    /// `HH:MM:SS` interval recorded when the session completes.
    pub session_time: Option<String>,
    pub by_admin: bool,
    /// Reminder-email flags, cleared when a timedout job is reset to pending.
    pub cust_16h_email_sent: bool,
    pub cust_48h_email_sent: bool,
}

impl Job {
    /// The booked time window: due time through due time plus duration.
    pub fn window(&self) -> (OffsetDateTime, OffsetDateTime) {
        (self.due, self.due + Duration::minutes(self.duration_minutes))
    }

    /// True when the two jobs' booked windows overlap - the double-booking test.
    pub fn overlaps(&self, other: &Job) -> bool {
        let (start_a, end_a) = self.window();
        let (start_b, end_b) = other.window();
        start_a < end_b && start_b < end_a
    }
}

/// Input for creating a booking. Optional fields are validated by the
/// coordinator, which reports the offending field identifier on failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    pub from_language_id: Option<Uuid>,
    pub duration_minutes: Option<i64>,
    pub immediate: bool,
    /// Required unless `immediate`; immediate jobs get due = now + 5 min.
    pub due: Option<OffsetDateTime>,
    /// Meeting mode; at least one of phone/physical must be selected for
    /// scheduled bookings.
    pub customer_phone_type: Option<bool>,
    pub customer_physical_type: Option<bool>,
    pub gender: Option<Gender>,
    pub certified: Option<CertificationRequirement>,
    pub town: Option<String>,
    pub by_admin: bool,
}

/// Input for the admin update flow: a requested status plus the always-applied
/// field overwrites, and an optional translator reassignment target.
#[derive(Debug, Clone)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub due: OffsetDateTime,
    pub from_language_id: Uuid,
    pub admin_comments: String,
    pub reference: String,
    /// Required (non-empty) when moving a started job to completed.
    pub session_time: Option<String>,
    /// Reassignment target; `None` leaves the current translator in place.
    pub translator: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Physical,
    Phone,
}

/// Admin listing filter consumed by `JobStore::list`. Empty vectors and
/// `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub ids: Vec<Uuid>,
    pub statuses: Vec<JobStatus>,
    pub languages: Vec<Uuid>,
    pub job_types: Vec<JobType>,
    pub customer_ids: Vec<Uuid>,
    pub booking_type: Option<BookingType>,
    pub due_from: Option<OffsetDateTime>,
    pub due_to: Option<OffsetDateTime>,
    pub created_from: Option<OffsetDateTime>,
    pub created_to: Option<OffsetDateTime>,
}
