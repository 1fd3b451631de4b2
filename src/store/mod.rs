//! # Persistence Capability Traits
//!
//! The core owns no database. Everything it reads or writes goes through
//! these traits; real deployments back them with whatever storage they
//! like, and tests (plus the reference [`MemoryStore`]) keep everything in
//! process.
//!
//! The one non-obvious member is [`JobStore::compare_and_set_status`]: the
//! accept flow requires the `pending -> assigned` flip to be atomic on the
//! job row, so the check-and-transition is a single store operation rather
//! than a read followed by a write.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{
    CustomerProfile, Job, JobFilter, JobStatus, TranslatorAssignment, TranslatorProfile,
};

mod memory;

pub use memory::MemoryStore;

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity not found: {0}")]
    Missing(&'static str),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Convenience Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Owner of job rows.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find(&self, id: Uuid) -> StoreResult<Option<Job>>;

    async fn insert(&self, job: Job) -> StoreResult<()>;

    /// Persist the given job over its stored row.
    async fn save(&self, job: &Job) -> StoreResult<()>;

    /// Atomically flip the job's status from `from` to `to`.
    ///
    /// Returns `false` (without mutating) when the stored status is no
    /// longer `from` - the loser of an accept race sees `false` here.
    async fn compare_and_set_status(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> StoreResult<bool>;

    /// All jobs currently in `pending` status, for candidate queries.
    async fn pending_jobs(&self) -> StoreResult<Vec<Job>>;

    /// Filtered listing for the admin surface.
    async fn list(&self, filter: &JobFilter) -> StoreResult<Vec<Job>>;
}

/// Owner of translator-assignment rows.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn insert(&self, assignment: TranslatorAssignment) -> StoreResult<()>;

    async fn save(&self, assignment: &TranslatorAssignment) -> StoreResult<()>;

    /// The job's active assignment (neither cancelled nor completed), if any.
    async fn active_for_job(&self, job_id: Uuid) -> StoreResult<Option<TranslatorAssignment>>;

    /// Most recently completed assignment on the job, used as the fallback
    /// "current translator" when no active assignment exists.
    async fn latest_completed_for_job(
        &self,
        job_id: Uuid,
    ) -> StoreResult<Option<TranslatorAssignment>>;

    /// Every assignment ever held by the translator.
    async fn for_translator(&self, translator_id: Uuid)
    -> StoreResult<Vec<TranslatorAssignment>>;

    /// Set `cancel_at` on every not-yet-cancelled assignment of the job.
    async fn cancel_open_for_job(&self, job_id: Uuid, at: OffsetDateTime) -> StoreResult<()>;
}

/// Read-only access to customer and translator profiles.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn customer(&self, user_id: Uuid) -> StoreResult<Option<CustomerProfile>>;

    async fn translator(&self, user_id: Uuid) -> StoreResult<Option<TranslatorProfile>>;

    /// All translators with an active account, the fan-out population.
    async fn active_translators(&self) -> StoreResult<Vec<TranslatorProfile>>;
}

/// Read-only access to customer blacklists.
#[async_trait]
pub trait BlacklistStore: Send + Sync {
    /// Ids of every translator this customer has blacklisted.
    async fn blacklisted_translators(&self, customer_id: Uuid) -> StoreResult<HashSet<Uuid>>;
}
