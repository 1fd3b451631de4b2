//! # Translator Assignments
//!
//! Join entity linking a job to a translator over a time window.
//! Assignments are closed (cancel-at or completed-at set), never deleted,
//! so the history of who held a job is preserved.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// One translator's tenure on one job.
///
/// Invariant: at most one assignment per job has both `cancel_at` and
/// `completed_at` unset - that one is "the active assignment".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorAssignment {
    pub id: Uuid,
    pub job_id: Uuid,
    pub translator_id: Uuid,
    pub created_at: OffsetDateTime,
    pub cancel_at: Option<OffsetDateTime>,
    pub completed_at: Option<OffsetDateTime>,
    pub completed_by: Option<Uuid>,
}

impl TranslatorAssignment {
    /// Opens a fresh, active assignment.
    pub fn new(job_id: Uuid, translator_id: Uuid, created_at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            translator_id,
            created_at,
            cancel_at: None,
            completed_at: None,
            completed_by: None,
        }
    }

    /// True while neither cancelled nor completed.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.cancel_at.is_none() && self.completed_at.is_none()
    }
}
