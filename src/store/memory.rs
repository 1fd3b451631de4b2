//! # In-Memory Reference Store
//!
//! DashMap-backed implementation of all four store traits. Used by the
//! integration tests and as the reference semantics for real backends.
//! DashMap's per-entry locking is what makes `compare_and_set_status`
//! genuinely atomic here.

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{
    BookingType, CustomerProfile, Job, JobFilter, JobStatus, TranslatorAssignment,
    TranslatorProfile,
};

use super::{
    AssignmentStore, BlacklistStore, JobStore, StoreError, StoreResult, UserDirectory,
};

/// Thread-safe in-process store for jobs, assignments, profiles and
/// blacklists.
#[derive(Default)]
pub struct MemoryStore {
    jobs: DashMap<Uuid, Job>,
    assignments: DashMap<Uuid, TranslatorAssignment>,
    customers: DashMap<Uuid, CustomerProfile>,
    translators: DashMap<Uuid, TranslatorProfile>,
    blacklist: DashMap<Uuid, HashSet<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a customer profile (test/bootstrap helper).
    pub fn add_customer(&self, customer: CustomerProfile) {
        self.customers.insert(customer.user_id, customer);
    }

    /// Seed a translator profile (test/bootstrap helper).
    pub fn add_translator(&self, translator: TranslatorProfile) {
        self.translators.insert(translator.user_id, translator);
    }

    /// Blacklist a translator for a customer (test/bootstrap helper).
    pub fn add_blacklist(&self, customer_id: Uuid, translator_id: Uuid) {
        self.blacklist
            .entry(customer_id)
            .or_default()
            .insert(translator_id);
    }
}

fn matches_filter(job: &Job, filter: &JobFilter) -> bool {
    if !filter.ids.is_empty() && !filter.ids.contains(&job.id) {
        return false;
    }
    if !filter.statuses.is_empty() && !filter.statuses.contains(&job.status) {
        return false;
    }
    if !filter.languages.is_empty() && !filter.languages.contains(&job.from_language_id) {
        return false;
    }
    if !filter.job_types.is_empty() && !filter.job_types.contains(&job.job_type) {
        return false;
    }
    if !filter.customer_ids.is_empty() && !filter.customer_ids.contains(&job.customer_id) {
        return false;
    }
    match filter.booking_type {
        Some(BookingType::Physical) if !job.customer_physical_type => return false,
        Some(BookingType::Phone) if !job.customer_phone_type => return false,
        _ => {}
    }
    if let Some(from) = filter.due_from
        && job.due < from
    {
        return false;
    }
    if let Some(to) = filter.due_to
        && job.due > to
    {
        return false;
    }
    if let Some(from) = filter.created_from
        && job.created_at < from
    {
        return false;
    }
    if let Some(to) = filter.created_to
        && job.created_at > to
    {
        return false;
    }
    true
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn find(&self, id: Uuid) -> StoreResult<Option<Job>> {
        Ok(self.jobs.get(&id).map(|j| j.clone()))
    }

    async fn insert(&self, job: Job) -> StoreResult<()> {
        self.jobs.insert(job.id, job);
        Ok(())
    }

    async fn save(&self, job: &Job) -> StoreResult<()> {
        self.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn compare_and_set_status(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> StoreResult<bool> {
        // The entry guard holds the shard lock, so the check and the write
        // are one atomic step.
        match self.jobs.get_mut(&id) {
            Some(mut job) if job.status == from => {
                job.status = to;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(StoreError::Missing("job")),
        }
    }

    async fn pending_jobs(&self) -> StoreResult<Vec<Job>> {
        Ok(self
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Pending)
            .map(|j| j.clone())
            .collect())
    }

    async fn list(&self, filter: &JobFilter) -> StoreResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self
            .jobs
            .iter()
            .filter(|j| matches_filter(j.value(), filter))
            .map(|j| j.clone())
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn insert(&self, assignment: TranslatorAssignment) -> StoreResult<()> {
        self.assignments.insert(assignment.id, assignment);
        Ok(())
    }

    async fn save(&self, assignment: &TranslatorAssignment) -> StoreResult<()> {
        self.assignments.insert(assignment.id, assignment.clone());
        Ok(())
    }

    async fn active_for_job(&self, job_id: Uuid) -> StoreResult<Option<TranslatorAssignment>> {
        Ok(self
            .assignments
            .iter()
            .find(|a| a.job_id == job_id && a.is_active())
            .map(|a| a.clone()))
    }

    async fn latest_completed_for_job(
        &self,
        job_id: Uuid,
    ) -> StoreResult<Option<TranslatorAssignment>> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.job_id == job_id && a.completed_at.is_some())
            .max_by_key(|a| a.completed_at)
            .map(|a| a.clone()))
    }

    async fn for_translator(
        &self,
        translator_id: Uuid,
    ) -> StoreResult<Vec<TranslatorAssignment>> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.translator_id == translator_id)
            .map(|a| a.clone())
            .collect())
    }

    async fn cancel_open_for_job(&self, job_id: Uuid, at: OffsetDateTime) -> StoreResult<()> {
        for mut assignment in self.assignments.iter_mut() {
            if assignment.job_id == job_id && assignment.cancel_at.is_none() {
                assignment.cancel_at = Some(at);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn customer(&self, user_id: Uuid) -> StoreResult<Option<CustomerProfile>> {
        Ok(self.customers.get(&user_id).map(|c| c.clone()))
    }

    async fn translator(&self, user_id: Uuid) -> StoreResult<Option<TranslatorProfile>> {
        Ok(self.translators.get(&user_id).map(|t| t.clone()))
    }

    async fn active_translators(&self) -> StoreResult<Vec<TranslatorProfile>> {
        Ok(self.translators.iter().map(|t| t.clone()).collect())
    }
}

#[async_trait]
impl BlacklistStore for MemoryStore {
    async fn blacklisted_translators(&self, customer_id: Uuid) -> StoreResult<HashSet<Uuid>> {
        Ok(self
            .blacklist
            .get(&customer_id)
            .map(|set| set.clone())
            .unwrap_or_default())
    }
}
