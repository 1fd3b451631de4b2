//! # Eligibility Matching
//!
//! Pure read-side queries pairing pending jobs with translators who may
//! take them. The matcher never mutates anything; ordering of the returned
//! sets is caller-defined apart from candidate jobs, which come back sorted
//! by due time ascending.

use std::collections::HashSet;

use tracing::trace;
use uuid::Uuid;

use crate::error::BookingResult;
use crate::models::{
    CertificationLevel, CertificationRequirement, Gender, Job, JobStatus, JobType,
    TranslatorProfile,
};
use crate::store::{AssignmentStore, BlacklistStore, JobStore, UserDirectory};

/// Typed projection of a job's matching constraints; replaces the loose
/// key/value criteria the upstream system passed around.
#[derive(Debug, Clone)]
pub struct MatchCriteria {
    pub job_type: JobType,
    pub language_id: Uuid,
    pub gender: Option<Gender>,
    pub accepted_levels: &'static [CertificationLevel],
}

impl MatchCriteria {
    pub fn for_job(job: &Job) -> Self {
        Self {
            job_type: job.job_type,
            language_id: job.from_language_id,
            gender: job.gender,
            accepted_levels: MatcherService::accepted_levels(job.certified),
        }
    }

    /// Type, certification, gender and language checks - the profile-only
    /// half of eligibility.
    pub fn admits(&self, translator: &TranslatorProfile) -> bool {
        if translator.translator_type.job_type() != self.job_type {
            return false;
        }
        if !translator
            .certifications
            .iter()
            .any(|level| self.accepted_levels.contains(level))
        {
            return false;
        }
        if let Some(required) = self.gender
            && translator.gender != required
        {
            return false;
        }
        translator.languages.contains(&self.language_id)
    }
}

pub struct MatcherService;

impl MatcherService {
    /// Certification levels that satisfy a job's requirement.
    pub fn accepted_levels(
        requirement: Option<CertificationRequirement>,
    ) -> &'static [CertificationLevel] {
        use CertificationLevel::*;

        match requirement {
            Some(CertificationRequirement::Certified) | Some(CertificationRequirement::Both) => {
                &[Certified, CertifiedInLaw, CertifiedInHealthCare]
            }
            Some(CertificationRequirement::Law) | Some(CertificationRequirement::NLaw) => {
                &[CertifiedInLaw]
            }
            Some(CertificationRequirement::Health) | Some(CertificationRequirement::NHealth) => {
                &[CertifiedInHealthCare]
            }
            Some(CertificationRequirement::Normal) => &[Layman, ReadTranslationCourses],
            None => &[
                Certified,
                CertifiedInLaw,
                CertifiedInHealthCare,
                Layman,
                ReadTranslationCourses,
            ],
        }
    }

    /// Full eligibility test for one (job, translator) pair.
    ///
    /// Symmetric: both candidate queries funnel through this. The job must
    /// be pending, the profile must pass [`MatchCriteria::admits`], the
    /// translator must not be blacklisted by the job's customer, and a
    /// physical-only job (phone-incapable customer requiring presence) is
    /// restricted to translators in the customer's registered town.
    pub fn is_eligible(
        job: &Job,
        translator: &TranslatorProfile,
        blacklisted: &HashSet<Uuid>,
        customer_town: Option<&str>,
    ) -> bool {
        if job.status != JobStatus::Pending {
            return false;
        }
        if !MatchCriteria::for_job(job).admits(translator) {
            return false;
        }
        if blacklisted.contains(&translator.user_id) {
            trace!(
                translator = %translator.user_id,
                job = %job.id,
                "translator blacklisted by customer"
            );
            return false;
        }
        if Self::physical_only(job) && !Self::towns_match(translator.town.as_deref(), customer_town)
        {
            trace!(
                translator = %translator.user_id,
                job = %job.id,
                "physical-only job in another town"
            );
            return false;
        }
        true
    }

    /// The job needs a physically present translator and the customer
    /// cannot fall back to the phone.
    fn physical_only(job: &Job) -> bool {
        !job.customer_phone_type && job.customer_physical_type
    }

    /// Missing towns never match: a physical-only job is only offered to
    /// translators with a recorded town equal to the customer's.
    fn towns_match(translator_town: Option<&str>, customer_town: Option<&str>) -> bool {
        matches!((translator_town, customer_town), (Some(a), Some(b)) if a == b)
    }

    /// All translators eligible for the job right now.
    pub async fn find_candidate_translators(
        job: &Job,
        users: &dyn UserDirectory,
        blacklist: &dyn BlacklistStore,
    ) -> BookingResult<Vec<TranslatorProfile>> {
        let customer_town = users
            .customer(job.customer_id)
            .await?
            .and_then(|c| c.town);
        let blacklisted = blacklist.blacklisted_translators(job.customer_id).await?;

        Ok(users
            .active_translators()
            .await?
            .into_iter()
            .filter(|t| Self::is_eligible(job, t, &blacklisted, customer_town.as_deref()))
            .collect())
    }

    /// All pending jobs the translator is eligible for, due-time ascending.
    pub async fn find_candidate_jobs(
        translator: &TranslatorProfile,
        jobs: &dyn JobStore,
        users: &dyn UserDirectory,
        blacklist: &dyn BlacklistStore,
    ) -> BookingResult<Vec<Job>> {
        let mut candidates = Vec::new();

        for job in jobs.pending_jobs().await? {
            let blacklisted = blacklist.blacklisted_translators(job.customer_id).await?;
            let customer_town = users
                .customer(job.customer_id)
                .await?
                .and_then(|c| c.town);

            if Self::is_eligible(&job, translator, &blacklisted, customer_town.as_deref()) {
                candidates.push(job);
            }
        }

        candidates.sort_by_key(|job| job.due);
        Ok(candidates)
    }

    /// True when the translator already holds an active assignment on a job
    /// whose booked window overlaps this one - the double-booking check.
    pub async fn has_schedule_conflict(
        job: &Job,
        translator_id: Uuid,
        assignments: &dyn AssignmentStore,
        jobs: &dyn JobStore,
    ) -> BookingResult<bool> {
        for assignment in assignments.for_translator(translator_id).await? {
            if !assignment.is_active() {
                continue;
            }
            if let Some(other) = jobs.find(assignment.job_id).await?
                && other.id != job.id
                && other.overlaps(job)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
