//! # Profile Types
//!
//! Read-only profiles the matcher and dispatcher consult. Profile
//! management lives in an external collaborator; the core never mutates
//! these.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::job::{ConsumerType, Gender, JobType};

/// Translator category, matched one-to-one against a job's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslatorType {
    Professional,
    Rwstranslator,
    Volunteer,
}

impl TranslatorType {
    /// The job type this translator category serves.
    #[inline]
    pub fn job_type(self) -> JobType {
        match self {
            TranslatorType::Professional => JobType::Paid,
            TranslatorType::Rwstranslator => JobType::Rws,
            TranslatorType::Volunteer => JobType::Unpaid,
        }
    }
}

/// Certification level held by a translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationLevel {
    Certified,
    CertifiedInLaw,
    CertifiedInHealthCare,
    Layman,
    ReadTranslationCourses,
}

/// Attributes of a translator consulted by the matcher and dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorProfile {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub translator_type: TranslatorType,
    pub certifications: Vec<CertificationLevel>,
    pub gender: Gender,
    /// Language ids this translator interprets.
    pub languages: HashSet<Uuid>,
    pub town: Option<String>,
    /// Opted out of all push notifications.
    pub not_get_notification: bool,
    /// Opted out of emergency (immediate-job) notices.
    pub not_get_emergency: bool,
    /// Opted out of night-time delivery; pushes are delayed to business hours.
    pub not_get_nighttime: bool,
}

/// Customer-side profile. Customers receive pushes too, so they carry the
/// same general and night-time opt-out flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub town: Option<String>,
    pub consumer_type: ConsumerType,
    pub not_get_notification: bool,
    pub not_get_nighttime: bool,
}
