mod assignment;
mod job;
mod notification;
mod translator;

pub use assignment::TranslatorAssignment;
pub use job::{
    BookingRequest, BookingType, CertificationRequirement, ConsumerType, Gender, Job, JobFilter,
    JobStatus, JobType, JobUpdate,
};
pub use notification::{NotificationEnvelope, NotificationType};
pub use translator::{CertificationLevel, CustomerProfile, TranslatorProfile, TranslatorType};
