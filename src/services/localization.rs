//! # Localization Capability
//!
//! The core treats localization as opaque: it builds a typed [`Message`]
//! and asks the collaborator to render it. [`SvCatalog`] carries the
//! Swedish texts the upstream service ships and doubles as the default
//! implementation for tests and demos.

use std::collections::HashMap;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::utils::time_format::format_datetime;

/// Typed message sent through push or SMS. Each variant carries exactly
/// the parameters its text interpolates.
#[derive(Debug, Clone)]
pub enum Message {
    NewBooking {
        language: String,
        duration_minutes: i64,
    },
    NewEmergencyBooking {
        language: String,
        duration_minutes: i64,
    },
    /// Push to the customer once a translator accepts.
    BookingAccepted {
        language: String,
        duration_minutes: i64,
        due: OffsetDateTime,
    },
    /// Confirmation returned to the accepting translator.
    AcceptConfirmation {
        language: String,
        duration_minutes: i64,
        due: OffsetDateTime,
    },
    /// Push to the translator when the customer withdraws.
    CustomerCancelled {
        language: String,
        duration_minutes: i64,
        due: OffsetDateTime,
    },
    /// Push to the customer when the translator backs out.
    TranslatorCancelled {
        language: String,
        duration_minutes: i64,
        due: OffsetDateTime,
    },
    SessionStartReminder {
        language: String,
        town: String,
        physical: bool,
        due_date: String,
        due_time: String,
        duration_minutes: i64,
    },
    SmsPhoneJob {
        date: String,
        time: String,
        duration: String,
        job_id: Uuid,
    },
    SmsPhysicalJob {
        date: String,
        time: String,
        duration: String,
        town: String,
        job_id: Uuid,
    },
}

/// Opaque localization collaborator.
pub trait Localizer: Send + Sync {
    fn render(&self, message: &Message) -> String;

    /// Human-readable name of a job's language id.
    fn language_name(&self, language_id: Uuid) -> String;
}

/// Swedish catalog with a language-id lookup table.
#[derive(Default)]
pub struct SvCatalog {
    languages: HashMap<Uuid, String>,
}

impl SvCatalog {
    pub fn new(languages: HashMap<Uuid, String>) -> Self {
        Self { languages }
    }
}

impl Localizer for SvCatalog {
    fn render(&self, message: &Message) -> String {
        match message {
            Message::NewBooking {
                language,
                duration_minutes,
            } => format!("Ny bokning för {language}tolk {duration_minutes}min"),
            Message::NewEmergencyBooking {
                language,
                duration_minutes,
            } => format!("Ny akutbokning för {language}tolk {duration_minutes}min"),
            Message::BookingAccepted {
                language,
                duration_minutes,
                due,
            } => format!(
                "Din bokning för {language}tolk, {duration_minutes}min, {} har accepterats av \
                 en tolk. Vänligen öppna appen för att se detaljer om tolken.",
                format_datetime(*due)
            ),
            Message::AcceptConfirmation {
                language,
                duration_minutes,
                due,
            } => format!(
                "Du har nu accepterat och fått bokningen för {language}tolk {duration_minutes}min {}",
                format_datetime(*due)
            ),
            Message::CustomerCancelled {
                language,
                duration_minutes,
                due,
            } => format!(
                "Kunden har avbokat bokningen för {language}tolk, {duration_minutes}min, {}. \
                 Var god och kolla dina tidigare bokningar för detaljer.",
                format_datetime(*due)
            ),
            Message::TranslatorCancelled {
                language,
                duration_minutes,
                due,
            } => format!(
                "Er {language}tolk, {duration_minutes}min {}, har avbokat tolkningen. Vi letar \
                 nu efter en ny tolk som kan ersätta denne. Tack.",
                format_datetime(*due)
            ),
            Message::SessionStartReminder {
                language,
                town,
                physical,
                due_date,
                due_time,
                duration_minutes,
            } => {
                let place = if *physical {
                    format!("på plats i {town}")
                } else {
                    "telefon".to_string()
                };
                format!(
                    "Detta är en påminnelse om att du har en {language}tolkning ({place}) kl \
                     {due_time} på {due_date} som vara i {duration_minutes} min. Lycka till och \
                     kom ihåg att ge feedback efter utförd tolkning!"
                )
            }
            Message::SmsPhoneJob {
                date,
                time,
                duration,
                job_id,
            } => format!(
                "Du har en ny telefontolkning {date} kl {time}, {duration}. \
                 Se bokningsnr #{job_id} i appen."
            ),
            Message::SmsPhysicalJob {
                date,
                time,
                duration,
                town,
                job_id,
            } => format!(
                "Du har en ny platstolkning i {town} {date} kl {time}, {duration}. \
                 Se bokningsnr #{job_id} i appen."
            ),
        }
    }

    fn language_name(&self, language_id: Uuid) -> String {
        self.languages
            .get(&language_id)
            .cloned()
            .unwrap_or_else(|| language_id.to_string())
    }
}
