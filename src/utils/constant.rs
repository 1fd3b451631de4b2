//! # Application Constants
//!
//! Tuning knobs for the booking lifecycle: expiry bands, the self-service
//! cancellation window, and the night/business hour boundaries the delay
//! policy works with.

use time::Time;
use time::macros::time;

/// Due-time offset for immediate bookings.
///
/// An immediate job is due this many minutes after creation.
pub const IMMEDIATE_DUE_OFFSET_MINUTES: i64 = 5;

/// Self-service cancellation window
///
/// A booking due within this many hours cannot be cancelled by the
/// translator through self-service; the customer may always cancel, but the
/// resulting withdraw status depends on this same cutoff.
pub const SELF_SERVICE_CANCEL_CUTOFF_HOURS: i64 = 24;

/// Expiry band: bookings due in under this many hours expire 90 minutes
/// after creation.
pub const EXPIRY_SHORT_NOTICE_HOURS: i64 = 24;

/// Grace period for short-notice bookings.
pub const EXPIRY_SHORT_GRACE_MINUTES: i64 = 90;

/// Expiry band: bookings due between 24 and this many hours out expire 16
/// hours after creation.
pub const EXPIRY_MID_NOTICE_HOURS: i64 = 72;

/// Grace period for mid-notice bookings.
pub const EXPIRY_MID_GRACE_HOURS: i64 = 16;

/// Expiry band: bookings due beyond this many hours out expire 48 hours
/// before the due time; between 72 and 90 hours they simply expire at the
/// due time itself.
pub const EXPIRY_LONG_NOTICE_HOURS: i64 = 90;

/// Expiry lead for long-notice bookings.
pub const EXPIRY_LEAD_HOURS: i64 = 48;

/// Night-time window for the push delay policy (inclusive start).
pub const NIGHT_STARTS: Time = time!(22:00);

/// Night-time window end (exclusive).
pub const NIGHT_ENDS: Time = time!(06:00);

/// Delayed pushes are released at the next occurrence of this time of day.
pub const BUSINESS_DAY_STARTS: Time = time!(09:00);

/// Fixed user-facing refusal for self-service cancellations inside the
/// 24-hour window.
pub const CANCEL_WITHIN_24H_MESSAGE: &str = "Du kan inte avboka en bokning som sker inom 24 timmar \
     genom självservice. Vänligen ring och gör din avbokning över telefon. Tack!";
