//! # Booking Expiry Policy
//!
//! A pending booking that nobody accepts times out at a point derived from
//! how far in advance it was made. The bands are exact and boundary values
//! matter; see the tests under `tests/expiry.rs`.

use time::{Duration, OffsetDateTime};

use super::constant::{
    EXPIRY_LEAD_HOURS, EXPIRY_LONG_NOTICE_HOURS, EXPIRY_MID_GRACE_HOURS, EXPIRY_MID_NOTICE_HOURS,
    EXPIRY_SHORT_GRACE_MINUTES, EXPIRY_SHORT_NOTICE_HOURS,
};

/// Computes when a pending booking will time out.
///
/// Bands, by notice (due minus created):
/// - under 24 h: created + 90 min
/// - 24 h through 72 h inclusive: created + 16 h
/// - over 72 h, under 90 h: the due time itself
/// - 90 h and beyond: due - 48 h
pub fn will_expire_at(due: OffsetDateTime, created_at: OffsetDateTime) -> OffsetDateTime {
    let notice = due - created_at;

    if notice < Duration::hours(EXPIRY_SHORT_NOTICE_HOURS) {
        created_at + Duration::minutes(EXPIRY_SHORT_GRACE_MINUTES)
    } else if notice <= Duration::hours(EXPIRY_MID_NOTICE_HOURS) {
        created_at + Duration::hours(EXPIRY_MID_GRACE_HOURS)
    } else if notice < Duration::hours(EXPIRY_LONG_NOTICE_HOURS) {
        due
    } else {
        due - Duration::hours(EXPIRY_LEAD_HOURS)
    }
}
