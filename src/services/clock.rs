//! # Clock Capability
//!
//! Time-of-day policy lives outside the core: the dispatcher only asks
//! "is it night?" and "when does business resume?". The trait defaults
//! implement both questions over the configured hour boundaries so a
//! deployment only has to supply `now()`.

use time::{Duration, OffsetDateTime};

use crate::utils::constant::{BUSINESS_DAY_STARTS, NIGHT_ENDS, NIGHT_STARTS};

/// Injected time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;

    /// True inside the configured night window (22:00-06:00 by default).
    fn is_night_time(&self) -> bool {
        let t = self.now().time();
        t >= NIGHT_STARTS || t < NIGHT_ENDS
    }

    /// Next release point for delayed pushes: the upcoming business-day
    /// start (09:00 by default), today if it has not passed yet.
    fn next_business_time(&self) -> OffsetDateTime {
        let now = self.now();
        let today_start = now.replace_time(BUSINESS_DAY_STARTS);
        if now < today_start {
            today_start
        } else {
            today_start + Duration::days(1)
        }
    }
}

/// Wall-clock implementation used outside of tests.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
