//! # Utility Functions and Constants
//!
//! Shared plumbing: tuning constants, the booking expiry policy, and the
//! handful of time-formatting helpers the notification texts use.

pub mod constant;
pub mod expiry;
pub mod time_format;
