//! # Centralized Error Handling
//!
//! This module provides the unified error type for all booking operations.
//! Mutation operations surface failures through [`BookingError`]; transport
//! failures (push/SMS/email) are deliberately *not* part of this taxonomy -
//! they are logged at the send site and never invalidate a state mutation.

use thiserror::Error;

use crate::store::StoreError;

/// Central error type for booking operations.
///
/// Every variant is safe to retry: no partial state is left behind when an
/// operation returns an error.
#[derive(Error, Debug)]
pub enum BookingError {
    /// A required request field is missing or empty. Carries the field
    /// identifier so callers can point the user at the offending input.
    #[error("validation failed on field `{field}`")]
    Validation { field: &'static str },

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    /// A transition guard failed or another party won a race (e.g. a
    /// double-booking conflict or a job already accepted elsewhere).
    #[error("state conflict: {0}")]
    StateConflict(String),

    #[error("not found: {0}")]
    NotFound(&'static str),

    /// The request is well-formed but refused by a fixed business rule,
    /// e.g. self-service cancellation within 24 hours of the due time.
    #[error("policy refusal: {0}")]
    PolicyRefusal(&'static str),

    #[error("store error")]
    Store(#[from] StoreError),
}

/// Convenience Result type alias that uses BookingError as the error type.
pub type BookingResult<T> = Result<T, BookingError>;
