//! # Tolka - Interpretation Booking Coordination Core
//!
//! Coordinates interpretation-service bookings between customers and
//! translators: creating jobs, matching them to eligible translators,
//! moving jobs through their lifecycle, and dispatching push/SMS/email
//! notifications at each transition.
//!
//! ## Modules
//!
//! - [`models`] - Domain values: jobs, assignments, profiles, notification envelopes
//! - [`services`] - Business logic: matching, lifecycle engine, assignment coordinator, dispatcher
//! - [`store`] - Persistence capability traits and the in-memory reference store
//! - [`utils`] - Constants, the expiry policy, and time formatting helpers
//!
//! HTTP routing, real persistence, authentication and the concrete
//! push/SMS/email transports are collaborators behind traits; the core
//! never opens a socket itself.

pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;
