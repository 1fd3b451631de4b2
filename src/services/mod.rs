//! # Business Logic Services
//!
//! The coordination core proper. Leaf-first:
//!
//! - **Clock** (`clock`) - time source plus the night/business-hours predicates
//! - **Localization** (`localization`) - typed messages and their rendering
//! - **Transport** (`transport`) - email/push/SMS capability traits with log-only impls
//! - **Matching** (`matching`) - translator/job eligibility
//! - **Lifecycle** (`lifecycle`) - the job state machine and its transition effects
//! - **Dispatcher** (`dispatcher`) - recipient selection, delay policy, fan-out
//! - **Coordinator** (`coordinator`) - accept/cancel/update/reopen/end flows

pub mod clock;
pub mod coordinator;
pub mod dispatcher;
pub mod lifecycle;
pub mod localization;
pub mod matching;
pub mod transport;
