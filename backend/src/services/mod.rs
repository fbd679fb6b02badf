//! Service layer for business logic and orchestration.
//!
//! Services sit between the pure models and the HTTP layer. The countdown
//! ticker drives the anniversary clock on behalf of streaming consumers.

pub mod countdown;

pub use countdown::{CountdownTicker, PhaseTransition};
