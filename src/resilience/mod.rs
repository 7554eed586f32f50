//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → timeouts.rs (enforce upstream deadline)
//!     → On failure: gateway error to the client, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every backend call has a deadline
//! - Failures stay with the request that hit them

pub mod timeouts;
