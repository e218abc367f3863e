//! Background Tasks Module
//!
//! Contains background tasks owned by the application context.
//!
//! # Tasks
//! - Object cache sweep: reclaims memory held by stale entries

mod sweep;

pub use sweep::SweepTask;
