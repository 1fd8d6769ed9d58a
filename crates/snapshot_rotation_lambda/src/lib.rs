//! AWS-oriented adapters and handlers for snapshot rotation.
//!
//! This crate owns runtime integration details (Lambda entry points, the RDS
//! client adapter and log setup) and re-exports the domain crate through a
//! single `runtime` module boundary.

pub mod adapters;
pub mod entry;
pub mod handlers;
pub mod logging;
pub mod runtime;
