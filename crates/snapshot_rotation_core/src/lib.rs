//! Shared snapshot rotation domain primitives.
//!
//! This crate owns the notification contract, invocation configuration and
//! retention rules. It intentionally excludes AWS SDK and Lambda runtime
//! concerns so every decision can be exercised without a cloud account.

pub mod config;
pub mod contract;
pub mod error;
pub mod retention;
