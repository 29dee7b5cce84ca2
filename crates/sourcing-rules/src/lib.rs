//! Sourcing rules engine for procurement events.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
