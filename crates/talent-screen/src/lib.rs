//! Candidate screening library: scoring engine, template library, submission
//! service and the ambient configuration, telemetry and error plumbing.

pub mod config;
pub mod error;
pub mod screening;
pub mod telemetry;
