//! Core library for the AgriFair subsidy portal.
//!
//! The pipeline covers grant eligibility resolution, the application
//! lifecycle state machine, rule-based priority scoring, and the contract
//! for the external anomaly-detection service. Persistence, identity, and
//! document storage are collaborator traits implemented by the hosting
//! service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
