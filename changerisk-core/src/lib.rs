//! # changerisk-core
//!
//! Foundation crate for the change-risk assessment engine.
//! Defines the shared data model, risk/error enums, threshold config, and
//! tracing setup that every other crate in the workspace depends on.

#![allow(dead_code)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod model;
pub mod tracing_setup;
pub mod types;

pub use errors::{ErrorCode, RiskError, RiskResult};
pub use types::{ModificationType, Phase0Decision, RiskLevel};
