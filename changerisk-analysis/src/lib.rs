//! # changerisk-analysis
//!
//! Phase 0 pre-analysis, the adaptive config selector, and the Phase 1
//! baseline engine (C5/C6/C7) — the cheap-path metrics that run before any
//! LLM call.

#![allow(dead_code)]

pub mod config_selector;
pub mod phase0;
pub mod phase1;

pub use phase0::{classify as classify_phase0, FileChange};
pub use phase1::{evaluate as evaluate_phase1, RawMetrics};
