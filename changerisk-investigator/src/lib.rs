//! # changerisk-investigator
//!
//! Phase 2 (C8): confidence-driven multi-hop LLM investigation over the
//! graph/relational/incident read paths, producing a traceable
//! `RiskAssessment`. The hardest subsystem — everything here degrades
//! rather than aborts an otherwise-successful run (spec §4.8, §7).

#![allow(dead_code)]

pub mod breakthrough;
pub mod evidence;
pub mod investigator;
pub mod llm;
pub mod parse;
pub mod prompts;
pub mod state;

pub use evidence::PreHopEvidence;
pub use investigator::{ChangeContext, Investigator};
pub use llm::{LlmClient, LlmResponse};
