//! # changerisk-format
//!
//! Result formatter (C9): renders an `Outcome` in one of four modes.
//! Only `machine` mode is structured; the other three build plain text the
//! way the teacher's specification renderer does — one function per
//! section, "no data" sentences instead of empty placeholders.

#![allow(dead_code)]

pub mod machine;
pub mod render;

use changerisk_core::errors::{RiskError, RiskResult};
use changerisk_core::types::Outcome;

pub use machine::MachineOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Standard,
    Quiet,
    Explain,
    Machine,
}

pub fn render(outcome: &Outcome, mode: RenderMode) -> RiskResult<String> {
    match mode {
        RenderMode::Standard => Ok(render::render_standard(outcome)),
        RenderMode::Quiet => Ok(render::render_quiet(outcome)),
        RenderMode::Explain => Ok(render::render_explain(outcome)),
        RenderMode::Machine => {
            let machine = MachineOutput::from_outcome(outcome);
            serde_json::to_string_pretty(&machine)
                .map_err(|e| RiskError::Parse { what: "machine output", detail: e.to_string() })
        }
    }
}
