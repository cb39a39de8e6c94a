//! Runtime configuration, mirroring the teacher's `ScanConfig`: `Option<T>`
//! fields on disk, `effective_*()` accessors resolve defaults at read time so
//! a partially-specified TOML file never needs every field.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::*;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InvestigatorConfig {
    pub max_hops: Option<u32>,
    pub confidence_threshold: Option<f64>,
    pub breakthrough_threshold: Option<f64>,
    pub token_budget: Option<u32>,
    pub phase2_timeout_secs: Option<u64>,
}

impl InvestigatorConfig {
    /// Env var overrides take precedence over file config, which takes
    /// precedence over built-in defaults (spec §6).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var(ENV_MAX_HOPS) {
            if let Ok(n) = v.parse() {
                self.max_hops = Some(n);
            }
        }
        if let Ok(v) = std::env::var(ENV_CONFIDENCE_THRESHOLD) {
            if let Ok(n) = v.parse() {
                self.confidence_threshold = Some(n);
            }
        }
        if let Ok(v) = std::env::var(ENV_TOKEN_BUDGET) {
            if let Ok(n) = v.parse() {
                self.token_budget = Some(n);
            }
        }
        if let Ok(v) = std::env::var(ENV_PHASE2_TIMEOUT) {
            if let Ok(n) = v.parse() {
                self.phase2_timeout_secs = Some(n);
            }
        }
        self
    }

    pub fn effective_max_hops(&self) -> u32 {
        self.max_hops.unwrap_or(DEFAULT_MAX_HOPS)
    }

    pub fn effective_confidence_threshold(&self) -> f64 {
        self.confidence_threshold.unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD)
    }

    pub fn effective_breakthrough_threshold(&self) -> f64 {
        self.breakthrough_threshold.unwrap_or(DEFAULT_BREAKTHROUGH_THRESHOLD)
    }

    pub fn effective_token_budget(&self) -> u32 {
        self.token_budget.unwrap_or(DEFAULT_TOKEN_BUDGET)
    }

    pub fn effective_phase2_timeout(&self) -> Duration {
        Duration::from_secs(self.phase2_timeout_secs.unwrap_or(DEFAULT_PHASE2_TIMEOUT_SECS))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TemporalConfig {
    pub window_days: Option<u32>,
    pub co_change_threshold: Option<f64>,
    pub bulk_commit_file_cap: Option<usize>,
}

impl TemporalConfig {
    pub fn effective_window_days(&self) -> u32 {
        self.window_days.unwrap_or(DEFAULT_COMMIT_WINDOW_DAYS)
    }

    pub fn effective_co_change_threshold(&self) -> f64 {
        self.co_change_threshold.unwrap_or(DEFAULT_COCHANGE_THRESHOLD)
    }

    pub fn effective_bulk_commit_file_cap(&self) -> usize {
        self.bulk_commit_file_cap.unwrap_or(DEFAULT_BULK_COMMIT_FILE_CAP)
    }
}

/// Top-level on-disk config (TOML), composed of the per-subsystem configs
/// above. `no_llm` and connection URIs are read by the (out-of-scope) CLI and
/// passed into the orchestrator explicitly — no ambient globals here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RiskConfig {
    pub investigator: InvestigatorConfig,
    pub temporal: TemporalConfig,
}
