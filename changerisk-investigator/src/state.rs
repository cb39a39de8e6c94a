//! Mutable per-investigation state (spec §4.8 "State"). Owned entirely by
//! one `investigate()` call — never shared across files (spec §5 ordering
//! guarantees).

use changerisk_core::constants::{
    DEFAULT_BREAKTHROUGH_THRESHOLD, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAX_HOPS,
    DEFAULT_TOKEN_BUDGET,
};
use changerisk_core::types::{Breakthrough, ConfidenceEntry, HopRecord, RiskLevel};

pub struct InvestigationState {
    pub evidence_chain: Vec<String>,
    pub current_risk_score: f64,
    pub current_risk_level: RiskLevel,
    pub confidence_history: Vec<ConfidenceEntry>,
    pub breakthroughs: Vec<Breakthrough>,
    pub hop_trace: Vec<HopRecord>,
    pub token_budget_remaining: i64,
    pub max_hops: u32,
    pub confidence_threshold: f64,
    pub breakthrough_threshold: f64,
}

impl InvestigationState {
    pub fn seeded(seed_score: f64, seed_evidence: Vec<String>) -> Self {
        Self {
            evidence_chain: seed_evidence,
            current_risk_score: seed_score,
            current_risk_level: RiskLevel::from_score(seed_score),
            confidence_history: Vec::new(),
            breakthroughs: Vec::new(),
            hop_trace: Vec::new(),
            token_budget_remaining: DEFAULT_TOKEN_BUDGET as i64,
            max_hops: DEFAULT_MAX_HOPS,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            breakthrough_threshold: DEFAULT_BREAKTHROUGH_THRESHOLD,
        }
    }

    pub fn last_confidence(&self) -> Option<f64> {
        self.confidence_history.last().map(|c| c.confidence)
    }
}
