//! Risk verdicts and the phase-result types threaded through the pipeline
//! (spec §2, §4.5, §4.7, §4.8).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Monotone risk band (invariant 6): `score` -> `level` is a pure function,
/// never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// bands: <0.2 MINIMAL, <0.4 LOW, <0.6 MEDIUM, <0.8 HIGH, else CRITICAL.
    pub fn from_score(score: f64) -> Self {
        if score < 0.2 {
            Self::Minimal
        } else if score < 0.4 {
            Self::Low
        } else if score < 0.6 {
            Self::Medium
        } else if score < 0.8 {
            Self::High
        } else {
            Self::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "MINIMAL",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Exit-code relevant split used by the (out-of-scope) CLI: true when
    /// this level should flip the process exit code to 1.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase 0 categorical tag (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModificationType {
    Security,
    Configuration,
    ProductionConfiguration,
    Documentation,
    CommentOnly,
    TestOnly,
    Structural,
    Behavioral,
    Performance,
    Ownership,
    TemporalHotspot,
    Mixed,
    Unknown,
}

impl ModificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Configuration => "configuration",
            Self::ProductionConfiguration => "production_configuration",
            Self::Documentation => "documentation",
            Self::CommentOnly => "comment_only",
            Self::TestOnly => "test_only",
            Self::Structural => "structural",
            Self::Behavioral => "behavioral",
            Self::Performance => "performance",
            Self::Ownership => "ownership",
            Self::TemporalHotspot => "temporal_hotspot",
            Self::Mixed => "mixed",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase0Decision {
    Skip,
    Normal,
    ForceEscalate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase0Result {
    pub decision: Phase0Decision,
    pub modification_type: ModificationType,
    pub pre_risk: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricBand {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase1Metrics {
    pub coupling: f64,
    pub coupling_band: MetricBand,
    pub co_change: f64,
    pub co_change_band: MetricBand,
    pub test_ratio: f64,
    pub test_ratio_band: MetricBand,
    pub incident_count_30d: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase1Result {
    pub score: f64,
    pub level: RiskLevel,
    pub escalate: bool,
    pub reasons: Vec<String>,
    pub metrics: Phase1Metrics,
}

/// One entry in the confidence-assessment history of an investigation
/// (spec §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceEntry {
    pub hop: u32,
    pub confidence: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub reasoning: String,
    pub next_action: NextAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextAction {
    GatherMoreEvidence,
    Finalize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakthrough {
    pub hop: u32,
    pub risk_before: f64,
    pub risk_after: f64,
    pub level_before: RiskLevel,
    pub level_after: RiskLevel,
    pub trigger: String,
    pub reason: String,
    pub is_escalation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoppingReason {
    HighConfidence,
    FinalizeRequested,
    MaxHops,
    TokenBudget,
    Cancelled,
    Error,
}

impl StoppingReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighConfidence => "high_confidence",
            Self::FinalizeRequested => "finalize_requested",
            Self::MaxHops => "max_hops",
            Self::TokenBudget => "token_budget",
            Self::Cancelled => "cancelled",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HopRecord {
    pub hop: u32,
    pub query: String,
    pub narrative_excerpt: String,
    pub nodes_visited: Vec<String>,
    pub edges_traversed: Vec<String>,
    pub tokens: u32,
    pub duration_ms: u64,
    pub confidence: Option<f64>,
    pub next_action: Option<NextAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RecommendationPriority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub priority: RecommendationPriority,
    pub auto_fixable: bool,
    pub est_minutes: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlastRadius {
    pub direct_dependents: u32,
    pub transitive_dependents: u32,
    pub critical_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalCoupling {
    pub other_file: String,
    pub frequency: f64,
    pub co_changes: u32,
    pub window_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotspot {
    pub file: String,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigationStats {
    pub total_tokens: u32,
    pub total_duration_ms: u64,
    pub stopping_reason: StoppingReason,
}

/// The Phase 2 synthesis output (spec §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score: f64,
    pub confidence: f64,
    pub evidence: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub blast_radius: Option<BlastRadius>,
    pub hotspots: Option<Vec<Hotspot>>,
    pub coupled_files: Option<Vec<TemporalCoupling>>,
    pub confidence_history: Vec<ConfidenceEntry>,
    pub breakthroughs: Vec<Breakthrough>,
    pub hop_trace: Vec<HopRecord>,
    pub stats: InvestigationStats,
}

/// The fully merged per-file outcome the orchestrator emits (spec §6
/// machine-mode schema is a rendering of this).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub file: String,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub confidence: Option<f64>,
    pub phase0: Phase0Result,
    pub phase1: Option<Phase1Result>,
    pub investigation: Option<RiskAssessment>,
}

impl Outcome {
    pub fn evidence(&self) -> Vec<String> {
        match &self.investigation {
            Some(a) => a.evidence.clone(),
            None => self
                .phase1
                .as_ref()
                .map(|p| p.reasons.clone())
                .unwrap_or_default(),
        }
    }
}

/// A named, read-only threshold profile selected per repository (C6).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdProfile {
    pub name: &'static str,
    pub coupling_threshold: f64,
    pub co_change_threshold: f64,
    pub test_ratio_threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSelection {
    pub profile: ThresholdProfile,
    pub reason: String,
}

/// Metadata about a repository used to infer its domain/profile (C6 input).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub dominant_language: Option<String>,
    pub dependency_manifest_keys: Vec<String>,
    pub directory_topology: Vec<String>,
}

pub type MetadataMap = HashMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_bands_are_monotone_and_exhaustive() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Minimal);
        assert_eq!(RiskLevel::from_score(0.19), RiskLevel::Minimal);
        assert_eq!(RiskLevel::from_score(0.2), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.4), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.59), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.6), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.79), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.8), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::Critical);
    }

    #[test]
    fn actionable_only_for_high_and_critical() {
        assert!(!RiskLevel::Minimal.is_actionable());
        assert!(!RiskLevel::Low.is_actionable());
        assert!(!RiskLevel::Medium.is_actionable());
        assert!(RiskLevel::High.is_actionable());
        assert!(RiskLevel::Critical.is_actionable());
    }
}
