//! # changerisk-orchestrator
//!
//! Per-file sequencing (C10): Phase 0 triage, the cached Phase 1 threshold
//! profile, and a conditional, deadline-bounded Phase 2 investigation. A
//! failed Phase 2 degrades to Phase 1 output rather than failing the file;
//! phases never share mutable state across files (spec §4.10, §5).

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Instant;

use changerisk_analysis::phase0::FileChange;
use changerisk_analysis::phase1::RawMetrics;
use changerisk_analysis::{classify_phase0, config_selector, evaluate_phase1};
use changerisk_core::config::InvestigatorConfig;
use changerisk_core::model::RepoId;
use changerisk_core::types::{
    MetricBand, Outcome, Phase0Decision, Phase1Metrics, Phase1Result, ProfileSelection,
    RepoMetadata, RiskLevel,
};
use changerisk_graph::GraphAdapter;
use changerisk_incidents::IncidentStore;
use changerisk_investigator::{ChangeContext, Investigator};
use changerisk_relational::RelationalStore;
use tokio::sync::OnceCell;
use tracing::warn;

/// One file's proposed change plus the caller-supplied facts this crate has
/// no way to derive itself (test coverage requires an external tool).
pub struct FileInput {
    pub repo_id: RepoId,
    pub path: String,
    pub diff: String,
    pub language: Option<String>,
    pub test_ratio: f64,
}

pub struct Orchestrator {
    relational: Arc<RelationalStore>,
    graph: Arc<GraphAdapter>,
    incidents: Arc<IncidentStore>,
    investigator: Arc<Investigator>,
    config: InvestigatorConfig,
    llm_available: bool,
    profile: OnceCell<ProfileSelection>,
}

impl Orchestrator {
    pub fn new(
        relational: Arc<RelationalStore>,
        graph: Arc<GraphAdapter>,
        incidents: Arc<IncidentStore>,
        investigator: Arc<Investigator>,
        config: InvestigatorConfig,
        llm_available: bool,
    ) -> Self {
        Self {
            relational,
            graph,
            incidents,
            investigator,
            config,
            llm_available,
            profile: OnceCell::new(),
        }
    }

    /// Runs the full per-file pipeline. Never returns an error: a degraded
    /// file still produces an `Outcome`, just with less confidence behind
    /// it (spec §7: "the Orchestrator never fails a whole run because one
    /// file's Phase 2 failed").
    pub async fn process_file(&self, input: &FileInput, repo_metadata: &RepoMetadata) -> Outcome {
        let change = FileChange {
            path: input.path.clone(),
            diff: input.diff.clone(),
            language: input.language.clone(),
        };
        let phase0 = classify_phase0(&change);

        if phase0.decision == Phase0Decision::Skip {
            return Outcome {
                file: input.path.clone(),
                risk_level: RiskLevel::Low,
                risk_score: phase0.pre_risk,
                confidence: None,
                phase0,
                phase1: None,
                investigation: None,
            };
        }

        let profile = self
            .profile
            .get_or_init(|| async { config_selector::select(repo_metadata) })
            .await
            .profile
            .clone();

        let phase1 = if phase0.decision == Phase0Decision::ForceEscalate {
            force_escalate_result(&phase0)
        } else {
            let raw = self.gather_raw_metrics(input).await;
            evaluate_phase1(raw, &profile)
        };

        let investigation = if phase1.escalate && self.llm_available {
            self.run_investigation(input, &phase0, &phase1).await
        } else {
            None
        };

        let (risk_level, risk_score, confidence) = match &investigation {
            Some(assessment) => (assessment.level, assessment.score, Some(assessment.confidence)),
            None => (phase1.level, phase1.score, None),
        };

        Outcome {
            file: input.path.clone(),
            risk_level,
            risk_score,
            confidence,
            phase0,
            phase1: Some(phase1),
            investigation,
        }
    }

    async fn gather_raw_metrics(&self, input: &FileInput) -> RawMetrics {
        use changerisk_graph::IGraphReader;

        let repo_id_str = input.repo_id.to_string();

        let coupling = self
            .graph
            .direct_importers_count(&repo_id_str, &input.path)
            .unwrap_or_else(|err| {
                warn!(%err, file = %input.path, "coupling lookup failed, treating as zero");
                0
            }) as f64;

        let co_change = self
            .relational
            .max_cochange_frequency(&repo_id_str, &input.path)
            .unwrap_or_else(|err| {
                warn!(%err, file = %input.path, "co-change lookup failed, treating as zero");
                0.0
            });

        let incident_count_30d = self
            .incidents
            .stats(&repo_id_str, &input.path)
            .map(|s| s.last_30d)
            .unwrap_or_else(|err| {
                warn!(%err, file = %input.path, "incident stats lookup failed, treating as zero");
                0
            });

        RawMetrics { coupling, co_change, test_ratio: input.test_ratio, incident_count_30d }
    }

    async fn run_investigation(
        &self,
        input: &FileInput,
        phase0: &changerisk_core::types::Phase0Result,
        phase1: &Phase1Result,
    ) -> Option<changerisk_core::types::RiskAssessment> {
        let ctx = ChangeContext {
            repo_id: input.repo_id,
            file_path: input.path.clone(),
            change_summary: format!("{} ({}): {}", phase0.modification_type.as_str(), phase0.rationale, input.diff),
            baseline_score: phase1.score,
            baseline_reasons: phase1.reasons.clone(),
        };

        let deadline = self.config.effective_phase2_timeout();
        let started = Instant::now();

        match tokio::time::timeout(deadline, self.investigator.investigate(&ctx)).await {
            Ok(Ok(assessment)) => Some(assessment),
            Ok(Err(err)) => {
                warn!(%err, file = %input.path, "phase 2 investigation failed, degrading to phase 1 output");
                None
            }
            Err(_) => {
                warn!(
                    file = %input.path,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "phase 2 investigation exceeded its per-file deadline, degrading to phase 1 output"
                );
                None
            }
        }
    }
}

/// Spec §4.10: `FORCE_ESCALATE` builds a lightweight `Phase1Result` directly
/// from the Phase 0 rationale instead of paying for a full baseline
/// computation — `metrics` is a placeholder-free zeroed record since no
/// metric actually drove this decision.
fn force_escalate_result(phase0: &changerisk_core::types::Phase0Result) -> Phase1Result {
    let score = phase0.pre_risk.clamp(0.0, 1.0);
    Phase1Result {
        score,
        level: RiskLevel::from_score(score),
        escalate: true,
        reasons: vec![phase0.rationale.clone()],
        metrics: Phase1Metrics {
            coupling: 0.0,
            coupling_band: MetricBand::Low,
            co_change: 0.0,
            co_change_band: MetricBand::Low,
            test_ratio: 1.0,
            test_ratio_band: MetricBand::Low,
            incident_count_30d: 0,
        },
    }
}
