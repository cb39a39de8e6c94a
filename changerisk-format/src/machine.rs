//! `--machine` mode: a stable, versioned object for tool consumption (spec
//! §6). Only fields whose data is present are emitted — optional sections
//! and empty arrays are skipped rather than rendered as placeholders.

use serde::Serialize;

use changerisk_core::types::{NextAction, Outcome, Phase0Decision, RecommendationPriority};

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct MachineOutput {
    pub schema_version: u32,
    pub file: String,
    pub risk_level: String,
    pub risk_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub phase0: MachinePhase0,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase1: Option<MachinePhase1>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub investigation_trace: Vec<MachineHop>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<MachineRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blast_radius: Option<MachineBlastRadius>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub temporal_coupling: Vec<MachineCoupling>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hotspots: Vec<MachineHotspot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MachineStats>,
}

#[derive(Debug, Serialize)]
pub struct MachinePhase0 {
    pub decision: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub risk: f64,
    pub rationale: String,
}

#[derive(Debug, Serialize)]
pub struct MachinePhase1 {
    pub score: f64,
    pub level: &'static str,
    pub escalate: bool,
    pub metrics: MachineMetrics,
}

#[derive(Debug, Serialize)]
pub struct MachineMetrics {
    pub coupling: f64,
    pub co_change: f64,
    pub test_ratio: f64,
    pub incident_count_30d: u32,
}

#[derive(Debug, Serialize)]
pub struct MachineHop {
    pub hop: u32,
    pub narrative_excerpt: String,
    pub nodes_visited: Vec<String>,
    pub edges_traversed: Vec<String>,
    pub tokens: u32,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct MachineRecommendation {
    pub action: String,
    pub priority: &'static str,
    pub auto_fixable: bool,
    pub est_minutes: u32,
}

#[derive(Debug, Serialize)]
pub struct MachineBlastRadius {
    pub direct_dependents: u32,
    pub transitive_dependents: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub critical_paths: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MachineCoupling {
    pub other_file: String,
    pub frequency: f64,
    pub co_changes: u32,
    pub window_days: u32,
}

#[derive(Debug, Serialize)]
pub struct MachineHotspot {
    pub file: String,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct MachineStats {
    pub total_tokens: u32,
    pub total_duration_ms: u64,
    pub stopping_reason: &'static str,
}

fn decision_str(d: Phase0Decision) -> &'static str {
    match d {
        Phase0Decision::Skip => "SKIP",
        Phase0Decision::Normal => "NORMAL",
        Phase0Decision::ForceEscalate => "FORCE_ESCALATE",
    }
}

fn next_action_str(a: NextAction) -> &'static str {
    match a {
        NextAction::GatherMoreEvidence => "GATHER_MORE_EVIDENCE",
        NextAction::Finalize => "FINALIZE",
    }
}

fn priority_str(p: RecommendationPriority) -> &'static str {
    match p {
        RecommendationPriority::Critical => "critical",
        RecommendationPriority::High => "high",
        RecommendationPriority::Medium => "medium",
        RecommendationPriority::Low => "low",
    }
}

impl MachineOutput {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let phase0 = MachinePhase0 {
            decision: decision_str(outcome.phase0.decision),
            kind: outcome.phase0.modification_type.as_str(),
            risk: outcome.phase0.pre_risk,
            rationale: outcome.phase0.rationale.clone(),
        };

        let phase1 = outcome.phase1.as_ref().map(|p| MachinePhase1 {
            score: p.score,
            level: p.level.as_str(),
            escalate: p.escalate,
            metrics: MachineMetrics {
                coupling: p.metrics.coupling,
                co_change: p.metrics.co_change,
                test_ratio: p.metrics.test_ratio,
                incident_count_30d: p.metrics.incident_count_30d,
            },
        });

        let investigation = outcome.investigation.as_ref();

        let investigation_trace = investigation
            .map(|a| {
                a.hop_trace
                    .iter()
                    .map(|h| MachineHop {
                        hop: h.hop,
                        narrative_excerpt: h.narrative_excerpt.clone(),
                        nodes_visited: h.nodes_visited.clone(),
                        edges_traversed: h.edges_traversed.clone(),
                        tokens: h.tokens,
                        duration_ms: h.duration_ms,
                        confidence: h.confidence,
                        next_action: h.next_action.map(next_action_str),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let evidence = outcome.evidence();

        let recommendations = investigation
            .map(|a| {
                a.recommendations
                    .iter()
                    .map(|r| MachineRecommendation {
                        action: r.action.clone(),
                        priority: priority_str(r.priority),
                        auto_fixable: r.auto_fixable,
                        est_minutes: r.est_minutes,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let blast_radius = investigation.and_then(|a| {
            a.blast_radius.as_ref().map(|b| MachineBlastRadius {
                direct_dependents: b.direct_dependents,
                transitive_dependents: b.transitive_dependents,
                critical_paths: b.critical_paths.clone(),
            })
        });

        let temporal_coupling = investigation
            .and_then(|a| a.coupled_files.as_ref())
            .map(|c| {
                c.iter()
                    .map(|t| MachineCoupling {
                        other_file: t.other_file.clone(),
                        frequency: t.frequency,
                        co_changes: t.co_changes,
                        window_days: t.window_days,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let hotspots = investigation
            .and_then(|a| a.hotspots.as_ref())
            .map(|h| {
                h.iter()
                    .map(|s| MachineHotspot { file: s.file.clone(), score: s.score, reason: s.reason.clone() })
                    .collect()
            })
            .unwrap_or_default();

        let stats = investigation.map(|a| MachineStats {
            total_tokens: a.stats.total_tokens,
            total_duration_ms: a.stats.total_duration_ms,
            stopping_reason: a.stats.stopping_reason.as_str(),
        });

        Self {
            schema_version: SCHEMA_VERSION,
            file: outcome.file.clone(),
            risk_level: outcome.risk_level.as_str().to_string(),
            risk_score: outcome.risk_score,
            confidence: outcome.confidence,
            phase0,
            phase1,
            investigation_trace,
            evidence,
            recommendations,
            blast_radius,
            temporal_coupling,
            hotspots,
            stats,
        }
    }
}
