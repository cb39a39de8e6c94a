//! The per-hop loop (spec §4.8). One `Investigator::investigate()` call owns
//! its `InvestigationState` end to end; nothing here is shared across files.

use std::sync::Arc;
use std::time::Instant;

use changerisk_core::config::InvestigatorConfig;
use changerisk_core::errors::{RiskError, RiskResult};
use changerisk_core::model::RepoId;
use changerisk_core::types::{
    BlastRadius, ConfidenceEntry, HopRecord, InvestigationStats, NextAction, RiskAssessment,
    RiskLevel, StoppingReason,
};
use changerisk_graph::GraphAdapter;
use changerisk_incidents::IncidentStore;
use changerisk_relational::RelationalStore;
use tracing::warn;

use crate::breakthrough;
use crate::evidence::{self, PreHopEvidence};
use crate::llm::LlmClient;
use crate::parse;
use crate::prompts;
use crate::state::InvestigationState;

const NARRATIVE_EXCERPT_CHARS: usize = 200;

/// Everything the investigator needs about the change under review; the
/// orchestrator assembles this from Phase 0/Phase 1 output.
pub struct ChangeContext {
    pub repo_id: RepoId,
    pub file_path: String,
    pub change_summary: String,
    pub baseline_score: f64,
    pub baseline_reasons: Vec<String>,
}

pub struct Investigator {
    llm: Arc<dyn LlmClient>,
    relational: Arc<RelationalStore>,
    incidents: Arc<IncidentStore>,
    graph: Arc<GraphAdapter>,
    config: InvestigatorConfig,
}

impl Investigator {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        relational: Arc<RelationalStore>,
        incidents: Arc<IncidentStore>,
        graph: Arc<GraphAdapter>,
        config: InvestigatorConfig,
    ) -> Self {
        Self { llm, relational, incidents, graph, config }
    }

    pub async fn investigate(&self, ctx: &ChangeContext) -> RiskResult<RiskAssessment> {
        let started = Instant::now();
        let evidence = evidence::collect(
            &self.relational,
            &self.incidents,
            &self.graph,
            ctx.repo_id,
            &ctx.file_path,
        )
        .await;

        let mut state = InvestigationState::seeded(ctx.baseline_score, ctx.baseline_reasons.clone());
        state.max_hops = self.config.effective_max_hops();
        state.confidence_threshold = self.config.effective_confidence_threshold();
        state.breakthrough_threshold = self.config.effective_breakthrough_threshold();
        state.token_budget_remaining = self.config.effective_token_budget() as i64;
        seed_evidence_chain(&mut state, &evidence);

        let mut hops_succeeded: u32 = 0;
        let mut prior_responses: Vec<String> = Vec::new();
        let mut stopping_reason = StoppingReason::MaxHops;
        let mut stopping_rationale = format!("Max hops reached ({}/{})", state.max_hops, state.max_hops);

        for hop in 1..=state.max_hops {
            if state.token_budget_remaining <= 0 {
                stopping_reason = StoppingReason::TokenBudget;
                stopping_rationale = "Token budget exhausted".to_string();
                break;
            }

            let hop_prompt = prompts::build_hop_prompt(
                hop,
                &ctx.file_path,
                &ctx.change_summary,
                &evidence,
                &state.evidence_chain,
                &prior_responses,
            );

            let hop_started = Instant::now();
            let narrative = match self.llm.query(&hop_prompt).await {
                Ok(resp) => resp,
                Err(err) => {
                    warn!(hop, %err, "hop narrative query failed, ending investigation early");
                    stopping_reason = StoppingReason::Error;
                    stopping_rationale = format!("LLM call failed on hop {hop}: {err}");
                    break;
                }
            };
            state.token_budget_remaining -= narrative.tokens as i64;
            prior_responses.push(narrative.text.clone());

            let file_mentions = parse::extract_file_mentions(&narrative.text);
            let edge_mentions = parse::extract_edge_mentions(&narrative.text);
            for target in &file_mentions {
                self.graph.try_materialize_mention(
                    ctx.repo_id,
                    &ctx.file_path,
                    target,
                    changerisk_graph::EdgeKind::Imports,
                );
            }

            state.evidence_chain.push(format!(
                "hop {hop}: {}",
                excerpt(&narrative.text, 300)
            ));

            let confidence_prompt = prompts::build_confidence_prompt(&state.evidence_chain);
            let confidence_resp = match self.llm.query(&confidence_prompt).await {
                Ok(resp) => resp,
                Err(err) => {
                    warn!(hop, %err, "confidence query failed, ending investigation early");
                    hops_succeeded += 1;
                    stopping_reason = StoppingReason::Error;
                    stopping_rationale = format!("LLM call failed on hop {hop}: {err}");
                    break;
                }
            };
            state.token_budget_remaining -= confidence_resp.tokens as i64;
            let assessment = parse::parse_confidence(&confidence_resp.text);

            let score_before = state.current_risk_score;
            let level_before = state.current_risk_level;
            if let Some(new_score) = parse::extract_score(&narrative.text) {
                state.current_risk_score = new_score;
                state.current_risk_level = RiskLevel::from_score(new_score);
            }
            if state.current_risk_level != level_before {
                if let Some(bt) = breakthrough::detect(
                    hop,
                    score_before,
                    level_before,
                    state.current_risk_score,
                    state.current_risk_level,
                    state.breakthrough_threshold,
                    "narrative risk score update",
                    &assessment.reasoning,
                ) {
                    state.breakthroughs.push(bt);
                }
            }

            state.confidence_history.push(ConfidenceEntry {
                hop,
                confidence: assessment.confidence,
                risk_score: state.current_risk_score,
                risk_level: state.current_risk_level,
                reasoning: assessment.reasoning.clone(),
                next_action: assessment.next_action,
            });

            state.hop_trace.push(HopRecord {
                hop,
                query: hop_prompt,
                narrative_excerpt: excerpt(&narrative.text, NARRATIVE_EXCERPT_CHARS),
                nodes_visited: file_mentions,
                edges_traversed: edge_mentions.into_iter().map(str::to_string).collect(),
                tokens: narrative.tokens + confidence_resp.tokens,
                duration_ms: hop_started.elapsed().as_millis() as u64,
                confidence: Some(assessment.confidence),
                next_action: Some(assessment.next_action),
            });

            hops_succeeded += 1;

            if assessment.confidence >= state.confidence_threshold {
                stopping_reason = StoppingReason::HighConfidence;
                stopping_rationale = format!(
                    "High confidence reached ({:.2} \u{2265} {:.2})",
                    assessment.confidence, state.confidence_threshold
                );
                break;
            }
            if assessment.next_action == NextAction::Finalize {
                stopping_reason = StoppingReason::FinalizeRequested;
                stopping_rationale = "LLM requested finalization".to_string();
                break;
            }
            if state.token_budget_remaining <= 0 {
                stopping_reason = StoppingReason::TokenBudget;
                stopping_rationale = "Token budget exhausted".to_string();
                break;
            }
            if hop == state.max_hops {
                stopping_reason = StoppingReason::MaxHops;
                stopping_rationale = format!("Max hops reached ({hop}/{})", state.max_hops);
            }
        }

        if hops_succeeded == 0 {
            return Err(RiskError::Investigation(format!(
                "investigation of {} produced zero hops: {stopping_rationale}",
                ctx.file_path
            )));
        }

        state.evidence_chain.push(format!("Investigation stopped: {stopping_rationale}"));

        let synthesis_prompt = prompts::build_synthesis_prompt(&ctx.file_path, &state.evidence_chain);
        let synthesis_text = match self.llm.query(&synthesis_prompt).await {
            Ok(resp) => {
                state.token_budget_remaining -= resp.tokens as i64;
                Some(resp.text)
            }
            Err(err) => {
                warn!(%err, "synthesis query failed, falling back to current investigation state");
                None
            }
        };

        let synthesized = parse::parse_synthesis(
            synthesis_text.as_deref().unwrap_or(""),
            state.current_risk_score,
        );

        let confidence = state.last_confidence().unwrap_or_else(|| {
            0.6 * (state.evidence_chain.len() as f64 / 10.0).min(1.0)
                + 0.4 * (state.hop_trace.len() as f64 / 3.0).min(1.0)
        });

        let blast_radius = Some(BlastRadius {
            direct_dependents: evidence.direct_neighbors_count,
            transitive_dependents: 0,
            critical_paths: Vec::new(),
        });
        let coupled_files = if evidence.co_changed.is_empty() { None } else { Some(evidence.co_changed) };

        Ok(RiskAssessment {
            level: synthesized.level,
            score: synthesized.score,
            confidence: confidence.clamp(0.0, 1.0),
            evidence: state.evidence_chain,
            recommendations: synthesized.recommendations,
            blast_radius,
            hotspots: None,
            coupled_files,
            confidence_history: state.confidence_history,
            breakthroughs: state.breakthroughs,
            hop_trace: state.hop_trace,
            stats: InvestigationStats {
                total_tokens: (self.config.effective_token_budget() as i64 - state.token_budget_remaining).max(0) as u32,
                total_duration_ms: started.elapsed().as_millis() as u64,
                stopping_reason,
            },
        })
    }
}

fn seed_evidence_chain(state: &mut InvestigationState, evidence: &PreHopEvidence) {
    if !evidence.co_changed.is_empty() {
        state.evidence_chain.push(format!(
            "{} file(s) historically co-change with this one",
            evidence.co_changed.len()
        ));
    }
    if evidence.incident_stats.total > 0 {
        state.evidence_chain.push(format!(
            "{} prior incident(s) linked to this file, {} in the last 30 days",
            evidence.incident_stats.total, evidence.incident_stats.last_30d
        ));
    }
    if evidence.direct_neighbors_count > 0 {
        state.evidence_chain.push(format!(
            "{} file(s) directly import this one",
            evidence.direct_neighbors_count
        ));
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
