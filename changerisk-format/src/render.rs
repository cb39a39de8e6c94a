//! Human-facing render modes (spec §4.9): `standard`, `quiet`, `explain`.
//! Text building follows the teacher's section-renderer shape — plain
//! `String` accumulation, one function per concern, "no data" sentences
//! instead of empty headers.

use changerisk_core::types::Outcome;

const MAX_STANDARD_EVIDENCE: usize = 5;
const EXPLAIN_RESPONSE_TRUNCATE: usize = 200;

pub fn render_quiet(outcome: &Outcome) -> String {
    format!("{}: {} ({:.2})", outcome.file, outcome.risk_level, outcome.risk_score)
}

pub fn render_standard(outcome: &Outcome) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", outcome.file));
    out.push_str(&format!("  risk: {} (score {:.2})\n", outcome.risk_level, outcome.risk_score));

    if let Some(confidence) = outcome.confidence {
        out.push_str(&format!("  confidence: {:.2}\n", confidence));
    }

    let evidence = outcome.evidence();
    if !evidence.is_empty() {
        out.push_str("  evidence:\n");
        for item in evidence.iter().take(MAX_STANDARD_EVIDENCE) {
            out.push_str(&format!("    - {item}\n"));
        }
        if evidence.len() > MAX_STANDARD_EVIDENCE {
            out.push_str(&format!("    ... and {} more\n", evidence.len() - MAX_STANDARD_EVIDENCE));
        }
    }

    if let Some(assessment) = &outcome.investigation {
        if !assessment.recommendations.is_empty() {
            out.push_str("  recommendations:\n");
            for r in &assessment.recommendations {
                out.push_str(&format!("    - [{:?}] {} (~{}m)\n", r.priority, r.action, r.est_minutes));
            }
        }
        out.push_str(&format!(
            "  investigation: {} hop(s), {} token(s), stopped: {}\n",
            assessment.hop_trace.len(),
            assessment.stats.total_tokens,
            assessment.stats.stopping_reason.as_str()
        ));
    } else if let Some(p1) = &outcome.phase1 {
        if !p1.reasons.is_empty() {
            out.push_str("  phase1 reasons:\n");
            for reason in &p1.reasons {
                out.push_str(&format!("    - {reason}\n"));
            }
        }
    }

    out
}

pub fn render_explain(outcome: &Outcome) -> String {
    let mut out = render_standard(outcome);
    out.push_str(&format!("  phase0: decision={:?} type={:?} risk={:.2}\n", outcome.phase0.decision, outcome.phase0.modification_type, outcome.phase0.pre_risk));
    out.push_str(&format!("    rationale: {}\n", outcome.phase0.rationale));

    let Some(assessment) = &outcome.investigation else {
        out.push_str("  no Phase 2 investigation ran for this file\n");
        return out;
    };

    out.push_str("  hop trace:\n");
    for hop in &assessment.hop_trace {
        let truncated: String = hop.narrative_excerpt.chars().take(EXPLAIN_RESPONSE_TRUNCATE).collect();
        out.push_str(&format!(
            "    hop {}: {} ({} ms, {} tokens)\n",
            hop.hop, truncated, hop.duration_ms, hop.tokens
        ));
        if !hop.nodes_visited.is_empty() {
            out.push_str(&format!("      nodes visited: {}\n", hop.nodes_visited.join(", ")));
        }
        if !hop.edges_traversed.is_empty() {
            out.push_str(&format!("      edges traversed: {}\n", hop.edges_traversed.join(", ")));
        }
        if let Some(c) = hop.confidence {
            out.push_str(&format!("      confidence: {c:.2}\n"));
        }
    }

    if !assessment.breakthroughs.is_empty() {
        out.push_str("  breakthroughs:\n");
        for bt in &assessment.breakthroughs {
            let direction = if bt.is_escalation { "escalated" } else { "de-escalated" };
            out.push_str(&format!(
                "    hop {}: {direction} {} -> {} ({})\n",
                bt.hop, bt.level_before, bt.level_after, bt.trigger
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use changerisk_core::types::{ModificationType, Phase0Decision, Phase0Result, RiskLevel};

    fn minimal_outcome() -> Outcome {
        Outcome {
            file: "src/lib.rs".into(),
            risk_level: RiskLevel::Low,
            risk_score: 0.15,
            confidence: None,
            phase0: Phase0Result {
                decision: Phase0Decision::Normal,
                modification_type: ModificationType::Structural,
                pre_risk: 0.1,
                rationale: "structural change".into(),
            },
            phase1: None,
            investigation: None,
        }
    }

    #[test]
    fn quiet_is_at_most_three_lines() {
        let out = render_quiet(&minimal_outcome());
        assert!(out.lines().count() <= 3);
        assert!(out.contains("LOW"));
    }

    #[test]
    fn standard_handles_missing_phase1_and_phase2_gracefully() {
        let out = render_standard(&minimal_outcome());
        assert!(out.contains("src/lib.rs"));
        assert!(!out.contains("investigation:"));
    }

    #[test]
    fn explain_notes_absence_of_phase2() {
        let out = render_explain(&minimal_outcome());
        assert!(out.contains("no Phase 2 investigation"));
    }
}
