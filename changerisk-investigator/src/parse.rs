//! Narrative and structured-response parsing. Every parser here degrades to
//! a heuristic or a no-op on malformed input rather than failing the hop
//! (spec §4.8 step 5, §7 `ParseError` is silent).

use std::sync::OnceLock;

use changerisk_core::types::{NextAction, RecommendationPriority, Recommendation, RiskLevel};
use regex::Regex;
use serde::Deserialize;

fn file_mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[\w./-]+\.(?:rs|py|ts|tsx|js|jsx|go|java|rb|toml|yaml|yml|json|env)\b").unwrap())
}

fn score_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)risk\s*score[:\s]+([01](?:\.\d+)?)").unwrap())
}

const EDGE_NAMES: &[&str] = &["CONTAINS", "IMPORTS", "AUTHORED", "MODIFIES", "CREATED_BLOCK", "MODIFIED_BLOCK", "CO_CHANGED", "CAUSED_BY"];

/// File-path-like tokens mentioned in a hop narrative, deduplicated,
/// preserving first-seen order.
pub fn extract_file_mentions(narrative: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    file_mention_re()
        .find_iter(narrative)
        .map(|m| m.as_str().to_string())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Named edge types the narrative explicitly mentions (case-insensitive).
pub fn extract_edge_mentions(narrative: &str) -> Vec<&'static str> {
    let upper = narrative.to_uppercase();
    EDGE_NAMES.iter().copied().filter(|name| upper.contains(name)).collect()
}

/// Spec §9 open question, resolved: the extractor parses an explicit
/// "risk score: X" token when the narrative contains one; otherwise the
/// score is left unchanged for this hop. Conservative, but still lets a
/// scripted or well-behaved model move the score.
pub fn extract_score(narrative: &str) -> Option<f64> {
    score_token_re()
        .captures(narrative)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|v| v.clamp(0.0, 1.0))
}

#[derive(Debug, Clone)]
pub struct ConfidenceAssessment {
    pub confidence: f64,
    pub reasoning: String,
    pub next_action: NextAction,
}

#[derive(Deserialize)]
struct RawConfidence {
    confidence: f64,
    reasoning: String,
    next_action: String,
}

/// Strict JSON parse first; on any failure, a keyword heuristic over the raw
/// text (spec §4.8 step 5): "critical"/"production outage" implies high
/// confidence that things are bad, two or more low-risk phrases implies high
/// confidence things are fine, otherwise a middling 0.5.
pub fn parse_confidence(text: &str) -> ConfidenceAssessment {
    if let Some(obj) = extract_json_object(text) {
        if let Ok(raw) = serde_json::from_str::<RawConfidence>(&obj) {
            let next_action = match raw.next_action.to_uppercase().as_str() {
                "FINALIZE" => NextAction::Finalize,
                _ => NextAction::GatherMoreEvidence,
            };
            return ConfidenceAssessment {
                confidence: raw.confidence.clamp(0.0, 1.0),
                reasoning: raw.reasoning,
                next_action,
            };
        }
    }

    let lower = text.to_lowercase();
    let low_risk_phrases = ["low risk", "no concern", "looks safe", "minimal impact", "well tested"];
    let low_risk_hits = low_risk_phrases.iter().filter(|p| lower.contains(*p)).count();

    let confidence = if lower.contains("critical") || lower.contains("production outage") {
        0.9
    } else if low_risk_hits >= 2 {
        0.9
    } else {
        0.5
    };

    ConfidenceAssessment {
        confidence,
        reasoning: "parsed via keyword heuristic after structured parse failure".to_string(),
        next_action: NextAction::GatherMoreEvidence,
    }
}

#[derive(Deserialize)]
struct RawRecommendation {
    action: String,
    priority: String,
    auto_fixable: bool,
    est_minutes: u32,
}

#[derive(Deserialize)]
struct RawSynthesis {
    level: String,
    score: f64,
    #[serde(default)]
    recommendations: Vec<RawRecommendation>,
}

pub struct ParsedSynthesis {
    pub level: RiskLevel,
    pub score: f64,
    pub recommendations: Vec<Recommendation>,
}

/// Parses the synthesis JSON if present; falls back to the caller-supplied
/// score/level (derived from `current_risk_score`) with no recommendations.
pub fn parse_synthesis(text: &str, fallback_score: f64) -> ParsedSynthesis {
    if let Some(obj) = extract_json_object(text) {
        if let Ok(raw) = serde_json::from_str::<RawSynthesis>(&obj) {
            let score = raw.score.clamp(0.0, 1.0);
            let level = parse_level(&raw.level).unwrap_or_else(|| RiskLevel::from_score(score));
            let recommendations = raw
                .recommendations
                .into_iter()
                .map(|r| Recommendation {
                    action: r.action,
                    priority: parse_priority(&r.priority),
                    auto_fixable: r.auto_fixable,
                    est_minutes: r.est_minutes,
                })
                .collect();
            return ParsedSynthesis { level, score, recommendations };
        }
    }

    ParsedSynthesis {
        level: RiskLevel::from_score(fallback_score),
        score: fallback_score,
        recommendations: Vec::new(),
    }
}

fn parse_level(s: &str) -> Option<RiskLevel> {
    match s.to_uppercase().as_str() {
        "MINIMAL" => Some(RiskLevel::Minimal),
        "LOW" => Some(RiskLevel::Low),
        "MEDIUM" => Some(RiskLevel::Medium),
        "HIGH" => Some(RiskLevel::High),
        "CRITICAL" => Some(RiskLevel::Critical),
        _ => None,
    }
}

fn parse_priority(s: &str) -> RecommendationPriority {
    match s.to_lowercase().as_str() {
        "critical" => RecommendationPriority::Critical,
        "high" => RecommendationPriority::High,
        "low" => RecommendationPriority::Low,
        _ => RecommendationPriority::Medium,
    }
}

/// Pulls the first balanced `{...}` span out of a response that may wrap its
/// JSON in prose. Returns `None` if no balanced span is found.
fn extract_json_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let mut depth = 0i32;
    for (i, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_file_mentions_dedupes_and_preserves_order() {
        let narrative = "touches src/auth/routes.py and src/auth/utils.py, also src/auth/routes.py again";
        let found = extract_file_mentions(narrative);
        assert_eq!(found, vec!["src/auth/routes.py", "src/auth/utils.py"]);
    }

    #[test]
    fn extract_edge_mentions_is_case_insensitive() {
        let found = extract_edge_mentions("this file co_changed with another and imports a third");
        assert!(found.contains(&"CO_CHANGED"));
        assert!(found.contains(&"IMPORTS"));
    }

    #[test]
    fn extract_score_reads_explicit_token() {
        assert_eq!(extract_score("updated risk score: 0.75 based on new evidence"), Some(0.75));
        assert_eq!(extract_score("no score mentioned here"), None);
    }

    #[test]
    fn parse_confidence_prefers_strict_json() {
        let text = r#"{"confidence": 0.92, "reasoning": "clear signal", "next_action": "FINALIZE"}"#;
        let parsed = parse_confidence(text);
        assert_eq!(parsed.confidence, 0.92);
        assert_eq!(parsed.next_action, NextAction::Finalize);
    }

    #[test]
    fn parse_confidence_falls_back_to_heuristic_on_bad_json() {
        let parsed = parse_confidence("this touches a critical production outage path, not valid json");
        assert_eq!(parsed.confidence, 0.9);
    }

    #[test]
    fn parse_confidence_falls_back_to_low_risk_phrases() {
        let parsed = parse_confidence("looks safe, minimal impact, no concern here");
        assert_eq!(parsed.confidence, 0.9);
    }

    #[test]
    fn parse_confidence_falls_back_to_middling_default() {
        let parsed = parse_confidence("unclear, could go either way");
        assert_eq!(parsed.confidence, 0.5);
    }

    #[test]
    fn parse_synthesis_falls_back_when_unparsable() {
        let parsed = parse_synthesis("not json at all", 0.55);
        assert_eq!(parsed.score, 0.55);
        assert_eq!(parsed.level, RiskLevel::Medium);
        assert!(parsed.recommendations.is_empty());
    }

    #[test]
    fn parse_synthesis_reads_embedded_json() {
        let text = r#"Summary follows:
        {"level": "HIGH", "score": 0.7, "recommendations": [
            {"action": "add tests", "priority": "high", "auto_fixable": false, "est_minutes": 30}
        ]}"#;
        let parsed = parse_synthesis(text, 0.1);
        assert_eq!(parsed.level, RiskLevel::High);
        assert_eq!(parsed.score, 0.7);
        assert_eq!(parsed.recommendations.len(), 1);
        assert_eq!(parsed.recommendations[0].priority, RecommendationPriority::High);
    }
}
