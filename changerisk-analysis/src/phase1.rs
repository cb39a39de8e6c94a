//! Phase 1 baseline engine (C7): graph-derived metrics banded against a
//! threshold profile, weighted into a score, with an escalation flag
//! (spec §4.7). Target latency <200ms — no LLM calls here.

use changerisk_core::constants::{WEIGHT_COCHANGE, WEIGHT_COUPLING, WEIGHT_TEST_GAP};
use changerisk_core::types::{MetricBand, Phase1Metrics, Phase1Result, RiskLevel, ThresholdProfile};

/// Raw metrics sourced from C1 (coupling) and C2/C3 (co-change, test-ratio,
/// incident count) before banding.
#[derive(Debug, Clone, Copy)]
pub struct RawMetrics {
    pub coupling: f64,
    pub co_change: f64,
    pub test_ratio: f64,
    pub incident_count_30d: u32,
}

fn classify_metric(value: f64, threshold: f64, inverse: bool) -> MetricBand {
    let half = threshold / 2.0;
    if inverse {
        if value >= threshold {
            MetricBand::Low
        } else if value >= half {
            MetricBand::Medium
        } else {
            MetricBand::High
        }
    } else if value <= half {
        MetricBand::Low
    } else if value <= threshold {
        MetricBand::Medium
    } else {
        MetricBand::High
    }
}

fn band_weight(band: MetricBand) -> f64 {
    match band {
        MetricBand::Low => 0.15,
        MetricBand::Medium => 0.5,
        MetricBand::High => 0.9,
    }
}

pub fn evaluate(raw: RawMetrics, profile: &ThresholdProfile) -> Phase1Result {
    let coupling_band = classify_metric(raw.coupling, profile.coupling_threshold, false);
    let co_change_band = classify_metric(raw.co_change, profile.co_change_threshold, false);
    let test_ratio_band = classify_metric(raw.test_ratio, profile.test_ratio_threshold, true);

    let score = WEIGHT_COUPLING * band_weight(coupling_band)
        + WEIGHT_COCHANGE * band_weight(co_change_band)
        + WEIGHT_TEST_GAP * band_weight(test_ratio_band);
    let score = score.clamp(0.0, 1.0);
    let level = RiskLevel::from_score(score);

    let mut reasons = Vec::new();
    let coupling_over = raw.coupling > profile.coupling_threshold;
    let co_change_over = raw.co_change > profile.co_change_threshold;
    let test_ratio_under = raw.test_ratio < profile.test_ratio_threshold;
    let has_recent_incidents = raw.incident_count_30d > 0;

    if coupling_over {
        reasons.push(format!(
            "coupling {} exceeds threshold {} (profile {})",
            raw.coupling, profile.coupling_threshold, profile.name
        ));
    }
    if co_change_over {
        reasons.push(format!(
            "co-change frequency {:.2} exceeds threshold {:.2}",
            raw.co_change, profile.co_change_threshold
        ));
    }
    if test_ratio_under {
        reasons.push(format!(
            "test ratio {:.2} is below threshold {:.2}",
            raw.test_ratio, profile.test_ratio_threshold
        ));
    }
    if has_recent_incidents {
        reasons.push(format!("{} incident(s) in the last 30 days", raw.incident_count_30d));
    }
    if reasons.is_empty() {
        reasons.push("all baseline metrics within profile bands".into());
    }

    let escalate = coupling_over || co_change_over || test_ratio_under || has_recent_incidents;

    Phase1Result {
        score,
        level,
        escalate,
        reasons,
        metrics: Phase1Metrics {
            coupling: raw.coupling,
            coupling_band,
            co_change: raw.co_change,
            co_change_band,
            test_ratio: raw.test_ratio,
            test_ratio_band,
            incident_count_30d: raw.incident_count_30d,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: ThresholdProfile = ThresholdProfile {
        name: "default",
        coupling_threshold: 10.0,
        co_change_threshold: 0.5,
        test_ratio_threshold: 0.4,
    };

    #[test]
    fn escalates_when_coupling_exceeds_threshold() {
        let result = evaluate(
            RawMetrics { coupling: 11.0, co_change: 0.1, test_ratio: 0.8, incident_count_30d: 0 },
            &PROFILE,
        );
        assert!(result.escalate);
        assert!(result.reasons.iter().any(|r| r.contains("coupling")));
    }

    #[test]
    fn escalates_on_any_recent_incident_regardless_of_other_metrics() {
        let result = evaluate(
            RawMetrics { coupling: 1.0, co_change: 0.0, test_ratio: 0.9, incident_count_30d: 1 },
            &PROFILE,
        );
        assert!(result.escalate);
    }

    #[test]
    fn no_escalation_when_everything_is_within_band() {
        let result = evaluate(
            RawMetrics { coupling: 2.0, co_change: 0.1, test_ratio: 0.9, incident_count_30d: 0 },
            &PROFILE,
        );
        assert!(!result.escalate);
        assert_eq!(result.metrics.coupling_band, MetricBand::Low);
        assert_eq!(result.metrics.test_ratio_band, MetricBand::Low);
    }

    #[test]
    fn score_is_in_unit_interval_and_level_matches_band() {
        let result = evaluate(
            RawMetrics { coupling: 20.0, co_change: 0.9, test_ratio: 0.05, incident_count_30d: 3 },
            &PROFILE,
        );
        assert!((0.0..=1.0).contains(&result.score));
        assert_eq!(result.level, RiskLevel::from_score(result.score));
    }

    #[test]
    fn low_test_ratio_bands_as_high_risk_due_to_inverse_classification() {
        let result = evaluate(
            RawMetrics { coupling: 1.0, co_change: 0.0, test_ratio: 0.05, incident_count_30d: 0 },
            &PROFILE,
        );
        assert_eq!(result.metrics.test_ratio_band, MetricBand::High);
    }
}
