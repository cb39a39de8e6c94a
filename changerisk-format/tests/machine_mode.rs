use changerisk_core::types::{ModificationType, Phase0Decision, Phase0Result, Outcome, RiskLevel};
use changerisk_format::{render, RenderMode};

fn skip_outcome() -> Outcome {
    Outcome {
        file: "README.md".into(),
        risk_level: RiskLevel::Minimal,
        risk_score: 0.0,
        confidence: None,
        phase0: Phase0Result {
            decision: Phase0Decision::Skip,
            modification_type: ModificationType::Documentation,
            pre_risk: 0.05,
            rationale: "documentation-only change".into(),
        },
        phase1: None,
        investigation: None,
    }
}

#[test]
fn skip_outcome_omits_phase1_and_investigation_fields() {
    let json = render(&skip_outcome(), RenderMode::Machine).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["phase0"]["decision"], "SKIP");
    assert_eq!(value["risk_level"], "MINIMAL");
    assert!(value.get("phase1").is_none());
    assert!(value.get("confidence").is_none());
    assert!(value.get("investigation_trace").is_none());
    assert!(value.get("stats").is_none());
}

#[test]
fn quiet_mode_is_short() {
    let text = render(&skip_outcome(), RenderMode::Quiet).unwrap();
    assert!(text.lines().count() <= 3);
}
