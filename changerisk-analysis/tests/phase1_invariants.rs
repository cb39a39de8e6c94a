use changerisk_analysis::{evaluate_phase1, RawMetrics};
use changerisk_core::types::ThresholdProfile;
use proptest::prelude::*;

const PROFILE: ThresholdProfile = ThresholdProfile {
    name: "default",
    coupling_threshold: 10.0,
    co_change_threshold: 0.5,
    test_ratio_threshold: 0.4,
};

proptest! {
    /// escalate ⇒ at least one metric actually crossed its threshold.
    #[test]
    fn escalate_implies_metric_crossed(
        coupling in 0.0f64..50.0,
        co_change in 0.0f64..1.0,
        test_ratio in 0.0f64..1.0,
        incidents in 0u32..5,
    ) {
        let result = evaluate_phase1(
            RawMetrics { coupling, co_change, test_ratio, incident_count_30d: incidents },
            &PROFILE,
        );
        if result.escalate {
            let crossed = coupling > PROFILE.coupling_threshold
                || co_change > PROFILE.co_change_threshold
                || test_ratio < PROFILE.test_ratio_threshold
                || incidents > 0;
            prop_assert!(crossed);
        }
    }

    /// score and level are always consistent with the monotone band function.
    #[test]
    fn level_is_always_band_of_score(
        coupling in 0.0f64..50.0,
        co_change in 0.0f64..1.0,
        test_ratio in 0.0f64..1.0,
        incidents in 0u32..5,
    ) {
        let result = evaluate_phase1(
            RawMetrics { coupling, co_change, test_ratio, incident_count_30d: incidents },
            &PROFILE,
        );
        prop_assert_eq!(result.level, changerisk_core::types::RiskLevel::from_score(result.score));
        prop_assert!(result.score >= 0.0 && result.score <= 1.0);
    }
}
