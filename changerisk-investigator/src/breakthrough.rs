//! Breakthrough detection (spec §4.8 step 6, §9 open question): the
//! before/after pair recorded here must correspond to the score change the
//! *current* hop produced, so the score update happens first and this is
//! called with both the old and new score from the same hop.

use changerisk_core::types::{Breakthrough, RiskLevel};

pub fn detect(
    hop: u32,
    score_before: f64,
    level_before: RiskLevel,
    score_after: f64,
    level_after: RiskLevel,
    threshold: f64,
    trigger: &str,
    reason: &str,
) -> Option<Breakthrough> {
    if level_after == level_before {
        return None;
    }
    let delta = (score_after - score_before).abs();
    if delta < threshold {
        return None;
    }
    Some(Breakthrough {
        hop,
        risk_before: score_before,
        risk_after: score_after,
        level_before,
        level_after,
        trigger: trigger.to_string(),
        reason: reason.to_string(),
        is_escalation: score_after > score_before,
    })
}
