//! Hop and synthesis prompt construction. Hops are themed (spec §4.8 step 2):
//! hop 1 touches immediate neighbors, hop 2 ranks what hop 1 found, hop 3+
//! chases deeper context and resolves ambiguity.

use crate::evidence::PreHopEvidence;

const PRIOR_RESPONSE_TRUNCATE: usize = 600;

pub fn hop_theme(hop: u32) -> &'static str {
    match hop {
        1 => "immediate neighbors: structural coupling, co-change partners, and directly linked incidents",
        2 => "second-order ranking: of the risky neighbors surfaced so far, which matter most and why",
        _ => "deeper context and ambiguity resolution: anything still unexplained about this change's blast radius",
    }
}

pub fn build_hop_prompt(
    hop: u32,
    file_path: &str,
    change_summary: &str,
    evidence: &PreHopEvidence,
    evidence_chain: &[String],
    prior_responses: &[String],
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Investigating change risk for `{file_path}`.\n"));
    out.push_str(&format!("Change: {change_summary}\n"));
    out.push_str(&format!("Hop {hop}: {}\n\n", hop_theme(hop)));

    out.push_str(&format!(
        "Baseline evidence: {} co-change partners, {} direct importers, {} incidents ({} in last 30 days).\n",
        evidence.co_changed.len(),
        evidence.direct_neighbors_count,
        evidence.incident_stats.total,
        evidence.incident_stats.last_30d,
    ));
    if !evidence.recent_incident_titles.is_empty() {
        out.push_str(&format!("Recent incidents: {}\n", evidence.recent_incident_titles.join("; ")));
    }

    if !evidence_chain.is_empty() {
        out.push_str("\nEvidence chain so far:\n");
        for (i, e) in evidence_chain.iter().enumerate() {
            out.push_str(&format!("  {}. {e}\n", i + 1));
        }
    }

    if let Some(prior) = prior_responses.last() {
        let truncated: String = prior.chars().take(PRIOR_RESPONSE_TRUNCATE).collect();
        out.push_str(&format!("\nPrevious hop response (truncated): {truncated}\n"));
    }

    out.push_str("\nRespond with a short narrative identifying any files or edge types relevant to this change's risk.");
    out
}

pub fn build_confidence_prompt(evidence_chain: &[String]) -> String {
    let mut out = String::from(
        "Given the evidence gathered so far, assess your confidence in the current risk assessment.\n\
         Respond as JSON: {\"confidence\": <0..1>, \"reasoning\": \"...\", \"next_action\": \"GATHER_MORE_EVIDENCE\" | \"FINALIZE\"}.\n\n",
    );
    for (i, e) in evidence_chain.iter().enumerate() {
        out.push_str(&format!("  {}. {e}\n", i + 1));
    }
    out
}

pub fn build_synthesis_prompt(file_path: &str, evidence_chain: &[String]) -> String {
    let mut out = format!(
        "Summarize the investigation of `{file_path}` into a risk assessment.\n\
         Respond as JSON: {{\"level\": \"LOW\"|\"MEDIUM\"|\"HIGH\"|\"CRITICAL\", \"score\": <0..1>, \
         \"recommendations\": [{{\"action\": \"...\", \"priority\": \"critical\"|\"high\"|\"medium\"|\"low\", \
         \"auto_fixable\": bool, \"est_minutes\": <int>}}]}}.\n\nEvidence:\n"
    );
    for (i, e) in evidence_chain.iter().enumerate() {
        out.push_str(&format!("  {}. {e}\n", i + 1));
    }
    out
}
