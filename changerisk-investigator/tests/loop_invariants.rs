use std::sync::Arc;

use async_trait::async_trait;
use changerisk_core::config::InvestigatorConfig;
use changerisk_core::errors::RiskResult;
use changerisk_core::model::{FileRecord, Repository};
use changerisk_core::types::StoppingReason;
use changerisk_graph::GraphAdapter;
use changerisk_incidents::IncidentStore;
use changerisk_investigator::llm::{LlmClient, LlmResponse};
use changerisk_investigator::{ChangeContext, Investigator};
use changerisk_relational::RelationalStore;
use proptest::prelude::*;
use uuid::Uuid;

/// Always reports the same fixed confidence regardless of hop, so the loop
/// only ever stops on high-confidence or max-hops.
struct FixedConfidenceLlm {
    confidence: f64,
}

#[async_trait]
impl LlmClient for FixedConfidenceLlm {
    async fn query(&self, prompt: &str) -> RiskResult<LlmResponse> {
        if prompt.contains("confidence") {
            Ok(LlmResponse {
                text: format!(
                    r#"{{"confidence": {:.2}, "reasoning": "scripted", "next_action": "GATHER_MORE_EVIDENCE"}}"#,
                    self.confidence
                ),
                tokens: 10,
            })
        } else if prompt.contains("Summarize") {
            Ok(LlmResponse {
                text: r#"{"level": "MEDIUM", "score": 0.5, "recommendations": []}"#.into(),
                tokens: 10,
            })
        } else {
            Ok(LlmResponse { text: "no unusual coupling found".into(), tokens: 10 })
        }
    }

    fn set_model(&self, _model: &str) -> RiskResult<()> {
        Ok(())
    }
}

fn seeded() -> (Arc<RelationalStore>, Arc<IncidentStore>, Arc<GraphAdapter>, Uuid) {
    let relational = Arc::new(RelationalStore::open_in_memory().unwrap());
    let repo_id = Uuid::new_v4();
    relational
        .upsert_repository(&Repository {
            id: repo_id,
            owner: "acme".into(),
            name: "widgets".into(),
            full_name: "acme/widgets".into(),
            default_branch: "main".into(),
        })
        .unwrap();
    let file = FileRecord {
        repo_id,
        path: "src/auth/routes.py".into(),
        language: Some("python".into()),
        historical_paths: Vec::new(),
        live: true,
    };
    relational.upsert_file(&file).unwrap();
    let graph = Arc::new(GraphAdapter::new(relational.clone()));
    graph.upsert_file(&file).unwrap();
    let incidents = Arc::new(IncidentStore::new(relational.clone(), graph.clone()));
    (relational, incidents, graph, repo_id)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Whatever confidence value hops report, `confidence_history` never
    /// exceeds `max_hops`, and `StoppingReason::HighConfidence` is only ever
    /// recorded when the last reported confidence actually met the
    /// configured threshold.
    #[test]
    fn confidence_history_bounded_and_stopping_reason_consistent(
        confidence in 0.0f64..1.0,
        max_hops in 1u32..5,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (relational, incidents, graph, repo_id) = seeded();
        let llm = Arc::new(FixedConfidenceLlm { confidence });
        let config = InvestigatorConfig { max_hops: Some(max_hops), ..Default::default() };
        let investigator = Investigator::new(llm, relational, incidents, graph, config);
        let ctx = ChangeContext {
            repo_id,
            file_path: "src/auth/routes.py".into(),
            change_summary: "refactor".into(),
            baseline_score: 0.4,
            baseline_reasons: vec!["baseline".into()],
        };

        let result = rt.block_on(investigator.investigate(&ctx));
        let assessment = match result {
            Ok(a) => a,
            Err(_) => return Ok(()),
        };

        prop_assert!(assessment.confidence_history.len() as u32 <= max_hops);

        if assessment.stats.stopping_reason == StoppingReason::HighConfidence {
            let last = assessment.confidence_history.last().unwrap().confidence;
            prop_assert!(last >= changerisk_core::constants::DEFAULT_CONFIDENCE_THRESHOLD);
        }
    }
}
