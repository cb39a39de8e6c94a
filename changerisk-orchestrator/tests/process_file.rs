use std::sync::Arc;

use async_trait::async_trait;
use changerisk_core::config::InvestigatorConfig;
use changerisk_core::errors::RiskResult;
use changerisk_core::model::{FileRecord, Repository};
use changerisk_core::types::{Phase0Decision, RepoMetadata, RiskLevel};
use changerisk_graph::GraphAdapter;
use changerisk_incidents::IncidentStore;
use changerisk_investigator::llm::{LlmClient, LlmResponse};
use changerisk_investigator::Investigator;
use changerisk_orchestrator::{FileInput, Orchestrator};
use changerisk_relational::RelationalStore;
use uuid::Uuid;

struct ScriptedLlm;

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn query(&self, prompt: &str) -> RiskResult<LlmResponse> {
        if prompt.contains("confidence") {
            Ok(LlmResponse {
                text: r#"{"confidence": 0.95, "reasoning": "clear signal", "next_action": "FINALIZE"}"#.into(),
                tokens: 20,
            })
        } else if prompt.contains("Summarize") {
            Ok(LlmResponse {
                text: r#"{"level": "HIGH", "score": 0.7, "recommendations": []}"#.into(),
                tokens: 20,
            })
        } else {
            Ok(LlmResponse { text: "this file touches authentication paths".into(), tokens: 30 })
        }
    }

    fn set_model(&self, _model: &str) -> RiskResult<()> {
        Ok(())
    }
}

fn seeded() -> (Orchestrator, Uuid) {
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

    let investigator = Arc::new(Investigator::new(
        Arc::new(ScriptedLlm),
        relational.clone(),
        incidents.clone(),
        graph.clone(),
        InvestigatorConfig::default(),
    ));

    let orchestrator = Orchestrator::new(relational, graph, incidents, investigator, InvestigatorConfig::default(), true);
    (orchestrator, repo_id)
}

#[tokio::test]
async fn readme_only_change_skips_without_investigation() {
    let (orchestrator, repo_id) = seeded();
    let input = FileInput {
        repo_id,
        path: "README.md".into(),
        diff: "+## Dev Setup".into(),
        language: Some("markdown".into()),
        test_ratio: 0.0,
    };
    let outcome = orchestrator.process_file(&input, &RepoMetadata::default()).await;
    assert_eq!(outcome.phase0.decision, Phase0Decision::Skip);
    assert_eq!(outcome.risk_level, RiskLevel::Low);
    assert!(outcome.investigation.is_none());
}

#[tokio::test]
async fn security_path_force_escalates_and_runs_investigation() {
    let (orchestrator, repo_id) = seeded();
    let input = FileInput {
        repo_id,
        path: "src/auth/routes.py".into(),
        diff: "+ # TODO: add session timeout".into(),
        language: Some("python".into()),
        test_ratio: 0.2,
    };
    let outcome = orchestrator.process_file(&input, &RepoMetadata::default()).await;
    assert_eq!(outcome.phase0.decision, Phase0Decision::ForceEscalate);
    assert!(outcome.phase1.as_ref().unwrap().escalate);
    assert!(outcome.investigation.is_some());
    assert!(matches!(outcome.risk_level, RiskLevel::High | RiskLevel::Critical));
}
