use std::sync::Arc;

use changerisk_core::model::{FileRecord, Incident, IncidentFileLink, Repository, Severity};
use changerisk_graph::{model, EdgeKind, GraphAdapter, IGraphReader};
use changerisk_relational::RelationalStore;
use chrono::Utc;
use uuid::Uuid;

fn seeded() -> (Arc<RelationalStore>, GraphAdapter, Uuid) {
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
    let adapter = GraphAdapter::new(relational.clone());
    (relational, adapter, repo_id)
}

#[test]
fn upsert_file_without_relational_row_is_refused() {
    let (_relational, adapter, repo_id) = seeded();
    let orphan = FileRecord {
        repo_id,
        path: "src/never_inserted.rs".into(),
        language: Some("rust".into()),
        historical_paths: Vec::new(),
        live: true,
    };
    let err = adapter.upsert_file(&orphan).unwrap_err();
    assert!(err.to_string().contains("no relational row"));
}

#[test]
fn upsert_file_is_idempotent_merge() {
    let (relational, adapter, repo_id) = seeded();
    let file = FileRecord {
        repo_id,
        path: "src/lib.rs".into(),
        language: Some("rust".into()),
        historical_paths: Vec::new(),
        live: true,
    };
    relational.upsert_file(&file).unwrap();
    adapter.upsert_file(&file).unwrap();
    adapter.upsert_file(&file).unwrap();
    assert_eq!(adapter.node_count(), 1);
}

#[test]
fn direct_importers_count_reflects_incoming_imports_edges() {
    let (relational, adapter, repo_id) = seeded();
    for path in ["src/lib.rs", "src/a.rs", "src/b.rs"] {
        let file = FileRecord {
            repo_id,
            path: path.into(),
            language: Some("rust".into()),
            historical_paths: Vec::new(),
            live: true,
        };
        relational.upsert_file(&file).unwrap();
        adapter.upsert_file(&file).unwrap();
    }
    adapter.upsert_import_edge(repo_id, "src/a.rs", "src/lib.rs").unwrap();
    adapter.upsert_import_edge(repo_id, "src/b.rs", "src/lib.rs").unwrap();

    let count = adapter.direct_importers_count(&repo_id.to_string(), "src/lib.rs").unwrap();
    assert_eq!(count, 2);
}

#[test]
fn mirror_incident_requires_relational_row_then_links_caused_by() {
    let (relational, adapter, repo_id) = seeded();
    let file = FileRecord {
        repo_id,
        path: "src/billing.rs".into(),
        language: Some("rust".into()),
        historical_paths: Vec::new(),
        live: true,
    };
    relational.upsert_file(&file).unwrap();
    adapter.upsert_file(&file).unwrap();

    let incident = Incident {
        id: Uuid::new_v4(),
        repo_id,
        title: "double charge".into(),
        description: "idempotency bug".into(),
        severity: Severity::High,
        occurred_at: Utc::now(),
        resolved_at: None,
        root_cause: None,
    };
    assert!(adapter.mirror_incident(&incident).is_err());

    relational.insert_incident(&incident).unwrap();
    relational
        .link_incident_file(&IncidentFileLink {
            incident_id: incident.id,
            file_path: file.path.clone(),
            line_number: None,
            function: None,
            confidence: IncidentFileLink::DEFAULT_HUMAN_CONFIDENCE,
        })
        .unwrap();
    adapter.mirror_incident(&incident).unwrap();

    let linked = adapter
        .link_incident_file(repo_id, &incident.id.to_string(), &file.path)
        .unwrap();
    assert!(linked);

    let caused_by = adapter
        .neighbors_out(&model::incident_key(&incident.id.to_string()), EdgeKind::CausedBy)
        .unwrap();
    assert_eq!(caused_by.len(), 1);
}

#[test]
fn remove_incident_drops_node_and_caused_by_edge() {
    let (relational, adapter, repo_id) = seeded();
    let file = FileRecord {
        repo_id,
        path: "src/billing.rs".into(),
        language: Some("rust".into()),
        historical_paths: Vec::new(),
        live: true,
    };
    relational.upsert_file(&file).unwrap();
    adapter.upsert_file(&file).unwrap();

    let incident = Incident {
        id: Uuid::new_v4(),
        repo_id,
        title: "double charge".into(),
        description: "idempotency bug".into(),
        severity: Severity::High,
        occurred_at: Utc::now(),
        resolved_at: None,
        root_cause: None,
    };
    relational.insert_incident(&incident).unwrap();
    adapter.mirror_incident(&incident).unwrap();
    adapter
        .link_incident_file(repo_id, &incident.id.to_string(), &file.path)
        .unwrap();

    let before = adapter.node_count();
    assert!(adapter.remove_incident(&incident.id.to_string()));
    assert_eq!(adapter.node_count(), before - 1);

    let key = model::incident_key(&incident.id.to_string());
    assert!(adapter.fetch_nodes(&[key]).unwrap().is_empty());

    let importers_query_target = model::file_key(repo_id, &file.path);
    assert!(adapter.neighbors_in(&importers_query_target, EdgeKind::CausedBy).unwrap().is_empty());
}

#[test]
fn remove_incident_on_unknown_id_is_a_no_op() {
    let (_relational, adapter, _repo_id) = seeded();
    assert!(!adapter.remove_incident(&Uuid::new_v4().to_string()));
}
