use changerisk_core::model::{
    Incident, IncidentFileLink, IncidentSearchFilters, Repository, Severity,
};
use changerisk_relational::RelationalStore;
use chrono::Utc;
use uuid::Uuid;

fn seeded_store() -> (RelationalStore, Uuid) {
    let store = RelationalStore::open_in_memory().unwrap();
    let repo_id = Uuid::new_v4();
    store
        .upsert_repository(&Repository {
            id: repo_id,
            owner: "acme".into(),
            name: "widgets".into(),
            full_name: "acme/widgets".into(),
            default_branch: "main".into(),
        })
        .unwrap();
    (store, repo_id)
}

#[test]
fn search_after_link_finds_incident_by_title() {
    let (store, repo_id) = seeded_store();
    let incident = Incident {
        id: Uuid::new_v4(),
        repo_id,
        title: "payment webhook double charges customers".into(),
        description: "retry logic resent already-processed webhooks".into(),
        severity: Severity::High,
        occurred_at: Utc::now(),
        resolved_at: None,
        root_cause: Some("missing idempotency key check".into()),
    };
    store.insert_incident(&incident).unwrap();
    store
        .link_incident_file(&IncidentFileLink {
            incident_id: incident.id,
            file_path: "src/billing/webhook.rs".into(),
            line_number: Some(42),
            function: Some("handle_webhook".into()),
            confidence: IncidentFileLink::DEFAULT_HUMAN_CONFIDENCE,
        })
        .unwrap();

    let results = store
        .search_incidents(
            &repo_id.to_string(),
            "webhook",
            &IncidentSearchFilters::default(),
            10,
        )
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].incident.id, incident.id);
    assert_eq!(results[0].linked_files, vec!["src/billing/webhook.rs".to_string()]);
}

#[test]
fn search_respects_severity_filter() {
    let (store, repo_id) = seeded_store();
    for (title, severity) in [("low sev bug", Severity::Low), ("critical outage", Severity::Critical)] {
        let incident = Incident {
            id: Uuid::new_v4(),
            repo_id,
            title: title.into(),
            description: "shared keyword incident".into(),
            severity,
            occurred_at: Utc::now(),
            resolved_at: None,
            root_cause: None,
        };
        store.insert_incident(&incident).unwrap();
    }

    let filters = IncidentSearchFilters {
        severity: Some(Severity::Critical),
        since: None,
    };
    let results = store
        .search_incidents(&repo_id.to_string(), "incident", &filters, 10)
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].incident.severity, Severity::Critical);
}

#[test]
fn deleting_incident_cascades_links_and_leaves_stats_unchanged() {
    let (store, repo_id) = seeded_store();
    let file_path = "src/lib.rs";
    let before = store.incident_stats(&repo_id.to_string(), file_path).unwrap();

    let incident = Incident {
        id: Uuid::new_v4(),
        repo_id,
        title: "transient spike".into(),
        description: "noise".into(),
        severity: Severity::Low,
        occurred_at: Utc::now(),
        resolved_at: None,
        root_cause: None,
    };
    store.insert_incident(&incident).unwrap();
    store
        .link_incident_file(&IncidentFileLink {
            incident_id: incident.id,
            file_path: file_path.into(),
            line_number: None,
            function: None,
            confidence: 0.5,
        })
        .unwrap();
    store.delete_incident(&incident.id.to_string()).unwrap();

    let after = store.incident_stats(&repo_id.to_string(), file_path).unwrap();
    assert_eq!(before, after);
    assert!(store.get_incident(&incident.id.to_string()).unwrap().is_none());
}

#[test]
fn stats_counts_critical_and_recent_titles() {
    let (store, repo_id) = seeded_store();
    let file_path = "src/auth/session.rs";
    for i in 0..3 {
        let incident = Incident {
            id: Uuid::new_v4(),
            repo_id,
            title: format!("session bug {i}"),
            description: "expired tokens accepted".into(),
            severity: if i == 0 { Severity::Critical } else { Severity::Medium },
            occurred_at: Utc::now(),
            resolved_at: None,
            root_cause: None,
        };
        store.insert_incident(&incident).unwrap();
        store
            .link_incident_file(&IncidentFileLink {
                incident_id: incident.id,
                file_path: file_path.into(),
                line_number: None,
                function: None,
                confidence: 1.0,
            })
            .unwrap();
    }

    let stats = store.incident_stats(&repo_id.to_string(), file_path).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.critical_count, 1);
    assert_eq!(stats.recent_titles.len(), 3);
}
