use changerisk_core::model::{CoChangeEdge, Repository};
use changerisk_relational::RelationalStore;
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
fn upsert_canonicalizes_regardless_of_caller_order() {
    let (store, repo_id) = seeded_store();
    store
        .replace_cochange_edges(
            &repo_id.to_string(),
            &[CoChangeEdge {
                repo_id,
                file_a: "z.rs".into(),
                file_b: "a.rs".into(),
                frequency: 0.5,
                co_changes: 4,
                window_days: 90,
            }],
        )
        .unwrap();

    let edges = store.cochange_edges_for_file(&repo_id.to_string(), "a.rs").unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].file_a, "a.rs");
    assert_eq!(edges[0].file_b, "z.rs");
}

#[test]
fn replace_all_is_idempotent_per_repo() {
    let (store, repo_id) = seeded_store();
    let edges = vec![
        CoChangeEdge {
            repo_id,
            file_a: "a.rs".into(),
            file_b: "b.rs".into(),
            frequency: 0.6,
            co_changes: 6,
            window_days: 90,
        },
        CoChangeEdge {
            repo_id,
            file_a: "b.rs".into(),
            file_b: "c.rs".into(),
            frequency: 0.3,
            co_changes: 3,
            window_days: 90,
        },
    ];
    store.replace_cochange_edges(&repo_id.to_string(), &edges).unwrap();
    store.replace_cochange_edges(&repo_id.to_string(), &edges).unwrap();

    let from_b = store.cochange_edges_for_file(&repo_id.to_string(), "b.rs").unwrap();
    assert_eq!(from_b.len(), 2);
}

#[test]
fn max_frequency_for_file_reflects_strongest_edge() {
    let (store, repo_id) = seeded_store();
    store
        .replace_cochange_edges(
            &repo_id.to_string(),
            &[
                CoChangeEdge {
                    repo_id,
                    file_a: "a.rs".into(),
                    file_b: "b.rs".into(),
                    frequency: 0.4,
                    co_changes: 4,
                    window_days: 90,
                },
                CoChangeEdge {
                    repo_id,
                    file_a: "a.rs".into(),
                    file_b: "c.rs".into(),
                    frequency: 0.9,
                    co_changes: 9,
                    window_days: 90,
                },
            ],
        )
        .unwrap();

    let max = store.max_cochange_frequency(&repo_id.to_string(), "a.rs").unwrap();
    assert!((max - 0.9).abs() < f64::EPSILON);
}
