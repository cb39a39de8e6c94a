use changerisk_core::model::{Commit, FilePatch};
use changerisk_temporal::cochange::derive_edges;
use chrono::Utc;
use proptest::prelude::*;
use std::collections::HashSet;
use uuid::Uuid;

const THRESHOLD: f64 = 0.3;

fn commit(paths: &[usize]) -> Commit {
    Commit {
        repo_id: Uuid::nil(),
        sha: format!("sha-{}", paths.iter().map(|p| p.to_string()).collect::<Vec<_>>().join("-")),
        author_email: "dev@example.com".into(),
        author_name: "Dev".into(),
        authored_at: Utc::now(),
        message: String::new(),
        file_patches: paths
            .iter()
            .map(|p| FilePatch { path: format!("f{p}.rs"), additions: 1, deletions: 0, is_delete: false })
            .collect(),
        additions: paths.len() as u32,
        deletions: 0,
        processed_at: None,
    }
}

proptest! {
    /// For any randomly generated commit history: every surviving co-change
    /// edge has frequency in [threshold, 1.0], no pair appears twice
    /// (regardless of which order the commit touched the files in), and no
    /// file co-changes with itself.
    #[test]
    fn cochange_edges_satisfy_universal_invariants(
        commits in prop::collection::vec(prop::collection::vec(0usize..8, 0..6), 1..20)
    ) {
        let repo_id = Uuid::new_v4();
        let commit_rows: Vec<Commit> = commits.iter().map(|paths| commit(paths)).collect();
        let edges = derive_edges(repo_id, &commit_rows, 90, THRESHOLD, 50);

        let mut seen = HashSet::new();
        for edge in &edges {
            prop_assert!(edge.frequency >= THRESHOLD - f64::EPSILON && edge.frequency <= 1.0);
            prop_assert_ne!(&edge.file_a, &edge.file_b);
            let key = (edge.file_a.clone(), edge.file_b.clone());
            prop_assert!(seen.insert(key), "duplicate unordered pair emitted");
        }
    }
}
