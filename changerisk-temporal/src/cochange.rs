//! Co-change pair/frequency derivation (spec §4.3 steps 1-4).

use std::collections::HashMap;

use changerisk_core::model::{CoChangeEdge, Commit, RepoId};

/// Walks `commits` (must already be ordered ascending by `authored_at`) and
/// emits one edge per unordered file pair whose frequency clears
/// `threshold`. Commits touching more than `bulk_commit_file_cap` files are
/// suppressed entirely — a bulk refactor would otherwise inflate every pair
/// it touches.
pub fn derive_edges(
    repo_id: RepoId,
    commits: &[Commit],
    window_days: u32,
    threshold: f64,
    bulk_commit_file_cap: usize,
) -> Vec<CoChangeEdge> {
    let mut commit_counts: HashMap<String, u32> = HashMap::new();
    let mut pair_counts: HashMap<(String, String), u32> = HashMap::new();

    for commit in commits {
        let paths: Vec<&str> = commit.file_patches.iter().map(|p| p.path.as_str()).collect();
        if paths.len() > bulk_commit_file_cap {
            continue;
        }
        for path in &paths {
            *commit_counts.entry((*path).to_string()).or_insert(0) += 1;
        }
        for i in 0..paths.len() {
            for j in (i + 1)..paths.len() {
                let (a, b) = CoChangeEdge::canonical_pair(paths[i], paths[j]);
                if a == b {
                    continue;
                }
                *pair_counts.entry((a, b)).or_insert(0) += 1;
            }
        }
    }

    let mut edges = Vec::new();
    for ((a, b), co_changes) in pair_counts {
        let n_a = *commit_counts.get(&a).unwrap_or(&0);
        let n_b = *commit_counts.get(&b).unwrap_or(&0);
        let denom = n_a.min(n_b);
        if denom == 0 {
            continue;
        }
        let frequency = co_changes as f64 / denom as f64;
        if frequency >= threshold {
            edges.push(CoChangeEdge {
                repo_id,
                file_a: a,
                file_b: b,
                frequency: frequency.min(1.0),
                co_changes,
                window_days,
            });
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use changerisk_core::model::FilePatch;
    use chrono::Utc;
    use uuid::Uuid;

    fn commit(paths: &[&str]) -> Commit {
        Commit {
            repo_id: Uuid::nil(),
            sha: format!("sha-{}", paths.join("-")),
            author_email: "dev@example.com".into(),
            author_name: "Dev".into(),
            authored_at: Utc::now(),
            message: String::new(),
            file_patches: paths
                .iter()
                .map(|p| FilePatch { path: p.to_string(), additions: 1, deletions: 0, is_delete: false })
                .collect(),
            additions: paths.len() as u32,
            deletions: 0,
            processed_at: None,
        }
    }

    #[test]
    fn frequent_pair_crosses_threshold() {
        let repo_id = Uuid::new_v4();
        let commits = vec![
            commit(&["a.rs", "b.rs"]),
            commit(&["a.rs", "b.rs"]),
            commit(&["a.rs"]),
        ];
        let edges = derive_edges(repo_id, &commits, 90, 0.3, 50);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].co_changes, 2);
        // n_a=3, n_b=2, min=2, frequency=2/2=1.0
        assert!((edges[0].frequency - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bulk_commit_is_suppressed() {
        let repo_id = Uuid::new_v4();
        let many_files: Vec<String> = (0..60).map(|i| format!("f{i}.rs")).collect();
        let refs: Vec<&str> = many_files.iter().map(|s| s.as_str()).collect();
        let commits = vec![commit(&refs), commit(&["a.rs", "b.rs"]), commit(&["a.rs", "b.rs"])];
        let edges = derive_edges(repo_id, &commits, 90, 0.3, 50);
        // only the two small commits should contribute; none of the 60-file pairs appear
        assert!(edges.iter().all(|e| e.file_a == "a.rs" || e.file_b == "a.rs"));
    }

    #[test]
    fn below_threshold_pair_is_dropped() {
        let repo_id = Uuid::new_v4();
        let commits = vec![
            commit(&["a.rs", "b.rs"]),
            commit(&["a.rs"]),
            commit(&["a.rs"]),
            commit(&["a.rs"]),
        ];
        let edges = derive_edges(repo_id, &commits, 90, 0.3, 50);
        assert!(edges.is_empty());
    }
}
