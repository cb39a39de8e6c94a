//! Persistent data model (spec §3): repositories, commits, files, code
//! blocks, developers, incidents, and the edges between them.
//!
//! These are plain records shared by the relational and graph adapters —
//! neither adapter owns the type, both translate to/from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RepoId = Uuid;
pub type IncidentId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: RepoId,
    pub owner: String,
    pub name: String,
    pub full_name: String,
    pub default_branch: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub repo_id: RepoId,
    pub sha: String,
    pub author_email: String,
    pub author_name: String,
    pub authored_at: DateTime<Utc>,
    pub message: String,
    /// file path -> (additions, deletions)
    pub file_patches: Vec<FilePatch>,
    pub additions: u32,
    pub deletions: u32,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePatch {
    pub path: String,
    pub additions: u32,
    pub deletions: u32,
    /// true when this patch deletes the file outright.
    pub is_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub repo_id: RepoId,
    pub path: String,
    pub language: Option<String>,
    /// Prior paths, oldest first, for rename-preserving identity.
    pub historical_paths: Vec<String>,
    pub live: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockType {
    Function,
    Method,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStatus {
    Active,
    Renamed,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub repo_id: RepoId,
    pub file_path: String,
    pub block_name: String,
    pub signature: String,
    pub block_type: BlockType,
    pub line_start: u32,
    pub line_end: u32,
    pub first_seen_sha: String,
    pub status: BlockStatus,
    /// Back-pointer to the predecessor block when this one is a rename.
    /// Forms an acyclic chain within the same file (invariant 3).
    pub evolved_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlockModification {
    pub repo_id: RepoId,
    pub file_path: String,
    pub block_name: String,
    pub commit_sha: String,
    pub developer_email: String,
    pub added: u32,
    pub deleted: u32,
    pub modified_at: DateTime<Utc>,
    pub raw_llm_classification: Option<String>,
    pub refactor_only: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Developer {
    pub repo_id: RepoId,
    pub email: String,
    pub commit_count: u32,
    pub last_active_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub repo_id: RepoId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub occurred_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub root_cause: Option<String>,
}

impl Incident {
    /// The text fed into the full-text search vector: title + description +
    /// root cause, in that order (invariant 4: never null/empty).
    pub fn search_text(&self) -> String {
        let mut parts = vec![self.title.clone(), self.description.clone()];
        if let Some(rc) = &self.root_cause {
            parts.push(rc.clone());
        }
        parts.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentFileLink {
    pub incident_id: IncidentId,
    pub file_path: String,
    pub line_number: Option<u32>,
    pub function: Option<String>,
    pub confidence: f64,
}

impl IncidentFileLink {
    pub const DEFAULT_HUMAN_CONFIDENCE: f64 = 1.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemanticImportance {
    P0,
    P1,
    P2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamiliarityEntry {
    pub developer_email: String,
    pub edits: u32,
}

/// Derived risk properties attached to a code block (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRiskProperties {
    pub original_author: Option<String>,
    pub last_modifier: Option<String>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub incident_count: u32,
    pub semantic_importance: Option<SemanticImportance>,
    /// Top-10 contributors by edit count, descending.
    pub familiarity_map: Vec<FamiliarityEntry>,
}

/// A symmetric co-change edge between two files (invariant 5: canonicalized,
/// no self-loops, stored once per unordered pair).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoChangeEdge {
    pub repo_id: RepoId,
    pub file_a: String,
    pub file_b: String,
    pub frequency: f64,
    pub co_changes: u32,
    pub window_days: u32,
}

impl CoChangeEdge {
    /// Canonicalize a pair so the same unordered pair always produces the
    /// same (file_a, file_b) ordering, regardless of call-site order.
    pub fn canonical_pair(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }
}

/// Ownership facts derived by the temporal analyzer for a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipFacts {
    pub repo_id: RepoId,
    pub file_path: String,
    pub current_owner: Option<String>,
    pub previous_owner: Option<String>,
    pub days_since_handoff: Option<i64>,
}

/// Aggregate incident stats for a file (C4 `stats`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentStats {
    pub total: u32,
    pub last_30d: u32,
    pub critical_count: u32,
    pub last_incident_at: Option<DateTime<Utc>>,
    pub recent_titles: Vec<String>,
}

impl Default for IncidentStats {
    fn default() -> Self {
        Self {
            total: 0,
            last_30d: 0,
            critical_count: 0,
            last_incident_at: None,
            recent_titles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentSearchResult {
    pub incident: Incident,
    pub rank: f64,
    pub linked_files: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentSearchFilters {
    pub severity: Option<Severity>,
    pub since: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_pair_is_order_independent() {
        let (a1, b1) = CoChangeEdge::canonical_pair("z.rs", "a.rs");
        let (a2, b2) = CoChangeEdge::canonical_pair("a.rs", "z.rs");
        assert_eq!((a1, b1), (a2.clone(), b2.clone()));
        assert_eq!(a2, "a.rs");
        assert_eq!(b2, "z.rs");
    }

    #[test]
    fn incident_search_text_never_empty_and_includes_root_cause() {
        let incident = Incident {
            id: Uuid::new_v4(),
            repo_id: Uuid::new_v4(),
            title: "Outage".into(),
            description: "DB connection pool exhausted".into(),
            severity: Severity::Critical,
            occurred_at: Utc::now(),
            resolved_at: None,
            root_cause: Some("leaked connections in retry path".into()),
        };
        let text = incident.search_text();
        assert!(!text.is_empty());
        assert!(text.contains("leaked connections"));
    }
}
