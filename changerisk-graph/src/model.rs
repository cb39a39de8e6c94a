//! Node and edge vocabulary for the property graph (spec §6 "graph schema").

use changerisk_core::model::RepoId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeData {
    File {
        repo_id: RepoId,
        path: String,
        language: Option<String>,
        live: bool,
    },
    CodeBlock {
        repo_id: RepoId,
        file_path: String,
        block_name: String,
        line_start: u32,
        line_end: u32,
    },
    Commit {
        repo_id: RepoId,
        sha: String,
        authored_at: chrono::DateTime<chrono::Utc>,
    },
    Developer {
        repo_id: RepoId,
        email: String,
    },
    Incident {
        repo_id: RepoId,
        id: String,
        title: String,
        severity: String,
    },
}

impl NodeData {
    pub fn repo_id(&self) -> RepoId {
        match self {
            Self::File { repo_id, .. }
            | Self::CodeBlock { repo_id, .. }
            | Self::Commit { repo_id, .. }
            | Self::Developer { repo_id, .. }
            | Self::Incident { repo_id, .. } => *repo_id,
        }
    }

    /// Stable key used for upsert dedup and id-set lookups. Never contains
    /// the petgraph-internal index — this is the caller-visible identity.
    pub fn stable_key(&self) -> String {
        match self {
            Self::File { repo_id, path, .. } => format!("file:{repo_id}:{path}"),
            Self::CodeBlock { repo_id, file_path, block_name, .. } => {
                format!("block:{repo_id}:{file_path}:{block_name}")
            }
            Self::Commit { repo_id, sha, .. } => format!("commit:{repo_id}:{sha}"),
            Self::Developer { repo_id, email, .. } => format!("dev:{repo_id}:{email}"),
            Self::Incident { id, .. } => format!("incident:{id}"),
        }
    }
}

/// Key constructors mirroring `NodeData::stable_key` for callers that only
/// have the scalar fields (e.g. Phase 1 looking up a file by path).
pub fn file_key(repo_id: RepoId, path: &str) -> String {
    format!("file:{repo_id}:{path}")
}

pub fn block_key(repo_id: RepoId, file_path: &str, block_name: &str) -> String {
    format!("block:{repo_id}:{file_path}:{block_name}")
}

pub fn commit_key(repo_id: RepoId, sha: &str) -> String {
    format!("commit:{repo_id}:{sha}")
}

pub fn developer_key(repo_id: RepoId, email: &str) -> String {
    format!("dev:{repo_id}:{email}")
}

pub fn incident_key(id: &str) -> String {
    format!("incident:{id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// File -> CodeBlock
    Contains,
    /// File -> File
    Imports,
    /// Developer -> Commit
    Authored,
    /// Commit -> File
    Modifies,
    /// Commit -> CodeBlock
    CreatedBlock,
    /// Commit -> CodeBlock
    ModifiedBlock,
    /// File <-> File, materialized as two directed edges
    CoChanged,
    /// Incident -> File
    CausedBy,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "CONTAINS",
            Self::Imports => "IMPORTS",
            Self::Authored => "AUTHORED",
            Self::Modifies => "MODIFIES",
            Self::CreatedBlock => "CREATED_BLOCK",
            Self::ModifiedBlock => "MODIFIED_BLOCK",
            Self::CoChanged => "CO_CHANGED",
            Self::CausedBy => "CAUSED_BY",
        }
    }
}
