//! `GraphAdapter` — the write path. Enforces dual-write ordering: a file,
//! incident, or developer node may only be upserted once the corresponding
//! relational row exists (spec §4.1: "policy, not schema").

use std::sync::Arc;

use changerisk_core::model::{CoChangeEdge, FileRecord, Incident, RepoId};
use changerisk_relational::RelationalStore;
use tracing::debug;

use crate::errors::{GraphError, GraphResult};
use crate::model::{self, EdgeKind, NodeData};
use crate::reader::IGraphReader;
use crate::store::GraphStore;

pub struct GraphAdapter {
    store: GraphStore,
    relational: Arc<RelationalStore>,
}

impl GraphAdapter {
    pub fn new(relational: Arc<RelationalStore>) -> Self {
        Self {
            store: GraphStore::new(),
            relational,
        }
    }

    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    /// Mirror a file into the graph. Refuses when the relational row is
    /// missing rather than silently creating an orphan (ConstraintViolation).
    pub fn upsert_file(&self, file: &FileRecord) -> GraphResult<()> {
        let exists = self
            .relational
            .file_exists(&file.repo_id.to_string(), &file.path)
            .map_err(|e| GraphError::BackendUnavailable { reason: e.to_string() })?;
        if !exists {
            return Err(GraphError::ConstraintViolation {
                what: format!("file {} has no relational row", file.path),
            });
        }
        self.store.upsert_node(NodeData::File {
            repo_id: file.repo_id,
            path: file.path.clone(),
            language: file.language.clone(),
            live: file.live,
        });
        Ok(())
    }

    pub fn upsert_import_edge(&self, repo_id: RepoId, from_path: &str, to_path: &str) -> GraphResult<bool> {
        let from_key = model::file_key(repo_id, from_path);
        let to_key = model::file_key(repo_id, to_path);
        Ok(self.store.upsert_edge(&from_key, &to_key, EdgeKind::Imports))
    }

    /// Mirrors a minimal incident node (spec §4.4: relational write is
    /// source-of-truth, "then mirror a minimal node into the graph").
    pub fn mirror_incident(&self, incident: &Incident) -> GraphResult<()> {
        let existing = self
            .relational
            .get_incident(&incident.id.to_string())
            .map_err(|e| GraphError::BackendUnavailable { reason: e.to_string() })?;
        if existing.is_none() {
            return Err(GraphError::ConstraintViolation {
                what: format!("incident {} has no relational row", incident.id),
            });
        }
        self.store.upsert_node(NodeData::Incident {
            repo_id: incident.repo_id,
            id: incident.id.to_string(),
            title: incident.title.clone(),
            severity: format!("{:?}", incident.severity).to_lowercase(),
        });
        Ok(())
    }

    /// Removes the mirrored incident node and every edge touching it
    /// (including its `CAUSED_BY` links), called after the relational row
    /// is already gone (spec §4.4: deletes must cascade in both stores).
    pub fn remove_incident(&self, incident_id: &str) -> bool {
        let key = model::incident_key(incident_id);
        self.store.remove_node(&key)
    }

    /// Materializes the `CAUSED_BY` edge after the relational link exists.
    pub fn link_incident_file(
        &self,
        repo_id: RepoId,
        incident_id: &str,
        file_path: &str,
    ) -> GraphResult<bool> {
        let incident_key = model::incident_key(incident_id);
        let file_key = model::file_key(repo_id, file_path);
        Ok(self.store.upsert_edge(&incident_key, &file_key, EdgeKind::CausedBy))
    }

    /// Materializes `CO_CHANGED` edges both directions for a file pair.
    pub fn upsert_cochange_edge(&self, edge: &CoChangeEdge) -> GraphResult<()> {
        let a = model::file_key(edge.repo_id, &edge.file_a);
        let b = model::file_key(edge.repo_id, &edge.file_b);
        self.store.upsert_edge(&a, &b, EdgeKind::CoChanged);
        self.store.upsert_edge(&b, &a, EdgeKind::CoChanged);
        Ok(())
    }

    /// Best-effort materialization used by the investigator when the LLM
    /// narrative mentions a file reference or edge type (spec §4.8 step 3):
    /// absence of either endpoint is non-fatal, not an error.
    pub fn try_materialize_mention(
        &self,
        repo_id: RepoId,
        from_path: &str,
        to_path: &str,
        kind: EdgeKind,
    ) -> bool {
        let from_key = model::file_key(repo_id, from_path);
        let to_key = model::file_key(repo_id, to_path);
        let ok = self.store.upsert_edge(&from_key, &to_key, kind);
        if !ok {
            debug!(from_path, to_path, "best-effort mention materialization skipped: endpoint missing");
        }
        ok
    }
}

impl IGraphReader for GraphAdapter {
    fn direct_importers_count(&self, repo_id: &str, file_path: &str) -> GraphResult<u32> {
        let repo_id: RepoId = repo_id
            .parse()
            .map_err(|_| GraphError::QueryError { detail: "invalid repo_id".into() })?;
        let key = model::file_key(repo_id, file_path);
        Ok(self.store.in_degree(&key, EdgeKind::Imports))
    }

    fn neighbors_out(&self, key: &str, kind: EdgeKind) -> GraphResult<Vec<NodeData>> {
        Ok(self.store.neighbors_out(key, kind))
    }

    fn neighbors_in(&self, key: &str, kind: EdgeKind) -> GraphResult<Vec<NodeData>> {
        Ok(self.store.neighbors_in(key, kind))
    }

    fn fetch_nodes(&self, keys: &[String]) -> GraphResult<Vec<NodeData>> {
        Ok(self.store.fetch_nodes(keys))
    }
}
