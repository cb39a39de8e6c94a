//! # changerisk-incidents
//!
//! Incident CRUD, link/unlink, ranked search, and per-file stats (C4).
//! Relational writes are the source of truth; the graph mirror is
//! best-effort and never blocks or rolls back a relational write that
//! already landed (spec §4.4, §4.2's "write row then side-effect").

#![allow(dead_code)]

use std::sync::Arc;

use changerisk_core::errors::RiskResult;
use changerisk_core::model::{
    Incident, IncidentFileLink, IncidentSearchFilters, IncidentSearchResult, IncidentStats,
};
use changerisk_graph::GraphAdapter;
use changerisk_relational::RelationalStore;
use tracing::warn;

pub struct IncidentStore {
    relational: Arc<RelationalStore>,
    graph: Arc<GraphAdapter>,
}

impl IncidentStore {
    pub fn new(relational: Arc<RelationalStore>, graph: Arc<GraphAdapter>) -> Self {
        Self { relational, graph }
    }

    /// Relational write is the row of record; the graph mirror is retried
    /// at the caller's discretion on failure, never rolled back into.
    pub fn create(&self, incident: &Incident) -> RiskResult<()> {
        self.relational.insert_incident(incident)?;
        if let Err(e) = self.graph.mirror_incident(incident) {
            warn!(incident_id = %incident.id, error = %e, "graph mirror failed after relational incident write");
        }
        Ok(())
    }

    pub fn update(&self, incident: &Incident) -> RiskResult<()> {
        self.relational.insert_incident(incident)?;
        if let Err(e) = self.graph.mirror_incident(incident) {
            warn!(incident_id = %incident.id, error = %e, "graph mirror failed after relational incident update");
        }
        Ok(())
    }

    /// Cascade-deletes links in the relational store (FK `ON DELETE
    /// CASCADE`), then removes the mirrored incident node and its
    /// `CAUSED_BY` edges from the graph — best-effort, same as `create`/
    /// `update`: a graph-side miss is logged, never rolled back into since
    /// the relational delete already landed (spec §4.4).
    pub fn delete(&self, incident_id: &str) -> RiskResult<()> {
        self.relational.delete_incident(incident_id)?;
        if !self.graph.remove_incident(incident_id) {
            warn!(incident_id, "graph mirror had no node to remove for deleted incident");
        }
        Ok(())
    }

    pub fn link_file(&self, link: &IncidentFileLink, repo_id: changerisk_core::model::RepoId) -> RiskResult<()> {
        self.relational.link_incident_file(link)?;
        if let Err(e) = self.graph.link_incident_file(repo_id, &link.incident_id.to_string(), &link.file_path) {
            warn!(incident_id = %link.incident_id, error = %e, "CAUSED_BY edge materialization failed after relational link");
        }
        Ok(())
    }

    pub fn unlink_file(&self, incident_id: &str, file_path: &str) -> RiskResult<()> {
        self.relational.unlink_incident_file(incident_id, file_path)?;
        Ok(())
    }

    pub fn search(
        &self,
        repo_id: &str,
        query: &str,
        filters: &IncidentSearchFilters,
        limit: u32,
    ) -> RiskResult<Vec<IncidentSearchResult>> {
        Ok(self.relational.search_incidents(repo_id, query, filters, limit)?)
    }

    pub fn stats(&self, repo_id: &str, file_path: &str) -> RiskResult<IncidentStats> {
        Ok(self.relational.incident_stats(repo_id, file_path)?)
    }

    pub fn get(&self, incident_id: &str) -> RiskResult<Option<Incident>> {
        Ok(self.relational.get_incident(incident_id)?)
    }
}
