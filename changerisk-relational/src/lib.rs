//! # changerisk-relational
//!
//! The "kitchen": source-of-truth storage for repositories, commits,
//! incidents, and the derived tables the Temporal Analyzer and Phase 1
//! engine populate. Every other store treats this crate's writes as
//! authoritative — the graph adapter rebuilds itself from here, never the
//! reverse (spec §1 invariant 2).

#![allow(dead_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod queries;

use std::path::Path;

use changerisk_core::model::{
    CoChangeEdge, Commit, Developer, FileRecord, Incident, IncidentFileLink,
    IncidentSearchFilters, IncidentSearchResult, IncidentStats, OwnershipFacts, Repository,
};
use chrono::{DateTime, Utc};
use tracing::warn;

use connection::DatabaseManager;
use errors::{StorageError, StorageResult};

/// Top-level handle other crates depend on. Thin wrapper over
/// `DatabaseManager` that exposes the typed query surface instead of raw SQL.
pub struct RelationalStore {
    db: DatabaseManager,
}

impl RelationalStore {
    pub fn open(path: &Path) -> StorageResult<Self> {
        Ok(Self {
            db: DatabaseManager::open(path)?,
        })
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
        })
    }

    pub fn checkpoint(&self) -> StorageResult<()> {
        self.db.checkpoint()
    }

    // -- repositories / files / developers -----------------------------

    pub fn upsert_repository(&self, repo: &Repository) -> StorageResult<()> {
        self.db.with_writer(|c| queries::repositories::upsert_repository(c, repo))
    }

    pub fn get_repository(&self, id: &str) -> StorageResult<Option<Repository>> {
        self.db.with_reader(|c| queries::repositories::get_repository(c, id))
    }

    pub fn upsert_file(&self, file: &FileRecord) -> StorageResult<()> {
        self.db.with_writer(|c| queries::repositories::upsert_file(c, file))
    }

    pub fn upsert_developer(&self, dev: &Developer) -> StorageResult<()> {
        self.db.with_writer(|c| queries::repositories::upsert_developer(c, dev))
    }

    pub fn file_exists(&self, repo_id: &str, path: &str) -> StorageResult<bool> {
        self.db.with_reader(|c| queries::repositories::file_exists(c, repo_id, path))
    }

    // -- commits ---------------------------------------------------------

    pub fn insert_commit(&self, commit: &Commit) -> StorageResult<()> {
        self.db.with_writer(|c| queries::commits::insert_commit(c, commit))
    }

    pub fn commits_in_window(
        &self,
        repo_id: &str,
        since: DateTime<Utc>,
    ) -> StorageResult<Vec<Commit>> {
        self.db.with_reader(|c| queries::commits::commits_in_window(c, repo_id, since))
    }

    // -- co-change / ownership --------------------------------------------

    pub fn replace_cochange_edges(
        &self,
        repo_id: &str,
        edges: &[CoChangeEdge],
    ) -> StorageResult<()> {
        self.db.with_writer(|c| queries::cochange::replace_all(c, repo_id, edges))
    }

    pub fn cochange_edges_for_file(
        &self,
        repo_id: &str,
        file_path: &str,
    ) -> StorageResult<Vec<CoChangeEdge>> {
        self.db.with_reader(|c| queries::cochange::edges_for_file(c, repo_id, file_path))
    }

    pub fn max_cochange_frequency(&self, repo_id: &str, file_path: &str) -> StorageResult<f64> {
        self.db
            .with_reader(|c| queries::cochange::max_frequency_for_file(c, repo_id, file_path))
    }

    pub fn upsert_ownership(&self, facts: &OwnershipFacts) -> StorageResult<()> {
        self.db.with_writer(|c| queries::cochange::upsert_ownership(c, facts))
    }

    pub fn ownership_for_file(
        &self,
        repo_id: &str,
        file_path: &str,
    ) -> StorageResult<Option<OwnershipFacts>> {
        self.db.with_reader(|c| queries::cochange::ownership_for_file(c, repo_id, file_path))
    }

    // -- coupling / risk index --------------------------------------------

    pub fn upsert_dependent_count(
        &self,
        repo_id: &str,
        file_path: &str,
        count: u32,
    ) -> StorageResult<()> {
        self.db
            .with_writer(|c| queries::coupling::upsert_dependent_count(c, repo_id, file_path, count))
    }

    pub fn dependent_count(&self, repo_id: &str, file_path: &str) -> StorageResult<u32> {
        self.db.with_reader(|c| queries::coupling::dependent_count(c, repo_id, file_path))
    }

    pub fn upsert_risk_properties(
        &self,
        repo_id: &str,
        file_path: &str,
        block_name: &str,
        props: &changerisk_core::model::BlockRiskProperties,
    ) -> StorageResult<()> {
        self.db.with_writer(|c| {
            queries::coupling::upsert_risk_properties(c, repo_id, file_path, block_name, props)
        })
    }

    pub fn risk_properties(
        &self,
        repo_id: &str,
        file_path: &str,
        block_name: &str,
    ) -> StorageResult<Option<changerisk_core::model::BlockRiskProperties>> {
        self.db
            .with_reader(|c| queries::coupling::risk_properties(c, repo_id, file_path, block_name))
    }

    // -- incidents ---------------------------------------------------------

    pub fn insert_incident(&self, incident: &Incident) -> StorageResult<()> {
        self.db.with_writer(|c| queries::incidents::insert(c, incident))
    }

    pub fn delete_incident(&self, incident_id: &str) -> StorageResult<()> {
        self.db.with_writer(|c| queries::incidents::delete(c, incident_id))
    }

    pub fn link_incident_file(&self, link: &IncidentFileLink) -> StorageResult<()> {
        self.db.with_writer(|c| queries::incidents::link_file(c, link))
    }

    pub fn unlink_incident_file(&self, incident_id: &str, file_path: &str) -> StorageResult<()> {
        self.db.with_writer(|c| queries::incidents::unlink_file(c, incident_id, file_path))
    }

    pub fn search_incidents(
        &self,
        repo_id: &str,
        query: &str,
        filters: &IncidentSearchFilters,
        limit: u32,
    ) -> StorageResult<Vec<IncidentSearchResult>> {
        self.db
            .with_reader(|c| queries::incidents::search(c, repo_id, query, filters, limit))
    }

    pub fn incident_stats(&self, repo_id: &str, file_path: &str) -> StorageResult<IncidentStats> {
        self.db.with_reader(|c| queries::incidents::stats(c, repo_id, file_path))
    }

    pub fn get_incident(&self, incident_id: &str) -> StorageResult<Option<Incident>> {
        self.db.with_reader(|c| queries::incidents::get(c, incident_id))
    }

    /// Write the row, then run a side-effect that depends on it having
    /// landed (spec §4.2: "write row then side-effect"). The side-effect is
    /// *not* rolled back into the row's transaction — if it fails, the row
    /// stays committed and the caller is told so it can compensate (e.g.
    /// queue a graph-mirror retry) rather than lose the relational write.
    pub fn write_then<T, E>(
        &self,
        write: impl FnOnce(&RelationalStore) -> StorageResult<T>,
        side_effect: impl FnOnce(&T) -> Result<(), E>,
    ) -> StorageResult<(T, Result<(), E>)> {
        let written = write(self)?;
        let outcome = side_effect(&written);
        if outcome.is_err() {
            warn!("side-effect after relational write failed; row is committed, compensating write required");
        }
        Ok((written, outcome))
    }

    pub fn guard_ordering(&self, what: &str, relational_write_happened: bool) -> StorageResult<()> {
        if !relational_write_happened {
            return Err(StorageError::OrderingViolation { what: what.to_string() });
        }
        Ok(())
    }
}
