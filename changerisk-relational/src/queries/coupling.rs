//! Derived coupling/risk-index tables (spec §6): `code_block_coupling` and
//! `code_block_risk_index`. Both are write-through caches the graph adapter
//! (and Phase 1) read from instead of re-deriving on every `check`.

use changerisk_core::model::{BlockRiskProperties, FamiliarityEntry, SemanticImportance};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::StorageResult;

pub fn upsert_dependent_count(
    conn: &Connection,
    repo_id: &str,
    file_path: &str,
    dependent_count: u32,
) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO code_block_coupling (repo_id, file_path, dependent_count, computed_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(repo_id, file_path) DO UPDATE SET
            dependent_count = excluded.dependent_count,
            computed_at = excluded.computed_at",
        params![repo_id, file_path, dependent_count, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn dependent_count(conn: &Connection, repo_id: &str, file_path: &str) -> StorageResult<u32> {
    let v: Option<u32> = conn
        .query_row(
            "SELECT dependent_count FROM code_block_coupling WHERE repo_id = ?1 AND file_path = ?2",
            params![repo_id, file_path],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or(0))
}

fn importance_to_str(i: SemanticImportance) -> &'static str {
    match i {
        SemanticImportance::P0 => "P0",
        SemanticImportance::P1 => "P1",
        SemanticImportance::P2 => "P2",
    }
}

fn importance_from_str(s: &str) -> Option<SemanticImportance> {
    match s {
        "P0" => Some(SemanticImportance::P0),
        "P1" => Some(SemanticImportance::P1),
        "P2" => Some(SemanticImportance::P2),
        _ => None,
    }
}

pub fn upsert_risk_properties(
    conn: &Connection,
    repo_id: &str,
    file_path: &str,
    block_name: &str,
    props: &BlockRiskProperties,
) -> StorageResult<()> {
    let familiarity_json = serde_json::to_string(&props.familiarity_map).unwrap_or_else(|_| "[]".into());
    conn.execute(
        "INSERT INTO code_block_risk_index
            (repo_id, file_path, block_name, original_author, last_modifier, last_modified_at,
             incident_count, semantic_importance, familiarity_map_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(repo_id, file_path, block_name) DO UPDATE SET
            original_author = excluded.original_author,
            last_modifier = excluded.last_modifier,
            last_modified_at = excluded.last_modified_at,
            incident_count = excluded.incident_count,
            semantic_importance = excluded.semantic_importance,
            familiarity_map_json = excluded.familiarity_map_json",
        params![
            repo_id,
            file_path,
            block_name,
            props.original_author,
            props.last_modifier,
            props.last_modified_at.map(|t| t.to_rfc3339()),
            props.incident_count,
            props.semantic_importance.map(importance_to_str),
            familiarity_json,
        ],
    )?;
    Ok(())
}

pub fn risk_properties(
    conn: &Connection,
    repo_id: &str,
    file_path: &str,
    block_name: &str,
) -> StorageResult<Option<BlockRiskProperties>> {
    conn.query_row(
        "SELECT original_author, last_modifier, last_modified_at, incident_count,
                semantic_importance, familiarity_map_json
         FROM code_block_risk_index WHERE repo_id = ?1 AND file_path = ?2 AND block_name = ?3",
        params![repo_id, file_path, block_name],
        |row| {
            let last_modified_at: Option<String> = row.get(2)?;
            let semantic_importance: Option<String> = row.get(4)?;
            let familiarity_json: String = row.get(5)?;
            let familiarity_map: Vec<FamiliarityEntry> =
                serde_json::from_str(&familiarity_json).unwrap_or_default();
            Ok(BlockRiskProperties {
                original_author: row.get(0)?,
                last_modifier: row.get(1)?,
                last_modified_at: last_modified_at.and_then(|s| {
                    chrono::DateTime::parse_from_rfc3339(&s)
                        .ok()
                        .map(|d| d.with_timezone(&Utc))
                }),
                incident_count: row.get(3)?,
                semantic_importance: semantic_importance.and_then(|s| importance_from_str(&s)),
                familiarity_map,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}
