//! Co-change edges and ownership facts, persisted by the Temporal Analyzer
//! and read back by Phase 1 and the Graph Store Adapter's derived rebuild.

use changerisk_core::model::{CoChangeEdge, OwnershipFacts};
use rusqlite::{params, Connection};

use crate::errors::StorageResult;

/// Idempotent upsert keyed on the canonicalized pair (invariant 5).
pub fn upsert_edge(conn: &Connection, edge: &CoChangeEdge) -> StorageResult<()> {
    let (a, b) = CoChangeEdge::canonical_pair(&edge.file_a, &edge.file_b);
    conn.execute(
        "INSERT INTO co_change_edges (repo_id, file_a, file_b, frequency, co_changes, window_days)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(repo_id, file_a, file_b) DO UPDATE SET
            frequency = excluded.frequency,
            co_changes = excluded.co_changes,
            window_days = excluded.window_days",
        params![
            edge.repo_id.to_string(),
            a,
            b,
            edge.frequency,
            edge.co_changes,
            edge.window_days,
        ],
    )?;
    Ok(())
}

/// Replace the full edge set for a repo+window in one transaction — the
/// Temporal Analyzer re-derives edges wholesale each run (idempotent by
/// construction, spec §4.3).
pub fn replace_all(conn: &Connection, repo_id: &str, edges: &[CoChangeEdge]) -> StorageResult<()> {
    conn.execute("DELETE FROM co_change_edges WHERE repo_id = ?1", params![repo_id])?;
    for edge in edges {
        upsert_edge(conn, edge)?;
    }
    Ok(())
}

pub fn edges_for_file(
    conn: &Connection,
    repo_id: &str,
    file_path: &str,
) -> StorageResult<Vec<CoChangeEdge>> {
    let mut stmt = conn.prepare(
        "SELECT file_a, file_b, frequency, co_changes, window_days FROM co_change_edges
         WHERE repo_id = ?1 AND (file_a = ?2 OR file_b = ?2)
         ORDER BY frequency DESC",
    )?;
    let rows = stmt.query_map(params![repo_id, file_path], |row| {
        Ok(CoChangeEdge {
            repo_id: repo_id.parse().unwrap_or_default(),
            file_a: row.get(0)?,
            file_b: row.get(1)?,
            frequency: row.get(2)?,
            co_changes: row.get(3)?,
            window_days: row.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn max_frequency_for_file(conn: &Connection, repo_id: &str, file_path: &str) -> StorageResult<f64> {
    let v: Option<f64> = conn.query_row(
        "SELECT MAX(frequency) FROM co_change_edges WHERE repo_id = ?1 AND (file_a = ?2 OR file_b = ?2)",
        params![repo_id, file_path],
        |r| r.get(0),
    )?;
    Ok(v.unwrap_or(0.0))
}

pub fn upsert_ownership(conn: &Connection, facts: &OwnershipFacts) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO ownership_facts (repo_id, file_path, current_owner, previous_owner, days_since_handoff)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(repo_id, file_path) DO UPDATE SET
            current_owner = excluded.current_owner,
            previous_owner = excluded.previous_owner,
            days_since_handoff = excluded.days_since_handoff",
        params![
            facts.repo_id.to_string(),
            facts.file_path,
            facts.current_owner,
            facts.previous_owner,
            facts.days_since_handoff,
        ],
    )?;
    Ok(())
}

pub fn ownership_for_file(
    conn: &Connection,
    repo_id: &str,
    file_path: &str,
) -> StorageResult<Option<OwnershipFacts>> {
    use rusqlite::OptionalExtension;
    conn.query_row(
        "SELECT current_owner, previous_owner, days_since_handoff FROM ownership_facts
         WHERE repo_id = ?1 AND file_path = ?2",
        params![repo_id, file_path],
        |row| {
            Ok(OwnershipFacts {
                repo_id: repo_id.parse().unwrap_or_default(),
                file_path: file_path.to_string(),
                current_owner: row.get(0)?,
                previous_owner: row.get(1)?,
                days_since_handoff: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}
