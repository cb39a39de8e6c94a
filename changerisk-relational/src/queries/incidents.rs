//! Incident CRUD, ranked full-text search (BM25 via FTS5), and aggregate
//! stats — spec §4.2(a)/(b) and §4.4.

use changerisk_core::constants::{INCIDENT_STATS_WINDOW_DAYS, RECENT_TITLES_LIMIT};
use changerisk_core::model::{
    Incident, IncidentFileLink, IncidentSearchFilters, IncidentSearchResult, IncidentStats,
    Severity,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{StorageError, StorageResult};

fn severity_to_str(s: Severity) -> &'static str {
    match s {
        Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
        Severity::Critical => "critical",
    }
}

fn severity_from_str(s: &str) -> Severity {
    match s {
        "medium" => Severity::Medium,
        "high" => Severity::High,
        "critical" => Severity::Critical,
        _ => Severity::Low,
    }
}

pub fn insert(conn: &Connection, incident: &Incident) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO incidents (id, repo_id, title, description, severity, occurred_at, resolved_at, root_cause)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            severity = excluded.severity,
            occurred_at = excluded.occurred_at,
            resolved_at = excluded.resolved_at,
            root_cause = excluded.root_cause",
        params![
            incident.id.to_string(),
            incident.repo_id.to_string(),
            incident.title,
            incident.description,
            severity_to_str(incident.severity),
            incident.occurred_at.to_rfc3339(),
            incident.resolved_at.map(|t| t.to_rfc3339()),
            incident.root_cause,
        ],
    )?;
    Ok(())
}

/// Cascade-deletes links in the same statement set (ON DELETE CASCADE on
/// `incident_file_links`), satisfying "deleting an incident must cascade
/// delete links" (spec §4.4).
pub fn delete(conn: &Connection, incident_id: &str) -> StorageResult<()> {
    conn.execute("DELETE FROM incidents WHERE id = ?1", params![incident_id])?;
    Ok(())
}

pub fn link_file(conn: &Connection, link: &IncidentFileLink) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO incident_file_links (incident_id, file_path, line_number, function, confidence)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(incident_id, file_path) DO UPDATE SET
            line_number = excluded.line_number,
            function = excluded.function,
            confidence = excluded.confidence",
        params![
            link.incident_id.to_string(),
            link.file_path,
            link.line_number,
            link.function,
            link.confidence,
        ],
    )?;
    Ok(())
}

pub fn unlink_file(conn: &Connection, incident_id: &str, file_path: &str) -> StorageResult<()> {
    conn.execute(
        "DELETE FROM incident_file_links WHERE incident_id = ?1 AND file_path = ?2",
        params![incident_id, file_path],
    )?;
    Ok(())
}

fn row_to_incident(row: &rusqlite::Row) -> rusqlite::Result<Incident> {
    let id: String = row.get("id")?;
    let repo_id: String = row.get("repo_id")?;
    let occurred_at: String = row.get("occurred_at")?;
    let resolved_at: Option<String> = row.get("resolved_at")?;
    let severity: String = row.get("severity")?;

    Ok(Incident {
        id: id.parse().unwrap_or_default(),
        repo_id: repo_id.parse().unwrap_or_default(),
        title: row.get("title")?,
        description: row.get("description")?,
        severity: severity_from_str(&severity),
        occurred_at: DateTime::parse_from_rfc3339(&occurred_at)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        resolved_at: resolved_at.and_then(|s| {
            DateTime::parse_from_rfc3339(&s).ok().map(|d| d.with_timezone(&Utc))
        }),
        root_cause: row.get("root_cause")?,
    })
}

/// Ranked full-text search over incidents using FTS5's built-in BM25 rank.
/// Target latency <50ms at 10^5 incidents (spec §4.4) — the inverted index
/// and `content=` external-content table keep this a single index scan.
pub fn search(
    conn: &Connection,
    repo_id: &str,
    query: &str,
    filters: &IncidentSearchFilters,
    limit: u32,
) -> StorageResult<Vec<IncidentSearchResult>> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    // Fixed placeholder positions regardless of which filters are set —
    // `?3 IS NULL OR ...` keeps the statement (and its param count) stable.
    let sql = "SELECT i.*, bm25(incidents_fts) AS rank
         FROM incidents_fts
         JOIN incidents i ON i.rowid = incidents_fts.rowid
         WHERE incidents_fts MATCH ?1 AND i.repo_id = ?2
           AND (?3 IS NULL OR i.severity = ?3)
           AND (?4 IS NULL OR i.occurred_at >= ?4)
         ORDER BY rank LIMIT ?5";

    let mut stmt = conn.prepare(sql)?;
    let severity_param = filters.severity.map(|s| severity_to_str(s).to_string());
    let since_param = filters.since.map(|s| s.to_rfc3339());

    let rows = stmt.query_map(
        params![query, repo_id, severity_param, since_param, limit],
        |row| {
            let incident = row_to_incident(row)?;
            let rank: f64 = row.get("rank")?;
            Ok((incident, rank))
        },
    )?;

    let mut results = Vec::new();
    for row in rows {
        let (incident, rank) = row?;
        let linked_files = linked_files_for(conn, &incident.id.to_string())?;
        results.push(IncidentSearchResult {
            incident,
            // bm25() returns negative scores where lower (more negative) is
            // better; flip sign so callers see higher == more relevant.
            rank: -rank,
            linked_files,
        });
    }
    Ok(results)
}

fn linked_files_for(conn: &Connection, incident_id: &str) -> StorageResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT file_path FROM incident_file_links WHERE incident_id = ?1")?;
    let rows = stmt.query_map(params![incident_id], |r| r.get::<_, String>(0))?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Aggregate stats for a file in a single query (spec §4.2(b)).
pub fn stats(conn: &Connection, repo_id: &str, file_path: &str) -> StorageResult<IncidentStats> {
    let window_start = (Utc::now() - chrono::Duration::days(INCIDENT_STATS_WINDOW_DAYS)).to_rfc3339();

    let (total, last_30d, critical_count, last_incident_at): (
        u32,
        u32,
        u32,
        Option<String>,
    ) = conn.query_row(
        "SELECT
            COUNT(*),
            COUNT(*) FILTER (WHERE i.occurred_at >= ?3),
            COUNT(*) FILTER (WHERE i.severity = 'critical'),
            MAX(i.occurred_at)
         FROM incidents i
         JOIN incident_file_links l ON l.incident_id = i.id
         WHERE i.repo_id = ?1 AND l.file_path = ?2",
        params![repo_id, file_path, window_start],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )?;

    let mut stmt = conn.prepare(
        "SELECT i.title FROM incidents i
         JOIN incident_file_links l ON l.incident_id = i.id
         WHERE i.repo_id = ?1 AND l.file_path = ?2
         ORDER BY i.occurred_at DESC LIMIT ?3",
    )?;
    let rows = stmt.query_map(
        params![repo_id, file_path, RECENT_TITLES_LIMIT as u32],
        |r| r.get::<_, String>(0),
    )?;
    let mut recent_titles = Vec::new();
    for r in rows {
        recent_titles.push(r?);
    }

    Ok(IncidentStats {
        total,
        last_30d,
        critical_count,
        last_incident_at: last_incident_at.and_then(|s| {
            DateTime::parse_from_rfc3339(&s).ok().map(|d| d.with_timezone(&Utc))
        }),
        recent_titles,
    })
}

pub fn get(conn: &Connection, incident_id: &str) -> StorageResult<Option<Incident>> {
    conn.query_row(
        "SELECT * FROM incidents WHERE id = ?1",
        params![incident_id],
        row_to_incident,
    )
    .optional()
    .map_err(StorageError::from)
}
