//! Commit ingestion (relational is the source of truth) and the windowed
//! read the Temporal Analyzer walks.

use changerisk_core::model::{Commit, FilePatch};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::errors::StorageResult;

pub fn insert_commit(conn: &Connection, commit: &Commit) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO commits (repo_id, sha, author_email, author_name, authored_at, message, additions, deletions, processed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(repo_id, sha) DO UPDATE SET processed_at = excluded.processed_at",
        params![
            commit.repo_id.to_string(),
            commit.sha,
            commit.author_email,
            commit.author_name,
            commit.authored_at.to_rfc3339(),
            commit.message,
            commit.additions,
            commit.deletions,
            commit.processed_at.map(|t| t.to_rfc3339()),
        ],
    )?;
    for patch in &commit.file_patches {
        conn.execute(
            "INSERT INTO commit_file_patches (repo_id, sha, path, additions, deletions, is_delete)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(repo_id, sha, path) DO UPDATE SET
                additions = excluded.additions, deletions = excluded.deletions, is_delete = excluded.is_delete",
            params![
                commit.repo_id.to_string(),
                commit.sha,
                patch.path,
                patch.additions,
                patch.deletions,
                patch.is_delete,
            ],
        )?;
    }
    Ok(())
}

/// Commits authored within `[since, now]`, ordered ascending, each carrying
/// its touched-file patch list (spec §4.3 step 1).
pub fn commits_in_window(
    conn: &Connection,
    repo_id: &str,
    since: DateTime<Utc>,
) -> StorageResult<Vec<Commit>> {
    let mut stmt = conn.prepare(
        "SELECT sha, author_email, author_name, authored_at, message, additions, deletions, processed_at
         FROM commits WHERE repo_id = ?1 AND authored_at >= ?2 ORDER BY authored_at ASC",
    )?;
    let rows = stmt.query_map(params![repo_id, since.to_rfc3339()], |row| {
        let authored_at: String = row.get(3)?;
        let processed_at: Option<String> = row.get(7)?;
        Ok(Commit {
            repo_id: repo_id.parse().unwrap_or_default(),
            sha: row.get(0)?,
            author_email: row.get(1)?,
            author_name: row.get(2)?,
            authored_at: DateTime::parse_from_rfc3339(&authored_at)
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            message: row.get(4)?,
            file_patches: Vec::new(),
            additions: row.get(5)?,
            deletions: row.get(6)?,
            processed_at: processed_at.and_then(|s| {
                DateTime::parse_from_rfc3339(&s).ok().map(|d| d.with_timezone(&Utc))
            }),
        })
    })?;

    let mut commits = Vec::new();
    for r in rows {
        commits.push(r?);
    }

    for commit in &mut commits {
        let mut patch_stmt = conn.prepare(
            "SELECT path, additions, deletions, is_delete FROM commit_file_patches
             WHERE repo_id = ?1 AND sha = ?2",
        )?;
        let patch_rows = patch_stmt.query_map(params![repo_id, commit.sha], |row| {
            Ok(FilePatch {
                path: row.get(0)?,
                additions: row.get(1)?,
                deletions: row.get(2)?,
                is_delete: row.get(3)?,
            })
        })?;
        for p in patch_rows {
            commit.file_patches.push(p?);
        }
    }

    Ok(commits)
}
