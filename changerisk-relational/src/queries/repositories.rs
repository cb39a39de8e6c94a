//! Repository, file, and developer CRUD — the minimal surface the temporal
//! analyzer and incident store need; commit ingestion itself lives outside
//! the core (spec §1: ingestion is an external collaborator).

use changerisk_core::model::{Developer, FileRecord, Repository};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::StorageResult;

pub fn upsert_repository(conn: &Connection, repo: &Repository) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO repositories (id, owner, name, full_name, default_branch)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            owner = excluded.owner, name = excluded.name,
            full_name = excluded.full_name, default_branch = excluded.default_branch",
        params![
            repo.id.to_string(),
            repo.owner,
            repo.name,
            repo.full_name,
            repo.default_branch,
        ],
    )?;
    Ok(())
}

pub fn get_repository(conn: &Connection, id: &str) -> StorageResult<Option<Repository>> {
    conn.query_row(
        "SELECT id, owner, name, full_name, default_branch FROM repositories WHERE id = ?1",
        params![id],
        |row| {
            let id: String = row.get(0)?;
            Ok(Repository {
                id: id.parse().unwrap_or_default(),
                owner: row.get(1)?,
                name: row.get(2)?,
                full_name: row.get(3)?,
                default_branch: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

pub fn upsert_file(conn: &Connection, file: &FileRecord) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO files (repo_id, path, language, live)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(repo_id, path) DO UPDATE SET
            language = excluded.language, live = excluded.live",
        params![
            file.repo_id.to_string(),
            file.path,
            file.language,
            file.live,
        ],
    )?;
    for (ordinal, prior) in file.historical_paths.iter().enumerate() {
        conn.execute(
            "INSERT OR REPLACE INTO file_historical_paths (repo_id, path, prior_path, ordinal)
             VALUES (?1, ?2, ?3, ?4)",
            params![file.repo_id.to_string(), file.path, prior, ordinal as u32],
        )?;
    }
    Ok(())
}

pub fn upsert_developer(conn: &Connection, dev: &Developer) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO developers (repo_id, email, commit_count, last_active_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(repo_id, email) DO UPDATE SET
            commit_count = excluded.commit_count, last_active_at = excluded.last_active_at",
        params![
            dev.repo_id.to_string(),
            dev.email,
            dev.commit_count,
            dev.last_active_at.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}

pub fn file_exists(conn: &Connection, repo_id: &str, path: &str) -> StorageResult<bool> {
    Ok(conn
        .query_row(
            "SELECT 1 FROM files WHERE repo_id = ?1 AND path = ?2",
            params![repo_id, path],
            |_| Ok(()),
        )
        .optional()?
        .is_some())
}
