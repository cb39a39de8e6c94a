//! v001: repositories, commits, files, code blocks, modifications, developers.

use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS repositories (
            id            TEXT PRIMARY KEY,
            owner         TEXT NOT NULL,
            name          TEXT NOT NULL,
            full_name     TEXT NOT NULL UNIQUE,
            default_branch TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS commits (
            repo_id      TEXT NOT NULL REFERENCES repositories(id),
            sha          TEXT NOT NULL,
            author_email TEXT NOT NULL,
            author_name  TEXT NOT NULL,
            authored_at  TEXT NOT NULL,
            message      TEXT NOT NULL,
            additions    INTEGER NOT NULL DEFAULT 0,
            deletions    INTEGER NOT NULL DEFAULT 0,
            processed_at TEXT,
            PRIMARY KEY (repo_id, sha)
        );

        CREATE INDEX IF NOT EXISTS idx_commits_authored_at ON commits(repo_id, authored_at);

        CREATE TABLE IF NOT EXISTS commit_file_patches (
            repo_id    TEXT NOT NULL,
            sha        TEXT NOT NULL,
            path       TEXT NOT NULL,
            additions  INTEGER NOT NULL DEFAULT 0,
            deletions  INTEGER NOT NULL DEFAULT 0,
            is_delete  INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (repo_id, sha, path),
            FOREIGN KEY (repo_id, sha) REFERENCES commits(repo_id, sha)
        );

        CREATE INDEX IF NOT EXISTS idx_patches_path ON commit_file_patches(repo_id, path);

        CREATE TABLE IF NOT EXISTS files (
            repo_id  TEXT NOT NULL REFERENCES repositories(id),
            path     TEXT NOT NULL,
            language TEXT,
            live     INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (repo_id, path)
        );

        CREATE TABLE IF NOT EXISTS file_historical_paths (
            repo_id     TEXT NOT NULL,
            path        TEXT NOT NULL,
            prior_path  TEXT NOT NULL,
            ordinal     INTEGER NOT NULL,
            PRIMARY KEY (repo_id, path, ordinal),
            FOREIGN KEY (repo_id, path) REFERENCES files(repo_id, path)
        );

        CREATE TABLE IF NOT EXISTS code_blocks (
            repo_id        TEXT NOT NULL,
            file_path      TEXT NOT NULL,
            block_name     TEXT NOT NULL,
            signature      TEXT NOT NULL,
            block_type     TEXT NOT NULL,
            line_start     INTEGER NOT NULL,
            line_end       INTEGER NOT NULL,
            first_seen_sha TEXT NOT NULL,
            status         TEXT NOT NULL,
            evolved_from   TEXT,
            PRIMARY KEY (repo_id, file_path, block_name)
        );

        CREATE TABLE IF NOT EXISTS code_block_modifications (
            repo_id                TEXT NOT NULL,
            file_path              TEXT NOT NULL,
            block_name             TEXT NOT NULL,
            commit_sha             TEXT NOT NULL,
            developer_email        TEXT NOT NULL,
            added                  INTEGER NOT NULL DEFAULT 0,
            deleted                INTEGER NOT NULL DEFAULT 0,
            modified_at            TEXT NOT NULL,
            raw_llm_classification TEXT,
            refactor_only          INTEGER,
            PRIMARY KEY (repo_id, file_path, block_name, commit_sha),
            FOREIGN KEY (repo_id, file_path, block_name)
                REFERENCES code_blocks(repo_id, file_path, block_name)
        );

        CREATE INDEX IF NOT EXISTS idx_block_mods_time
            ON code_block_modifications(repo_id, modified_at);

        CREATE TABLE IF NOT EXISTS developers (
            repo_id        TEXT NOT NULL,
            email          TEXT NOT NULL,
            commit_count   INTEGER NOT NULL DEFAULT 0,
            last_active_at TEXT,
            PRIMARY KEY (repo_id, email)
        );
        ",
    )
}
