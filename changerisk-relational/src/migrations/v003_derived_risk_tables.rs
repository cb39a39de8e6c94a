//! v003: co-change edges, ownership facts, and the derived risk tables named
//! in spec §6 (`code_block_risk_index`, `code_block_coupling`).

use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS co_change_edges (
            repo_id      TEXT NOT NULL,
            file_a       TEXT NOT NULL,
            file_b       TEXT NOT NULL,
            frequency    REAL NOT NULL,
            co_changes   INTEGER NOT NULL,
            window_days  INTEGER NOT NULL,
            PRIMARY KEY (repo_id, file_a, file_b),
            CHECK (file_a < file_b)
        );

        CREATE INDEX IF NOT EXISTS idx_cochange_a ON co_change_edges(repo_id, file_a);
        CREATE INDEX IF NOT EXISTS idx_cochange_b ON co_change_edges(repo_id, file_b);

        CREATE TABLE IF NOT EXISTS ownership_facts (
            repo_id           TEXT NOT NULL,
            file_path         TEXT NOT NULL,
            current_owner     TEXT,
            previous_owner    TEXT,
            days_since_handoff INTEGER,
            PRIMARY KEY (repo_id, file_path)
        );

        -- Derived: per-block risk properties (original author, familiarity, etc).
        CREATE TABLE IF NOT EXISTS code_block_risk_index (
            repo_id               TEXT NOT NULL,
            file_path             TEXT NOT NULL,
            block_name            TEXT NOT NULL,
            original_author       TEXT,
            last_modifier         TEXT,
            last_modified_at      TEXT,
            incident_count        INTEGER NOT NULL DEFAULT 0,
            semantic_importance   TEXT,
            familiarity_map_json  TEXT NOT NULL DEFAULT '[]',
            PRIMARY KEY (repo_id, file_path, block_name)
        );

        -- Derived: direct IMPORTS-dependent counts per file, used by Phase 1's
        -- coupling metric so it never has to walk the graph for a cheap read.
        CREATE TABLE IF NOT EXISTS code_block_coupling (
            repo_id           TEXT NOT NULL,
            file_path         TEXT NOT NULL,
            dependent_count   INTEGER NOT NULL DEFAULT 0,
            computed_at       TEXT NOT NULL,
            PRIMARY KEY (repo_id, file_path)
        );
        ",
    )
}
