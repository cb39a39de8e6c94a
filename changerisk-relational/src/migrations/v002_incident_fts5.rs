//! v002: incidents, incident-file links, and an FTS5 index over incidents
//! auto-maintained by triggers (title + description + root_cause, never
//! null per invariant 4 — the search vector column is generated at query
//! time from the trigger-synced content table, not stored redundantly).

use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS incidents (
            id           TEXT PRIMARY KEY,
            repo_id      TEXT NOT NULL,
            title        TEXT NOT NULL,
            description  TEXT NOT NULL,
            severity     TEXT NOT NULL,
            occurred_at  TEXT NOT NULL,
            resolved_at  TEXT,
            root_cause   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_incidents_occurred
            ON incidents(repo_id, occurred_at);
        CREATE INDEX IF NOT EXISTS idx_incidents_severity
            ON incidents(repo_id, severity);

        CREATE TABLE IF NOT EXISTS incident_file_links (
            incident_id TEXT NOT NULL REFERENCES incidents(id) ON DELETE CASCADE,
            file_path   TEXT NOT NULL,
            line_number INTEGER,
            function    TEXT,
            confidence  REAL NOT NULL DEFAULT 1.0,
            PRIMARY KEY (incident_id, file_path)
        );

        CREATE INDEX IF NOT EXISTS idx_incident_links_file
            ON incident_file_links(file_path);

        CREATE VIRTUAL TABLE IF NOT EXISTS incidents_fts USING fts5(
            title, description, root_cause,
            content='incidents', content_rowid='rowid'
        );

        CREATE TRIGGER IF NOT EXISTS incidents_ai AFTER INSERT ON incidents BEGIN
            INSERT INTO incidents_fts(rowid, title, description, root_cause)
            VALUES (new.rowid, new.title, new.description, new.root_cause);
        END;

        CREATE TRIGGER IF NOT EXISTS incidents_ad AFTER DELETE ON incidents BEGIN
            INSERT INTO incidents_fts(incidents_fts, rowid, title, description, root_cause)
            VALUES ('delete', old.rowid, old.title, old.description, old.root_cause);
        END;

        CREATE TRIGGER IF NOT EXISTS incidents_au AFTER UPDATE ON incidents BEGIN
            INSERT INTO incidents_fts(incidents_fts, rowid, title, description, root_cause)
            VALUES ('delete', old.rowid, old.title, old.description, old.root_cause);
            INSERT INTO incidents_fts(rowid, title, description, root_cause)
            VALUES (new.rowid, new.title, new.description, new.root_cause);
        END;
        ",
    )
}
