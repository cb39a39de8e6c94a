//! Migration runner — version tracking, forward-only, one transaction per
//! migration. Pattern reference: cortex-storage's `migrations/mod.rs`.

mod v001_initial_schema;
mod v002_incident_fts5;
mod v003_derived_risk_tables;

use rusqlite::Connection;

pub const LATEST_VERSION: u32 = 3;

type MigrationFn = fn(&Connection) -> rusqlite::Result<()>;

const MIGRATIONS: [(u32, &str, MigrationFn); 3] = [
    (1, "initial_schema", v001_initial_schema::migrate),
    (2, "incident_fts5", v002_incident_fts5::migrate),
    (3, "derived_risk_tables", v003_derived_risk_tables::migrate),
];

pub fn current_version(conn: &Connection) -> rusqlite::Result<u32> {
    let exists: bool = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version'")?
        .exists([])?;
    if !exists {
        return Ok(0);
    }
    conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
}

pub fn run_all(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )?;

    let current = current_version(conn)?;
    for (version, name, migrate) in MIGRATIONS {
        if version <= current {
            continue;
        }
        conn.execute_batch("BEGIN;")?;
        match migrate(conn).and_then(|_| {
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [version],
            )
        }) {
            Ok(_) => {
                conn.execute_batch("COMMIT;")?;
                tracing::debug!(version, name, "migration applied");
            }
            Err(e) => {
                conn.execute_batch("ROLLBACK;")?;
                return Err(e);
            }
        }
    }
    Ok(())
}
