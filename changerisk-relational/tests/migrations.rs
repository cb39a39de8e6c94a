use changerisk_relational::migrations;
use rusqlite::Connection;

#[test]
fn running_migrations_twice_is_a_no_op() {
    let conn = Connection::open_in_memory().unwrap();
    migrations::run_all(&conn).unwrap();
    let version_after_first = migrations::current_version(&conn).unwrap();
    migrations::run_all(&conn).unwrap();
    let version_after_second = migrations::current_version(&conn).unwrap();

    assert_eq!(version_after_first, migrations::LATEST_VERSION);
    assert_eq!(version_after_first, version_after_second);
}

#[test]
fn schema_reaches_latest_version_from_scratch() {
    let conn = Connection::open_in_memory().unwrap();
    migrations::run_all(&conn).unwrap();
    assert_eq!(migrations::current_version(&conn).unwrap(), migrations::LATEST_VERSION);

    // derived-risk tables from v003 should exist
    conn.execute("INSERT INTO co_change_edges (repo_id, file_a, file_b, frequency, co_changes, window_days) VALUES ('r', 'a.rs', 'b.rs', 0.5, 5, 90)", []).unwrap();
}
