//! Connection setup for the clinic database.
//!
//! # Invariants
//! - Every returned connection is on [`super::migrations::latest_version`].

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy)]
enum Target {
    File,
    Memory,
}

impl Target {
    fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

/// Opens (creating if needed) a database file and migrates it.
///
/// Emits `db_open` events with `duration_ms`.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    connect(Target::File, || Connection::open(path))
}

/// Private in-memory database, migrated. Used by tests and demos.
pub fn open_db_in_memory() -> DbResult<Connection> {
    connect(Target::Memory, Connection::open_in_memory)
}

fn connect(
    target: Target,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.as_str();

    let result = open()
        .map_err(DbError::from)
        .and_then(|mut conn| prepare(target, &mut conn).map(|applied| (conn, applied)));

    match result {
        Ok((conn, applied)) => {
            info!(
                "event=db_open module=db status=ok mode={mode} migrations_applied={applied} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn prepare(target: Target, conn: &mut Connection) -> DbResult<usize> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if let Target::File = target {
        // WAL lets the CLI read while another process writes.
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
    }
    apply_migrations(conn)
}
