use chrono::{Local, NaiveDateTime, SubsecRound};
use rusqlite::{Connection, ffi};

pub mod candidates;
pub mod elections;
pub mod schema;
pub mod users;
pub mod votes;

pub type DBResult<T> = Result<T, rusqlite::Error>;

/// Opens the database at `path` with foreign keys enforced.
///
/// SQLite treats `:memory:` as a private in-memory database.
pub fn connect(path: &str) -> DBResult<Connection> {
    log::trace!("[connect] Opening database at {path}...");
    let connection = Connection::open(path)?;
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    Ok(connection)
}

/// Creates every table the store needs, leaving existing ones untouched.
pub fn initialize_db(connection: &Connection) -> DBResult<()> {
    let tables = [
        ("Users", schema::USERS_SCHEMA),
        ("Elections", schema::ELECTIONS_SCHEMA),
        ("Candidates", schema::CANDIDATES_SCHEMA),
        ("Votes", schema::VOTES_SCHEMA),
    ];

    for (name, ddl) in tables {
        log::debug!("[initialize_db] creating {name} table...");
        connection.execute(ddl, [])?;
    }

    Ok(())
}

/// Runs an external DDL script one `;`-separated statement at a time.
///
/// A failing statement is logged and skipped so that re-running a script against an
/// already bootstrapped database is harmless. Returns how many statements succeeded.
pub fn bootstrap_script(connection: &Connection, script: &str) -> usize {
    script
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .filter(|statement| {
            connection
                .execute_batch(statement)
                .inspect_err(|err| {
                    log::warn!("[bootstrap_script] Skipping statement `{statement}`: {err}")
                })
                .is_ok()
        })
        .count()
}

/// Turns a UNIQUE or PRIMARY KEY violation into `Ok(false)`.
///
/// Used as the error arm of `execute(...).map_or_else(...)` for inserts whose conflict is
/// an expected outcome. Any other failure, foreign key violations included, is passed on.
pub fn swallow_constraint_violation(err: rusqlite::Error) -> DBResult<bool> {
    match err {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            log::trace!("[swallow_constraint_violation] Row already present: {err}");
            Ok(false)
        }
        err => Err(err),
    }
}

/// The current local time, truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

#[cfg(test)]
pub(crate) fn test_connection() -> Connection {
    let connection = connect(":memory:").unwrap();
    initialize_db(&connection).unwrap();
    connection
}
