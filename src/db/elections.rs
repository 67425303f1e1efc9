use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::{db::{self, DBResult}, models};

/////*============== ELECTION QUERIES ==============*/
impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::Election {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            creator_username: row.get("creator_username")?,
        })
    }
}

/// Gathers every election, oldest first.
pub fn query_elections(connection: &Connection) -> DBResult<Vec<models::Election>> {
    log::trace!("[query_elections] Querying all elections.");

    let mut stmt = connection.prepare(
        "SELECT id, name, description, start_time, end_time, creator_username
         FROM Elections
         ORDER BY id",
    )?;

    let elections = stmt
        .query_map([], |row| models::Election::try_from(row))?
        .collect::<DBResult<Vec<models::Election>>>()?;

    Ok(elections)
}

/// Gathers the elections whose window contains `at`, bounds included.
pub fn query_live_elections(connection: &Connection, at: NaiveDateTime) -> DBResult<Vec<models::Election>> {
    log::trace!("[query_live_elections] Querying elections open at {at}.");

    let mut stmt = connection.prepare(
        "SELECT id, name, description, start_time, end_time, creator_username
         FROM Elections
         WHERE start_time <= :at
           AND end_time   >= :at
         ORDER BY id",
    )?;

    let elections = stmt
        .query_map(rusqlite::named_params! { ":at": at }, |row| models::Election::try_from(row))?
        .collect::<DBResult<Vec<models::Election>>>()?;

    Ok(elections)
}

/// Inserts a new election row.
///
/// Returns the generated id, or `None` if an election with the same name already exists.
pub fn insert_election(
    connection: &Connection,
    election: &models::NewElection,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
) -> DBResult<Option<i64>>
{
    log::trace!("[insert_election] Inserting election {} into Elections...", election.election_name);

    let query_params = rusqlite::named_params! {
            ":name":             election.election_name,
            ":description":      election.election_description,
            ":start_time":       start_time,
            ":end_time":         end_time,
            ":creator_username": election.creator_username,
    };

    let inserted = connection
        .prepare(
            "INSERT INTO Elections ( name,  description,  start_time,  end_time,  creator_username)
             VALUES                (:name, :description, :start_time, :end_time, :creator_username)"
        )?
        .execute(query_params)
        .map_or_else(db::swallow_constraint_violation, |_| Ok(true))?;

    Ok(inserted.then(|| connection.last_insert_rowid()))
}
