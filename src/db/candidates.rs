use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::{db::DBResult, models};

/////*============== CANDIDATE QUERIES ==============*/
impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::Candidate {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            birth_date: row.get::<_, NaiveDateTime>("birth_date")?.date(),
            occupation: row.get("occupation")?,
            program: row.get("program")?,
        })
    }
}

/// Gathers the candidates running in the election called `election_name`, in the order
/// they were added.
pub fn query_election_candidates(
    connection: &Connection,
    election_name: &str,
) -> DBResult<Vec<models::Candidate>>
{
    log::trace!("[query_election_candidates] Querying candidates for {election_name}.");

    let mut stmt = connection.prepare(
        "SELECT c.id, c.name, c.birth_date, c.occupation, c.program
         FROM Candidates c
         JOIN Elections e ON c.election_id = e.id
         WHERE e.name = :election_name
         ORDER BY c.id",
    )?;

    let candidates = stmt
        .query_map(
            rusqlite::named_params! { ":election_name": election_name },
            |row| models::Candidate::try_from(row),
        )?
        .collect::<DBResult<Vec<models::Candidate>>>()?;

    Ok(candidates)
}

/// Attaches `candidate` to the election with id `election_id`.
///
/// Fails with a constraint violation if the election already has a candidate of that name.
pub fn insert_candidate(
    connection: &Connection,
    election_id: i64,
    candidate: &models::NewCandidate,
    birth_date: NaiveDateTime,
) -> DBResult<i64>
{
    log::trace!("[insert_candidate] Inserting candidate {} for election {election_id}...",
                candidate.name);

    let query_params = rusqlite::named_params! {
            ":name":        candidate.name,
            ":birth_date":  birth_date,
            ":occupation":  candidate.occupation,
            ":program":     candidate.program,
            ":election_id": election_id,
    };

    connection
        .prepare(
            "INSERT INTO Candidates ( name,  birth_date,  occupation,  program,  election_id)
             VALUES                 (:name, :birth_date, :occupation, :program, :election_id)"
        )?
        .execute(query_params)?;

    Ok(connection.last_insert_rowid())
}
