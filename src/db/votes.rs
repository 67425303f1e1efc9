use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::{db::{self, DBResult}, models};

/////*============== VOTE QUERIES ==============*/
impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::ResultRow {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            election_name: row.get("election_name")?,
            candidate_name: row.get("candidate_name")?,
            vote_count: row.get("vote_count")?,
        })
    }
}

/// Records `ballot`, resolving the election and candidate by name.
///
/// Returns `false` if the user already voted in this election, or if no candidate of that
/// name runs in it.
pub fn insert_vote(connection: &Connection, ballot: &models::Ballot, at: NaiveDateTime) -> DBResult<bool> {
    log::trace!("[insert_vote] Recording vote by {} in {}...", ballot.username, ballot.election_name);

    let query_params = rusqlite::named_params! {
            ":username":       ballot.username,
            ":election_name":  ballot.election_name,
            ":candidate_name": ballot.candidate_name,
            ":vote_time":      at,
    };

    connection
        .prepare(
            "INSERT INTO Votes (username, election_id, candidate_id, vote_time)
             SELECT :username, e.id, c.id, :vote_time
             FROM Elections e
             JOIN Candidates c ON c.election_id = e.id
             WHERE e.name = :election_name
               AND c.name = :candidate_name"
        )?
        .execute(query_params)
        .map_or_else(db::swallow_constraint_violation, |inserted| Ok(inserted > 0))
        .inspect(|&recorded| {
            if recorded {
                log::info!("{} voted in {}.", ballot.username, ballot.election_name);
            } else {
                log::debug!("[insert_vote] No vote recorded for {} in {}.",
                            ballot.username, ballot.election_name);
            }
        })
}

/// Tallies the election called `election_name`.
///
/// Every candidate gets a row, including those without votes. Rows are ordered by vote
/// count, highest first, then by candidate name.
pub fn query_results(connection: &Connection, election_name: &str) -> DBResult<Vec<models::ResultRow>> {
    log::trace!("[query_results] Tallying votes for {election_name}.");

    let mut stmt = connection.prepare(
        "SELECT e.name    AS election_name,
                c.name    AS candidate_name,
                COUNT(v.id) AS vote_count
         FROM Elections e
         JOIN Candidates c ON c.election_id = e.id
         LEFT JOIN Votes v ON v.candidate_id = c.id
         WHERE e.name = :election_name
         GROUP BY c.id, e.name, c.name
         ORDER BY vote_count DESC, candidate_name ASC",
    )?;

    let results = stmt
        .query_map(
            rusqlite::named_params! { ":election_name": election_name },
            |row| models::ResultRow::try_from(row),
        )?
        .collect::<DBResult<Vec<models::ResultRow>>>()?;

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{candidates, elections, users};

    fn setup(candidate_names: &[&str]) -> Connection {
        let connection = db::test_connection();
        for username in ["alice", "bob", "carol"] {
            users::insert_user(&connection, &models::NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: String::from("pw"),
            }).unwrap();
        }

        let election = models::NewElection {
            election_name: String::from("Board"),
            election_description: String::from("description"),
            start_date: String::from("2025-01-01"),
            end_date: String::from("2025-02-01"),
            creator_username: String::from("alice"),
            candidates: Vec::new(),
        };
        let election_id = elections::insert_election(
            &connection,
            &election,
            models::parse_date(&election.start_date).unwrap(),
            models::parse_date(&election.end_date).unwrap(),
        ).unwrap().unwrap();

        for name in candidate_names {
            let candidate = models::NewCandidate {
                name: name.to_string(),
                birth_date: String::from("1975-03-03"),
                occupation: String::from("Farmer"),
                program: String::from("Leeks for all"),
            };
            candidates::insert_candidate(
                &connection,
                election_id,
                &candidate,
                models::parse_date(&candidate.birth_date).unwrap(),
            ).unwrap();
        }

        connection
    }

    fn ballot(username: &str, candidate_name: &str) -> models::Ballot {
        models::Ballot {
            username: username.to_string(),
            election_name: String::from("Board"),
            candidate_name: candidate_name.to_string(),
        }
    }

    fn tally(connection: &Connection) -> Vec<(String, u64)> {
        query_results(connection, "Board")
            .unwrap()
            .into_iter()
            .map(|row| (row.candidate_name, row.vote_count))
            .collect()
    }

    #[test]
    fn second_vote_in_same_election_is_refused() {
        let connection = setup(&["A", "B"]);

        assert!(insert_vote(&connection, &ballot("alice", "A"), db::now()).unwrap());
        assert!(!insert_vote(&connection, &ballot("alice", "A"), db::now()).unwrap());
        assert!(!insert_vote(&connection, &ballot("alice", "B"), db::now()).unwrap());

        assert_eq!(tally(&connection), vec![(String::from("A"), 1), (String::from("B"), 0)]);
    }

    #[test]
    fn vote_for_unknown_candidate_records_nothing() {
        let connection = setup(&["A"]);

        assert!(!insert_vote(&connection, &ballot("alice", "Nobody"), db::now()).unwrap());
        assert!(insert_vote(&connection, &ballot("alice", "A"), db::now()).unwrap());
    }

    #[test]
    fn results_break_ties_by_candidate_name() {
        let connection = setup(&["Cleo", "Bart", "Abe"]);

        insert_vote(&connection, &ballot("alice", "Cleo"), db::now()).unwrap();
        insert_vote(&connection, &ballot("bob", "Bart"), db::now()).unwrap();

        assert_eq!(
            tally(&connection),
            vec![(String::from("Bart"), 1), (String::from("Cleo"), 1), (String::from("Abe"), 0)]
        );
    }

    #[test]
    fn results_for_unknown_election_are_empty() {
        let connection = setup(&["A"]);
        assert!(query_results(&connection, "Nope").unwrap().is_empty());
    }

    #[test]
    fn vote_by_unknown_user_is_a_database_error() {
        let connection = setup(&["A"]);
        assert!(insert_vote(&connection, &ballot("mallory", "A"), db::now()).is_err());
    }
}
