use std::collections::HashSet;

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    db,
    error::{StoreError, StoreResult},
    models,
};

pub mod wire;

/// Everything the store knows how to do, each with its own parameters.
#[derive(Debug, Clone)]
pub enum Operation {
    Login(models::Credentials),
    Logout,
    Register(models::NewUser),
    ListElections,
    ListLiveElections,
    ListElectionCandidates(models::ElectionRef),
    ViewResults(models::ElectionRef),
    Vote(models::Ballot),
    CreateElection(models::NewElection),
}

impl Operation {
    /// The wire name of this operation.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Login(_) => "login",
            Operation::Logout => "logout",
            Operation::Register(_) => "register",
            Operation::ListElections => "list_elections",
            Operation::ListLiveElections => "list_live_elections",
            Operation::ListElectionCandidates(_) => "list_election_candidates",
            Operation::ViewResults(_) => "view_results",
            Operation::Vote(_) => "vote",
            Operation::CreateElection(_) => "create_election",
        }
    }
}

/// What a successful operation hands back.
///
/// `Flag(false)` means the operation's precondition did not hold: bad credentials,
/// duplicate user or election, or a vote that was already cast.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Flag(bool),
    Elections(Vec<models::Election>),
    Candidates(Vec<models::Candidate>),
    Results(Vec<models::ResultRow>),
}

/// The user logged in through this session, if any.
///
/// Owned by the caller and threaded through every `ElectionStore::execute`.
#[derive(Debug, Default, Clone)]
pub struct Session {
    user: Option<String>,
}

impl Session {
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

/// Result of probing the backing database.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Health {
    Connected { message: String, database: String },
    Failed { error: String },
}

pub struct ElectionStore {
    connection: Connection,
}

impl ElectionStore {
    /// Opens the database at `path` and makes sure its tables exist.
    pub fn open(path: &str) -> StoreResult<Self> {
        let connection = db::connect(path)?;
        db::initialize_db(&connection)?;

        Ok(Self { connection })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(":memory:")
    }

    /// Applies an external DDL script; see `db::bootstrap_script`.
    pub fn bootstrap(&self, script: &str) -> usize {
        let applied = db::bootstrap_script(&self.connection, script);
        log::info!("[bootstrap] Applied {applied} schema statement(s).");
        applied
    }

    pub fn check_health(&self) -> Health {
        let database = self.connection
            .query_row("SELECT file FROM pragma_database_list WHERE name = 'main'", [], |row| {
                row.get::<_, String>("file")
            });

        match database {
            Ok(file) => Health::Connected {
                message: format!("Connected to SQLite {}!", rusqlite::version()),
                database: if file.is_empty() { String::from(":memory:") } else { file },
            },
            Err(err) => {
                log::error!("[check_health] Database unreachable: {err}");
                Health::Failed { error: err.to_string() }
            }
        }
    }

    pub fn execute(&mut self, session: &mut Session, operation: Operation) -> StoreResult<Outcome> {
        log::debug!("[execute] Running {}...", operation.name());

        match operation {
            Operation::Login(credentials) => self.login(session, &credentials),
            Operation::Logout => Ok(Outcome::Flag(session.user.take().is_some())),
            Operation::Register(user) => {
                Ok(Outcome::Flag(db::users::insert_user(&self.connection, &user)?))
            }
            Operation::ListElections => {
                Ok(Outcome::Elections(db::elections::query_elections(&self.connection)?))
            }
            Operation::ListLiveElections => Ok(Outcome::Elections(
                db::elections::query_live_elections(&self.connection, db::now())?,
            )),
            Operation::ListElectionCandidates(election) => Ok(Outcome::Candidates(
                db::candidates::query_election_candidates(&self.connection, &election.election_name)?,
            )),
            Operation::ViewResults(election) => Ok(Outcome::Results(
                db::votes::query_results(&self.connection, &election.election_name)?,
            )),
            Operation::Vote(ballot) => {
                Ok(Outcome::Flag(db::votes::insert_vote(&self.connection, &ballot, db::now())?))
            }
            Operation::CreateElection(election) => self.create_election(&election).map(Outcome::Flag),
        }
    }

    fn login(&self, session: &mut Session, credentials: &models::Credentials) -> StoreResult<Outcome> {
        if !db::users::check_password(&self.connection, credentials)? {
            log::info!("Failed login attempt for {}.", credentials.username);
            return Ok(Outcome::Flag(false));
        }

        db::users::update_last_login(&self.connection, &credentials.username, db::now())?;
        session.user = Some(credentials.username.clone());
        log::info!("{} logged in.", credentials.username);

        Ok(Outcome::Flag(true))
    }

    /// Inserts the election and its candidates in one transaction.
    ///
    /// Every date is parsed before anything is written. Returns `false` if the name is taken.
    fn create_election(&mut self, election: &models::NewElection) -> StoreResult<bool> {
        let start_time = models::parse_date(&election.start_date)?;
        let end_time = models::parse_date(&election.end_date)?;

        let mut seen = HashSet::new();
        let candidates = election.candidates
            .iter()
            .map(|candidate| {
                if !seen.insert(candidate.name.as_str()) {
                    return Err(StoreError::DuplicateCandidate(candidate.name.clone()));
                }
                Ok((candidate, models::parse_date(&candidate.birth_date)?))
            })
            .collect::<StoreResult<Vec<_>>>()?;

        // Dropping `tx` without committing rolls everything back.
        let tx = self.connection.transaction()?;

        let Some(election_id) = db::elections::insert_election(&tx, election, start_time, end_time)? else {
            log::info!("Election {} already exists.", election.election_name);
            return Ok(false);
        };

        for (candidate, birth_date) in candidates {
            db::candidates::insert_candidate(&tx, election_id, candidate, birth_date)?;
        }

        tx.commit()?;
        log::info!(
            "Election {} created by {} with {} candidate(s).",
            election.election_name, election.creator_username, election.candidates.len()
        );

        Ok(true)
    }
}
