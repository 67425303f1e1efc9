use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

// Accepted input format for election windows and birth dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` string into a timestamp at midnight.
pub fn parse_date(value: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|date| date.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| StoreError::InvalidDate { value: value.to_string() })
}

/// Login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Election {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub creator_username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub occupation: String,
    pub program: String,
}

/// A candidate as submitted alongside a new election. Dates are still raw text.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCandidate {
    pub name: String,
    pub birth_date: String,
    pub occupation: String,
    pub program: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewElection {
    pub election_name: String,
    pub election_description: String,
    pub start_date: String,
    pub end_date: String,
    pub creator_username: String,
    pub candidates: Vec<NewCandidate>,
}

impl NewElection {
    /// Checks a submission the way an interactive front-end should before handing it to
    /// the store: every field filled in, at least one candidate, and a window that closes
    /// after it opens.
    ///
    /// `ElectionStore` does not call this itself.
    pub fn validate(&self) -> Result<(), StoreError> {
        let required = [
            ("election_name", &self.election_name),
            ("election_description", &self.election_description),
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
            ("creator_username", &self.creator_username),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(StoreError::InvalidElection(format!("{field} must not be empty")));
        }

        if self.candidates.is_empty() {
            return Err(StoreError::InvalidElection(String::from(
                "at least 1 candidate is required",
            )));
        }

        for candidate in &self.candidates {
            let fields = [&candidate.name, &candidate.birth_date, &candidate.occupation, &candidate.program];
            if fields.iter().any(|value| value.trim().is_empty()) {
                return Err(StoreError::InvalidElection(String::from(
                    "all candidate details must be filled in",
                )));
            }
        }

        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        if end <= start {
            return Err(StoreError::InvalidElection(String::from(
                "end date must be after start date",
            )));
        }

        Ok(())
    }
}

/// Names an election for candidate listings and result tallies.
#[derive(Debug, Clone, Deserialize)]
pub struct ElectionRef {
    pub election_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ballot {
    pub username: String,
    pub election_name: String,
    pub candidate_name: String,
}

/// One line of an election's tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub election_name: String,
    pub candidate_name: String,
    pub vote_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn election() -> NewElection {
        NewElection {
            election_name: String::from("Board 2025"),
            election_description: String::from("Annual board election"),
            start_date: String::from("2025-01-01"),
            end_date: String::from("2025-01-31"),
            creator_username: String::from("alice"),
            candidates: vec![NewCandidate {
                name: String::from("Ada"),
                birth_date: String::from("1970-05-04"),
                occupation: String::from("Engineer"),
                program: String::from("More tea"),
            }],
        }
    }

    #[test]
    fn parse_date_appends_midnight() {
        let parsed = parse_date("2024-02-29").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-02-29 00:00:00");
    }

    #[test]
    fn parse_date_rejects_bad_month() {
        assert!(matches!(
            parse_date("2024-13-01"),
            Err(StoreError::InvalidDate { value }) if value == "2024-13-01"
        ));
    }

    #[test]
    fn validate_accepts_complete_election() {
        assert!(election().validate().is_ok());
    }

    #[test]
    fn validate_requires_a_candidate() {
        let mut draft = election();
        draft.candidates.clear();
        assert!(matches!(draft.validate(), Err(StoreError::InvalidElection(_))));
    }

    #[test]
    fn validate_requires_end_after_start() {
        let mut draft = election();
        draft.end_date = draft.start_date.clone();
        assert!(matches!(draft.validate(), Err(StoreError::InvalidElection(_))));
    }

    #[test]
    fn validate_reports_malformed_dates() {
        let mut draft = election();
        draft.start_date = String::from("01/01/2025");
        assert!(matches!(draft.validate(), Err(StoreError::InvalidDate { .. })));
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let mut draft = election();
        draft.creator_username = String::from("  ");
        assert!(matches!(draft.validate(), Err(StoreError::InvalidElection(_))));
    }
}
