use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{StoreError, StoreResult},
    store::{Operation, Outcome},
};

/// `{"process": <operation name>, "values": {<params>}}`
#[derive(Debug, Deserialize)]
pub struct Request {
    pub process: String,
    #[serde(default)]
    pub values: Value,
}

/// `{"response": <result>}` on success, `{"error": <message>}` otherwise.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success { response: Outcome },
    Failure { error: String },
}

impl From<StoreResult<Outcome>> for Response {
    fn from(result: StoreResult<Outcome>) -> Self {
        match result {
            Ok(response) => Response::Success { response },
            Err(err) => Response::Failure { error: err.to_string() },
        }
    }
}

impl TryFrom<Request> for Operation {
    type Error = StoreError;

    fn try_from(request: Request) -> Result<Self, Self::Error> {
        let values = request.values;
        let operation = match request.process.as_str() {
            "login" => Operation::Login(serde_json::from_value(values)?),
            "logout" => Operation::Logout,
            "register" => Operation::Register(serde_json::from_value(values)?),
            "list_elections" => Operation::ListElections,
            "list_live_elections" => Operation::ListLiveElections,
            "list_election_candidates" => {
                Operation::ListElectionCandidates(serde_json::from_value(values)?)
            }
            "view_results" => Operation::ViewResults(serde_json::from_value(values)?),
            "vote" => Operation::Vote(serde_json::from_value(values)?),
            "create_election" => Operation::CreateElection(serde_json::from_value(values)?),
            _ => {
                log::info!("Request for unknown operation: {}", request.process);
                return Err(StoreError::UnknownOperation(request.process.clone()));
            }
        };

        Ok(operation)
    }
}

/// Decodes one JSON request line into an operation.
pub fn parse_request(line: &str) -> StoreResult<Operation> {
    serde_json::from_str::<Request>(line)?.try_into()
}
