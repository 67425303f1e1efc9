use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use ballotbox::{
    config::Config,
    store::wire::{self, Response},
    ElectionStore, Operation, Session, StoreResult,
};

/// Runs one request line against the store.
///
/// New elections get the same checks an interactive front-end would apply before they
/// reach the store.
fn handle_line(store: &mut ElectionStore, session: &mut Session, line: &str) -> Response {
    let result: StoreResult<_> = wire::parse_request(line).and_then(|operation| {
        if let Operation::CreateElection(election) = &operation {
            election.validate()?;
        }
        store.execute(session, operation)
    });

    if let Err(err) = &result {
        log::warn!("Request failed: {err}");
    }

    Response::from(result)
}

fn main() -> Result<()> {
    // Begin logger
    env_logger::init();

    let config = Config::from_env();
    log::info!("Opening election database at {}", config.db_path);

    let mut store = ElectionStore::open(&config.db_path)
        .with_context(|| format!("Could not open database {}", config.db_path))?;

    if let Some(script) = config.read_schema_script()? {
        store.bootstrap(&script);
    }

    let mut session = Session::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // One JSON request per line in, one JSON response per line out.
    for line in io::stdin().lock().lines() {
        let line = line.context("Could not read request from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = if line == "health" {
            serde_json::to_string(&store.check_health())?
        } else {
            serde_json::to_string(&handle_line(&mut store, &mut session, line))?
        };

        writeln!(out, "{reply}")?;
        out.flush()?;
    }

    Ok(())
}
