use anyhow::{Context, Result};

use std::env;

const DEFAULT_DB_PATH: &str = "ballotbox.db";

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    /// `$BALLOTBOX_DB`: SQLite file to open. `:memory:` keeps everything in memory.
    pub db_path: String,
    /// `$BALLOTBOX_SCHEMA`: optional DDL script applied after the built-in tables.
    pub schema_script: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let db_path = env::var("BALLOTBOX_DB").unwrap_or_else(|_| {
            log::warn!("$BALLOTBOX_DB not defined, defaulting to {DEFAULT_DB_PATH}");
            String::from(DEFAULT_DB_PATH)
        });

        Self {
            db_path,
            schema_script: env::var("BALLOTBOX_SCHEMA").ok().filter(|path| !path.is_empty()),
        }
    }

    /// Reads the configured schema script, if there is one.
    pub fn read_schema_script(&self) -> Result<Option<String>> {
        self.schema_script
            .as_deref()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("No such file or directory: {}", path))
            })
            .transpose()
    }
}
