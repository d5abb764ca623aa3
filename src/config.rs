//! Runtime configuration resolved once at startup.

use std::path::PathBuf;

/// Default data file name, resolved against the working directory.
pub const DEFAULT_DB_FILE: &str = "tasks.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// Use `db` (from `--db` or `TASKCLI_DB`) when given, else `./tasks.json`.
    pub fn resolve(db: Option<PathBuf>) -> Self {
        let db_path = db.unwrap_or_else(|| {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_DB_FILE)
        });
        Config { db_path }
    }
}
