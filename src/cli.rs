use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed task manager CLI.
/// Storage defaults to ./tasks.json or a path passed via --db.
/// Run without a subcommand for the interactive menu.
#[derive(Parser)]
#[command(name = "taskcli", version, about = "Daily task management CLI")]
pub struct Cli {
    /// Path to the JSON database file.
    #[arg(long, global = true, env = "TASKCLI_DB")]
    pub db: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
