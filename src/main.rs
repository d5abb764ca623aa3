//! taskcli - single-user task manager for the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskcli::cli::Cli;
use taskcli::cmd::*;
use taskcli::config::Config;
use taskcli::store::TaskStore;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose || std::env::var("TASKCLI_DEBUG").is_ok() {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskcli=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    // Completions never touch the data file.
    if let Some(Commands::Completions { shell }) = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let config = Config::resolve(cli.db);
    let mut store = TaskStore::load(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;

    match cli.command {
        None | Some(Commands::Menu) => {
            println!("Loaded {} task(s) from {}", store.list().len(), store.path().display());
            cmd_menu(&mut store)?;
        }
        Some(Commands::Add { title, desc, category, priority, due }) =>
            cmd_add(&mut store, title, desc, category, priority, due)?,

        Some(Commands::List { category, priority, overdue, pending }) =>
            cmd_list(&store, category, priority, overdue, pending),

        Some(Commands::View { id }) => cmd_view(&store, id)?,

        Some(Commands::Search { query }) => cmd_search(&store, query)?,

        Some(Commands::Edit {
            id, title, desc, category, priority, due,
            clear_category, clear_priority, clear_due, done, undone,
        }) => cmd_edit(&mut store, id, title, desc, category, priority, due,
                       clear_category, clear_priority, clear_due, done, undone)?,

        Some(Commands::Toggle { id }) => cmd_toggle(&mut store, id)?,

        Some(Commands::Delete { id }) => cmd_delete(&mut store, id)?,

        Some(Commands::Overdue) => cmd_overdue(&store),

        Some(Commands::Completions { .. }) => unreachable!("completions handled above"),
    }

    Ok(())
}
