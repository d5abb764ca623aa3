//! Command implementations for the CLI interface.
//!
//! Each subcommand maps onto one store operation. Handlers return store errors
//! to `main`, which prints them and exits non-zero.

use std::io::{self, BufReader};

use chrono::Utc;
use clap::Subcommand;
use clap_complete::{generate, Shell};
use crossterm::style::Stylize;

use crate::error::{Result, TaskError};
use crate::fields::*;
use crate::format::{print_table, write_task};
use crate::shell::{self, parse_optional_due};
use crate::store::TaskStore;
use crate::task::TaskUpdate;

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive menu (the default with no subcommand).
    Menu,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long, default_value = "")]
        desc: String,
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Due date: YYYY-MM-DD, RFC 3339, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Only tasks past their due date and not completed.
        #[arg(long)]
        overdue: bool,
        /// Hide completed tasks.
        #[arg(long)]
        pending: bool,
    },

    /// View a single task by ID.
    View { id: u64 },

    /// Search titles and descriptions, ignoring case.
    Search { query: String },

    /// Update fields on a task. Omitted flags keep their current value.
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum, conflicts_with = "clear_category")]
        category: Option<Category>,
        #[arg(long, value_enum, conflicts_with = "clear_priority")]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_category: bool,
        #[arg(long)]
        clear_priority: bool,
        #[arg(long)]
        clear_due: bool,
        /// Mark completed.
        #[arg(long, conflicts_with = "undone")]
        done: bool,
        /// Mark not completed.
        #[arg(long)]
        undone: bool,
    },

    /// Flip a task between open and completed.
    Toggle { id: u64 },

    /// Delete a task by ID.
    Delete { id: u64 },

    /// Show open tasks past their due date.
    Overdue,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Run the interactive menu on stdin/stdout.
pub fn cmd_menu(store: &mut TaskStore) -> io::Result<()> {
    let stdin = io::stdin();
    let input = BufReader::new(stdin.lock());
    shell::Shell::new(store, input, io::stdout()).run()
}

pub fn cmd_add(
    store: &mut TaskStore,
    title: String,
    desc: String,
    category: Option<Category>,
    priority: Option<Priority>,
    due: Option<String>,
) -> Result<()> {
    let due = parse_optional_due(due.as_deref().unwrap_or(""))?;
    let task = store.add(&title, &desc, category, priority, due)?;
    println!("{}", format!("Added task {}", task.id).green());
    Ok(())
}

pub fn cmd_list(
    store: &TaskStore,
    category: Option<Category>,
    priority: Option<Priority>,
    overdue: bool,
    pending: bool,
) {
    let now = Utc::now();
    let tasks: Vec<_> = store
        .list()
        .into_iter()
        .filter(|t| {
            if pending && t.completed {
                return false;
            }
            if let Some(c) = category {
                if t.category != Some(c) {
                    return false;
                }
            }
            if let Some(p) = priority {
                if t.priority != Some(p) {
                    return false;
                }
            }
            if overdue && !t.is_overdue_at(now) {
                return false;
            }
            true
        })
        .collect();

    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    print_table(&tasks);
}

pub fn cmd_view(store: &TaskStore, id: u64) -> Result<()> {
    let task = store.get(id)?;
    write_task(&mut io::stdout().lock(), task)
        .map_err(|e| TaskError::persistence("write task", e))
}

pub fn cmd_search(store: &TaskStore, query: String) -> Result<()> {
    if query.trim().is_empty() {
        return Err(TaskError::InvalidData("search query cannot be empty".into()));
    }
    let tasks = store.search(query.trim());
    if tasks.is_empty() {
        println!("No tasks found matching your query.");
        return Ok(());
    }
    print_table(&tasks);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_edit(
    store: &mut TaskStore,
    id: u64,
    title: Option<String>,
    desc: Option<String>,
    category: Option<Category>,
    priority: Option<Priority>,
    due: Option<String>,
    clear_category: bool,
    clear_priority: bool,
    clear_due: bool,
    done: bool,
    undone: bool,
) -> Result<()> {
    let due = match due {
        Some(d) => Some(parse_optional_due(&d)?),
        None if clear_due => Some(None),
        None => None,
    };
    let update = TaskUpdate {
        title,
        description: desc,
        category: if clear_category { Some(None) } else { category.map(Some) },
        priority: if clear_priority { Some(None) } else { priority.map(Some) },
        due_date: due,
        completed: if done {
            Some(true)
        } else if undone {
            Some(false)
        } else {
            None
        },
    };
    if update.is_empty() {
        return Err(TaskError::InvalidData("nothing to update".into()));
    }

    let task = store.edit(id, update)?;
    println!("{}", format!("Updated task {}", task.id).green());
    Ok(())
}

pub fn cmd_toggle(store: &mut TaskStore, id: u64) -> Result<()> {
    let task = store.toggle_complete(id)?;
    let state = if task.completed { "completed" } else { "reopened" };
    println!("{}", format!("Task {} {state}", task.id).green());
    Ok(())
}

pub fn cmd_delete(store: &mut TaskStore, id: u64) -> Result<()> {
    store.delete(id)?;
    println!("{}", "Deleted.".green());
    Ok(())
}

pub fn cmd_overdue(store: &TaskStore) {
    let tasks = store.overdue();
    if tasks.is_empty() {
        println!("No overdue tasks!");
        return;
    }
    print_table(&tasks);
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}
