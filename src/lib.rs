//! # taskcli
//!
//! A small, single-user task manager. Tasks live in memory inside a
//! [`store::TaskStore`] and are mirrored to a local JSON file after every
//! change.
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive menu
//! taskcli
//!
//! # One-shot commands
//! taskcli add "Buy milk" --desc "2% milk" --category shopping --priority low
//! taskcli list --overdue
//! taskcli toggle 1
//! ```
//!
//! Data is stored in `./tasks.json` unless `--db` or `TASKCLI_DB` points
//! elsewhere. Set `TASKCLI_DEBUG=1` or pass `--verbose` to log to stderr.
//!
//! ## Library use
//!
//! ```no_run
//! use taskcli::fields::Category;
//! use taskcli::store::TaskStore;
//!
//! # fn main() -> taskcli::error::Result<()> {
//! let mut store = TaskStore::load("tasks.json")?;
//! let task = store.add("Buy milk", "2% milk", Some(Category::Shopping), None, None)?;
//! assert_eq!(store.filter_by_category(Category::Shopping), vec![task]);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod error;
pub mod fields;
pub mod format;
pub mod shell;
pub mod store;
pub mod task;
