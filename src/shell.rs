//! Interactive menu loop.
//!
//! The shell reads one choice at a time, runs the matching flow against the
//! store, and returns to the menu. Store errors are printed and never end the
//! loop; only I/O failures on the terminal itself escape `run`.

use std::io::{self, BufRead, ErrorKind, Write};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use crossterm::style::Stylize;

use crate::dates::parse_due_input;
use crate::error::{Result, TaskError};
use crate::fields::{Category, Priority};
use crate::format::{write_task, write_tasks};
use crate::store::TaskStore;
use crate::task::TaskUpdate;

const MENU_ITEMS: [&str; 10] = [
    "Add Tasks",
    "List All Tasks",
    "Toggle Task Complete",
    "Edit Task",
    "Delete Task",
    "Search Tasks",
    "Filter By Category",
    "Show Overdue Tasks",
    "Exit",
    "Filter By Priority",
];

/// Menu-driven front end over a [`TaskStore`].
pub struct Shell<'a, R, W> {
    store: &'a mut TaskStore,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(store: &'a mut TaskStore, input: R, out: W) -> Self {
        Shell { store, input, out }
    }

    /// Run until the user picks Exit or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.display_menu()?;
            let outcome = match self.prompt("Choose an option: ") {
                Ok(choice) => self.dispatch(choice.trim()),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(true) => continue,
                Ok(false) => break,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
        }
        writeln!(self.out, "\nGoodbye!")?;
        self.out.flush()
    }

    /// Returns `false` when the loop should stop.
    fn dispatch(&mut self, choice: &str) -> io::Result<bool> {
        match choice {
            "1" => self.add_flow()?,
            "2" => self.list_flow()?,
            "3" => self.toggle_flow()?,
            "4" => self.edit_flow()?,
            "5" => self.delete_flow()?,
            "6" => self.search_flow()?,
            "7" => self.filter_category_flow()?,
            "8" => self.overdue_flow()?,
            "9" => return Ok(false),
            "10" => self.filter_priority_flow()?,
            _ => writeln!(self.out, "\nInvalid option. Please try again.")?,
        }
        Ok(true)
    }

    fn display_menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n=== Task Manager CLI ===")?;
        for (i, item) in MENU_ITEMS.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, item)?;
        }
        writeln!(self.out)
    }

    /// Print `query` and read one line, without its line ending.
    fn prompt(&mut self, query: &str) -> io::Result<String> {
        write!(self.out, "{query}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn success(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "\n{}", format!("✓ {msg}").green())
    }

    fn failure(&mut self, err: &TaskError) -> io::Result<()> {
        writeln!(self.out, "{}", format!("Error: {err}").red())
    }

    fn add_flow(&mut self) -> io::Result<()> {
        let title = self.prompt("Task Title: ")?;
        let description = self.prompt("Task Description: ")?;
        let category = self.prompt("Category (work/personal/shopping/health/other) [optional]: ")?;
        let priority = self.prompt("Priority (low/medium/high) [optional]: ")?;
        let due = self.prompt("Due Date [YYYY-MM-DD] [optional]: ")?;

        let added = parse_optional::<Category>(&category).and_then(|category| {
            let priority = parse_optional::<Priority>(&priority)?;
            let due = parse_optional_due(&due)?;
            self.store.add(&title, &description, category, priority, due)
        });

        match added {
            Ok(task) => {
                self.success("Task added successfully!")?;
                write_task(&mut self.out, &task)
            }
            Err(e) => self.failure(&e),
        }
    }

    fn list_flow(&mut self) -> io::Result<()> {
        let tasks = self.store.list();
        if tasks.is_empty() {
            return writeln!(self.out, "\nNo tasks found.");
        }
        writeln!(self.out, "\n=== All Tasks ===\n")?;
        write_tasks(&mut self.out, &tasks)
    }

    fn toggle_flow(&mut self) -> io::Result<()> {
        let raw = self.prompt("Enter Task ID: ")?;
        match parse_id(&raw).and_then(|id| self.store.toggle_complete(id)) {
            Ok(task) => {
                self.success("Task updated!")?;
                write_task(&mut self.out, &task)
            }
            Err(e) => self.failure(&e),
        }
    }

    fn edit_flow(&mut self) -> io::Result<()> {
        let raw = self.prompt("Enter Task ID: ")?;
        let id = match parse_id(&raw).and_then(|id| self.store.get(id).map(|t| t.id)) {
            Ok(id) => id,
            Err(e) => return self.failure(&e),
        };

        let title = self.prompt("New title (leave empty to keep current): ")?;
        let description = self.prompt("New description (leave empty to keep current): ")?;
        let category =
            self.prompt("New category (work/personal/shopping/health/other) [optional]: ")?;
        let priority = self.prompt("New priority (low/medium/high) [optional]: ")?;
        let due = self.prompt("New due date (YYYY-MM-DD) [optional]: ")?;
        let completed = self.prompt("Completed? (y/n) [optional]: ")?;

        let edited = build_update(&title, &description, &category, &priority, &due, &completed)
            .and_then(|update| self.store.edit(id, update));

        match edited {
            Ok(task) => {
                self.success("Task edited successfully!")?;
                write_task(&mut self.out, &task)
            }
            Err(e) => self.failure(&e),
        }
    }

    fn delete_flow(&mut self) -> io::Result<()> {
        let raw = self.prompt("Enter Task ID: ")?;
        match parse_id(&raw).and_then(|id| self.store.delete(id)) {
            Ok(()) => self.success("Task deleted successfully!"),
            Err(e) => self.failure(&e),
        }
    }

    fn search_flow(&mut self) -> io::Result<()> {
        let query = self.prompt("Search query: ")?;
        if query.trim().is_empty() {
            return writeln!(self.out, "invalid input");
        }

        let tasks = self.store.search(query.trim());
        if tasks.is_empty() {
            writeln!(self.out, "\nNo tasks found matching your query.")?;
        }
        writeln!(self.out, "\n=== Search Results ({}) ===\n", tasks.len())?;
        write_tasks(&mut self.out, &tasks)
    }

    fn filter_category_flow(&mut self) -> io::Result<()> {
        let raw = self.prompt("Category (work/personal/shopping/health/other): ")?;
        if raw.trim().is_empty() {
            return writeln!(self.out, "invalid input");
        }
        let category = match raw.parse::<Category>() {
            Ok(c) => c,
            Err(e) => return self.failure(&e),
        };

        let tasks = self.store.filter_by_category(category);
        if tasks.is_empty() {
            return writeln!(self.out, "\nNo tasks found in this category.");
        }
        writeln!(self.out, "\n=== {category} Tasks ===\n")?;
        write_tasks(&mut self.out, &tasks)
    }

    fn filter_priority_flow(&mut self) -> io::Result<()> {
        let raw = self.prompt("Priority (low/medium/high): ")?;
        if raw.trim().is_empty() {
            return writeln!(self.out, "invalid input");
        }
        let priority = match raw.parse::<Priority>() {
            Ok(p) => p,
            Err(e) => return self.failure(&e),
        };

        let tasks = self.store.filter_by_priority(priority);
        if tasks.is_empty() {
            return writeln!(self.out, "\nNo tasks found with this priority.");
        }
        writeln!(self.out, "\n=== {priority} Priority Tasks ===\n")?;
        write_tasks(&mut self.out, &tasks)
    }

    fn overdue_flow(&mut self) -> io::Result<()> {
        let tasks = self.store.overdue();
        if tasks.is_empty() {
            return writeln!(self.out, "\nNo overdue tasks!");
        }
        writeln!(self.out, "\n=== Overdue Tasks ===\n")?;
        write_tasks(&mut self.out, &tasks)
    }
}

pub fn parse_id(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| TaskError::InvalidData(format!("'{}' is not a valid task id", raw.trim())))
}

/// Blank input means "not set".
fn parse_optional<T>(raw: &str) -> Result<Option<T>>
where
    T: FromStr<Err = TaskError>,
{
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

pub fn parse_optional_due(raw: &str) -> Result<Option<DateTime<Utc>>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_due_input(raw).map(Some).ok_or_else(|| {
        TaskError::InvalidData(format!(
            "unrecognised due date '{}'. Use YYYY-MM-DD, 'today', 'tomorrow', or 'in Nd'",
            raw.trim()
        ))
    })
}

/// Build an edit from prompt answers. Blank answers keep the current value.
fn build_update(
    title: &str,
    description: &str,
    category: &str,
    priority: &str,
    due: &str,
    completed: &str,
) -> Result<TaskUpdate> {
    let non_blank = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());

    let completed = match completed.trim().to_lowercase().as_str() {
        "" => None,
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        other => {
            return Err(TaskError::InvalidData(format!(
                "expected y or n for completed, got '{other}'"
            )))
        }
    };

    Ok(TaskUpdate {
        title: non_blank(title),
        description: non_blank(description),
        category: parse_optional::<Category>(category)?.map(Some),
        priority: parse_optional::<Priority>(priority)?.map(Some),
        due_date: parse_optional_due(due)?.map(Some),
        completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_script(store: &mut TaskStore, script: &str) -> String {
        let mut out = Vec::new();
        Shell::new(store, Cursor::new(script.as_bytes()), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn temp_store() -> (TempDir, TaskStore) {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::load(dir.path().join("tasks.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn add_then_list() {
        let (_dir, mut store) = temp_store();
        let out = run_script(&mut store, "1\nBuy milk\n2% milk\nshopping\nlow\n\n2\n9\n");

        assert!(out.contains("Task added successfully!"));
        assert!(out.contains("=== All Tasks ==="));
        assert!(out.contains("title: Buy milk"));
        assert!(out.ends_with("Goodbye!\n"));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn errors_do_not_end_the_loop() {
        let (_dir, mut store) = temp_store();
        let out = run_script(&mut store, "1\n   \n\n\n\n\n3\n99\n5\nabc\n42\n9\n");

        assert!(out.contains("Title cannot be empty"));
        assert!(out.contains("Task with ID 99 is not found"));
        assert!(out.contains("'abc' is not a valid task id"));
        assert!(out.contains("Invalid option"));
        assert!(out.contains("Goodbye!"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn unknown_category_is_reported_not_stored() {
        let (_dir, mut store) = temp_store();
        let out = run_script(&mut store, "1\nTask\n\nchores\n\n\n9\n");
        assert!(out.contains("unknown category 'chores'"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn edit_keeps_blank_fields() {
        let (_dir, mut store) = temp_store();
        let task = store
            .add("Report", "quarterly", Some(Category::Work), None, None)
            .unwrap();

        let script = format!("4\n{}\n\nyearly\n\nhigh\n\ny\n9\n", task.id);
        let out = run_script(&mut store, &script);

        assert!(out.contains("Task edited successfully!"));
        let edited = store.get(task.id).unwrap();
        assert_eq!(edited.title, "Report");
        assert_eq!(edited.description, "yearly");
        assert_eq!(edited.category, Some(Category::Work));
        assert_eq!(edited.priority, Some(Priority::High));
        assert!(edited.completed);
    }

    #[test]
    fn blank_search_is_rejected() {
        let (_dir, mut store) = temp_store();
        store.add("Anything", "", None, None, None).unwrap();
        let out = run_script(&mut store, "6\n  \n9\n");
        assert!(out.contains("invalid input"));
        assert!(!out.contains("Search Results"));
    }

    #[test]
    fn filters_by_category_and_priority() {
        let (_dir, mut store) = temp_store();
        store.add("Ship", "", Some(Category::Work), Some(Priority::High), None).unwrap();
        store.add("Run", "", Some(Category::Personal), Some(Priority::Low), None).unwrap();

        let out = run_script(&mut store, "7\nwork\n10\nlow\n9\n");
        assert!(out.contains("=== work Tasks ==="));
        assert!(out.contains("title: Ship"));
        assert!(out.contains("=== low Priority Tasks ==="));
        assert!(out.contains("title: Run"));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let (_dir, mut store) = temp_store();
        let out = run_script(&mut store, "1\nHalf typed");
        assert!(out.contains("Goodbye!"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn update_from_answers() {
        let update = build_update(" New ", "", "", "medium", "", "n").unwrap();
        assert_eq!(update.title.as_deref(), Some("New"));
        assert_eq!(update.description, None);
        assert_eq!(update.category, None);
        assert_eq!(update.priority, Some(Some(Priority::Medium)));
        assert_eq!(update.completed, Some(false));
        assert!(build_update("", "", "", "", "", "maybe").is_err());
    }
}
