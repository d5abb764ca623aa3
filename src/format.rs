//! Rendering of tasks for the terminal.

use std::io::{self, Write};

use chrono::{NaiveDate, Utc};

use crate::dates::format_due_relative;
use crate::task::Task;

/// Write the detailed, multi-line form of a task followed by a blank line.
/// Optional attributes are only shown when set.
pub fn write_task<W: Write>(out: &mut W, task: &Task) -> io::Result<()> {
    writeln!(out, "id: {}", task.id)?;
    writeln!(out, "title: {}", task.title)?;
    writeln!(out, "description: {}", task.description)?;
    writeln!(out, "status: {}", status_mark(task))?;
    if let Some(c) = task.category {
        writeln!(out, "category: ({c})")?;
    }
    if let Some(p) = task.priority {
        writeln!(out, "priority: [{}]", p.as_str().to_uppercase())?;
    }
    if let Some(d) = task.due_date {
        writeln!(out, "dueDate: {}", d.format("%Y-%m-%d"))?;
    }
    writeln!(out)
}

pub fn write_tasks<W: Write>(out: &mut W, tasks: &[Task]) -> io::Result<()> {
    for t in tasks {
        write_task(out, t)?;
    }
    Ok(())
}

fn status_mark(task: &Task) -> &'static str {
    if task.completed {
        "✓"
    } else {
        " "
    }
}

/// Print tasks as a compact table.
///
/// Due dates are stored against the UTC calendar, so "today" is the UTC date too.
pub fn print_table(tasks: &[Task]) {
    for line in table_lines(tasks, Utc::now().date_naive()) {
        println!("{line}");
    }
}

/// Header plus one row per task.
pub fn table_lines(tasks: &[Task], today: NaiveDate) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<5} {:<3} {:<9} {:<7} {:<10} {}",
        "ID", "", "Category", "Pri", "Due", "Title"
    )];
    for t in tasks {
        let category = t.category.map(|c| c.as_str()).unwrap_or("-");
        let priority = t.priority.map(|p| p.as_str()).unwrap_or("-");
        lines.push(format!(
            "{:<5} {:<3} {:<9} {:<7} {:<10} {}",
            t.id,
            if t.completed { "[x]" } else { "[ ]" },
            category,
            priority,
            format_due_relative(t.due_date, today),
            truncate(&t.title, 48)
        ));
    }
    lines
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
