//! The task store: authoritative in-memory collection mirrored to a JSON file.
//!
//! Every mutating operation changes memory first and then rewrites the whole
//! file. If that final save fails the error is returned, but the in-memory
//! change is kept; memory and disk stay diverged until the next successful
//! save.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, TaskError};
use crate::fields::*;
use crate::task::{Task, TaskUpdate};

/// On-disk layout of the data file.
#[derive(Debug, Deserialize)]
struct StoreFile {
    tasks: Vec<Task>,
    #[serde(rename = "nextID", default)]
    next_id: u64,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    tasks: &'a [Task],
    #[serde(rename = "nextID")]
    next_id: u64,
}

/// In-memory task collection bound to a backing file.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    /// Empty store bound to `path`. Nothing is read or written.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore {
            path: path.into(),
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Load the store from `path`. A missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = TaskStore::new(path);
        store.reload()?;
        Ok(store)
    }

    /// Replace the in-memory state with the contents of the backing file.
    pub fn reload(&mut self) -> Result<()> {
        let buf = match fs::read_to_string(&self.path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no task file yet, starting empty");
                self.tasks.clear();
                self.next_id = 1;
                return Ok(());
            }
            Err(e) => return Err(TaskError::persistence("load tasks", e)),
        };

        let file: StoreFile =
            serde_json::from_str(&buf).map_err(|e| TaskError::persistence("load tasks", e))?;

        let floor = file
            .tasks
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| TaskError::persistence("load tasks", "task id out of range"))?;
        let next_id = if file.next_id < floor {
            warn!(
                stored = file.next_id,
                repaired = floor,
                "nextID not above existing ids, raising it"
            );
            floor
        } else {
            file.next_id
        };

        self.tasks = file.tasks;
        self.next_id = next_id;
        debug!(path = %self.path.display(), tasks = self.tasks.len(), next_id, "loaded tasks");
        Ok(())
    }

    /// Write the full collection and counter, replacing the file via temp + rename.
    pub fn save(&self) -> Result<()> {
        let file = StoreFileRef {
            tasks: &self.tasks,
            next_id: self.next_id,
        };
        let data = serde_json::to_string_pretty(&file)
            .map_err(|e| TaskError::persistence("save tasks", e))?;
        write_atomic(&self.path, data.as_bytes())
            .map_err(|e| TaskError::persistence("save tasks", e))?;
        debug!(path = %self.path.display(), tasks = self.tasks.len(), "saved tasks");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The id the next `add` will assign.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Create a task and persist it.
    pub fn add(
        &mut self,
        title: &str,
        description: &str,
        category: Option<Category>,
        priority: Option<Priority>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let title = validate_title(title)?;
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| TaskError::InvalidData("no task ids left".into()))?;

        let task = Task {
            id: self.next_id,
            title,
            description: description.trim().to_string(),
            completed: false,
            created_at: Utc::now(),
            category,
            priority,
            due_date,
        };
        self.next_id = next_id;
        self.tasks.push(task.clone());
        info!(id = task.id, "added task");
        self.save()?;
        Ok(task)
    }

    /// Apply the fields present in `update` to task `id` and persist.
    pub fn edit(&mut self, id: u64, update: TaskUpdate) -> Result<Task> {
        let title = update.title.as_deref().map(validate_title).transpose()?;

        let task = self.get_mut(id).ok_or(TaskError::NotFound(id))?;
        if let Some(t) = title {
            task.title = t;
        }
        if let Some(d) = update.description {
            task.description = d.trim().to_string();
        }
        if let Some(c) = update.category {
            task.category = c;
        }
        if let Some(p) = update.priority {
            task.priority = p;
        }
        if let Some(d) = update.due_date {
            task.due_date = d;
        }
        if let Some(done) = update.completed {
            task.completed = done;
        }
        let task = task.clone();

        info!(id, "edited task");
        self.save()?;
        Ok(task)
    }

    /// Remove task `id`, keeping the order of the rest.
    pub fn delete(&mut self, id: u64) -> Result<()> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        self.tasks.remove(idx);
        info!(id, "deleted task");
        self.save()
    }

    /// Flip the completed flag of task `id`.
    pub fn toggle_complete(&mut self, id: u64) -> Result<Task> {
        let task = self.get_mut(id).ok_or(TaskError::NotFound(id))?;
        task.completed = !task.completed;
        let task = task.clone();
        info!(id, completed = task.completed, "toggled task");
        self.save()?;
        Ok(task)
    }

    /// Look up a single task by id.
    pub fn get(&self, id: u64) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// All tasks in insertion order.
    pub fn list(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Tasks whose title or description contains `query`, ignoring case.
    /// An empty query matches every task.
    pub fn search(&self, query: &str) -> Vec<Task> {
        let needle = query.to_lowercase();
        self.select(|t| t.matches_lowercase(&needle))
    }

    pub fn filter_by_category(&self, category: Category) -> Vec<Task> {
        self.select(|t| t.category == Some(category))
    }

    pub fn filter_by_priority(&self, priority: Priority) -> Vec<Task> {
        self.select(|t| t.priority == Some(priority))
    }

    /// Open tasks whose due date has passed.
    pub fn overdue(&self) -> Vec<Task> {
        self.overdue_at(Utc::now())
    }

    pub fn overdue_at(&self, now: DateTime<Utc>) -> Vec<Task> {
        self.select(|t| t.is_overdue_at(now))
    }

    fn select(&self, pred: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.tasks.iter().filter(|&t| pred(t)).cloned().collect()
    }
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::InvalidData("Title cannot be empty".into()));
    }
    Ok(title.to_string())
}

fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    let written = File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(data)?;
            f.flush()
        })
        .and_then(|()| fs::rename(&tmp, path));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}
