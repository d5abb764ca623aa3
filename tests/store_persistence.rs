//! Integration tests for the task store's file persistence and query scenarios.

use anyhow::Result;
use chrono::{Duration, Utc};
use serde_json::Value;
use tempfile::TempDir;

use taskcli::error::TaskError;
use taskcli::fields::{Category, Priority};
use taskcli::store::TaskStore;
use taskcli::task::TaskUpdate;

fn setup() -> Result<(TempDir, TaskStore)> {
    let temp = TempDir::new()?;
    let store = TaskStore::load(temp.path().join("tasks.json"))?;
    Ok((temp, store))
}

#[test]
fn buy_milk_scenario() -> Result<()> {
    let (_temp, mut store) = setup()?;

    let task = store.add("Buy milk", "2% milk", Some(Category::Shopping), Some(Priority::Low), None)?;

    assert_eq!(task.id, 1);
    assert_eq!(task.title, "Buy milk");
    assert!(!task.completed);
    assert_eq!(store.list(), vec![task]);
    Ok(())
}

#[test]
fn save_then_load_round_trips() -> Result<()> {
    let (temp, mut store) = setup()?;
    let due = Utc::now() + Duration::days(3);

    store.add("Ship release", "v2", Some(Category::Work), Some(Priority::High), Some(due))?;
    let second = store.add("Stretch", "", Some(Category::Health), None, None)?;
    store.add("Temporary", "", None, None, None)?;
    store.toggle_complete(second.id)?;
    store.delete(3)?;

    let reloaded = TaskStore::load(temp.path().join("tasks.json"))?;
    assert_eq!(reloaded.list(), store.list());
    assert_eq!(reloaded.next_id(), 4);
    assert_eq!(reloaded.list()[0].due_date, Some(due));
    Ok(())
}

#[test]
fn file_matches_documented_schema() -> Result<()> {
    let (temp, mut store) = setup()?;
    store.add("Buy milk", "2% milk", Some(Category::Shopping), Some(Priority::Low), None)?;

    let raw = std::fs::read_to_string(temp.path().join("tasks.json"))?;
    let json: Value = serde_json::from_str(&raw)?;

    assert_eq!(json["nextID"], 2);
    let task = &json["tasks"][0];
    assert_eq!(task["id"], 1);
    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["description"], "2% milk");
    assert_eq!(task["completed"], false);
    assert_eq!(task["category"], "shopping");
    assert_eq!(task["priority"], "low");
    assert!(task["createdAt"].as_str().is_some_and(|s| s.ends_with('Z')));
    assert!(task.get("dueDate").is_none());
    assert!(!temp.path().join("tasks.json.tmp").exists());
    Ok(())
}

#[test]
fn loads_file_written_by_other_tools() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("tasks.json");
    std::fs::write(
        &path,
        r#"{
  "nextID": 9,
  "tasks": [
    {
      "dueDate": "2020-01-01T00:00:00.000Z",
      "priority": "medium",
      "createdAt": "2019-12-01T10:00:00.000Z",
      "completed": false,
      "description": "",
      "title": "Renew passport",
      "id": 8
    }
  ]
}"#,
    )?;

    let store = TaskStore::load(&path)?;
    assert_eq!(store.next_id(), 9);
    assert_eq!(store.filter_by_priority(Priority::Medium).len(), 1);
    assert_eq!(store.overdue().len(), 1);
    Ok(())
}

#[test]
fn edit_cannot_touch_identity() -> Result<()> {
    let (temp, mut store) = setup()?;
    let task = store.add("Draft", "", None, None, None)?;

    let edited = store.edit(
        task.id,
        TaskUpdate {
            title: Some("Final".into()),
            completed: Some(true),
            ..Default::default()
        },
    )?;
    assert_eq!(edited.id, task.id);
    assert_eq!(edited.created_at, task.created_at);

    let reloaded = TaskStore::load(temp.path().join("tasks.json"))?;
    assert_eq!(reloaded.get(task.id)?.title, "Final");
    assert!(reloaded.get(task.id)?.completed);
    Ok(())
}

#[test]
fn rejected_operations_leave_file_untouched() -> Result<()> {
    let (temp, mut store) = setup()?;
    store.add("Keep", "", None, None, None)?;
    let before = std::fs::read_to_string(temp.path().join("tasks.json"))?;

    assert!(matches!(store.add("  ", "", None, None, None), Err(TaskError::InvalidData(_))));
    assert!(matches!(store.delete(2), Err(TaskError::NotFound(2))));
    assert!(matches!(store.toggle_complete(2), Err(TaskError::NotFound(2))));

    let after = std::fs::read_to_string(temp.path().join("tasks.json"))?;
    assert_eq!(before, after);
    assert_eq!(store.next_id(), 2);
    Ok(())
}

#[test]
fn overdue_scenario() -> Result<()> {
    let (_temp, mut store) = setup()?;
    let yesterday = Utc::now() - Duration::days(1);
    let task = store.add("Pay rent", "", None, None, Some(yesterday))?;

    assert_eq!(store.overdue(), vec![task.clone()]);
    store.toggle_complete(task.id)?;
    assert!(store.overdue().is_empty());
    Ok(())
}

#[test]
fn category_filter_scenario() -> Result<()> {
    let (_temp, mut store) = setup()?;
    let work = store.add("Standup", "", Some(Category::Work), None, None)?;
    store.add("Call mum", "", Some(Category::Personal), None, None)?;

    assert_eq!(store.filter_by_category(Category::Work), vec![work]);
    Ok(())
}

#[test]
fn ids_keep_growing_after_deletes_and_reload() -> Result<()> {
    let (temp, mut store) = setup()?;
    for title in ["a", "b", "c"] {
        store.add(title, "", None, None, None)?;
    }
    store.delete(3)?;
    store.delete(1)?;

    let mut reloaded = TaskStore::load(temp.path().join("tasks.json"))?;
    let next = reloaded.add("d", "", None, None, None)?;
    assert_eq!(next.id, 4);
    assert!(reloaded.list().iter().all(|t| t.id <= next.id));
    Ok(())
}
