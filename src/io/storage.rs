//! Durable storage of the task list and theme preference.
//!
//! Every public operation contains its own faults: loads fall back to empty
//! or default values and saves only log. Callers that need the error use the
//! `try_` variants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::io::store::{KeyValueStore, StoreError};
use crate::model::task::{Priority, Task, TaskId};
use crate::model::theme::Theme;

pub const TASKS_KEY: &str = "taskdeck-tasks";
pub const THEME_KEY: &str = "taskdeck-theme";
const PROBE_KEY: &str = "__taskdeck_probe__";

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not encode or decode tasks: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored tasks are not a list")]
    NotAList,
}

pub struct Storage {
    store: Box<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Storage {
            store: Box::new(store),
        }
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    pub fn save_tasks(&self, tasks: &[Task]) {
        if let Err(e) = self.try_save_tasks(tasks) {
            tracing::error!(error = %e, count = tasks.len(), "could not save tasks");
        }
    }

    pub fn try_save_tasks(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(tasks)?;
        self.store.set(TASKS_KEY, &json)?;
        tracing::debug!(count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Stored tasks, normalised. Empty on any fault.
    pub fn load_tasks(&self) -> Vec<Task> {
        match self.try_load_tasks() {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!(error = %e, "could not load tasks");
                Vec::new()
            }
        }
    }

    pub fn try_load_tasks(&self) -> Result<Vec<Task>, StorageError> {
        let Some(json) = self.store.get(TASKS_KEY)? else {
            return Ok(Vec::new());
        };
        let Value::Array(records) = serde_json::from_str::<Value>(&json)? else {
            return Err(StorageError::NotAList);
        };
        let mut tasks = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match normalize_record(record) {
                Ok(task) => tasks.push(task),
                Err(reason) => tracing::warn!(index, %reason, "dropping unreadable task record"),
            }
        }
        Ok(tasks)
    }

    /// True once the tasks key has been written, even with an empty list.
    /// A key that exists but cannot be read counts as saved.
    pub fn has_any_tasks_ever_saved(&self) -> bool {
        match self.store.get(TASKS_KEY) {
            Ok(value) => value.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "could not check for saved tasks");
                true
            }
        }
    }

    pub fn clear_tasks(&self) {
        if let Err(e) = self.store.remove(TASKS_KEY) {
            tracing::error!(error = %e, "could not clear tasks");
        }
    }

    // -----------------------------------------------------------------------
    // Theme
    // -----------------------------------------------------------------------

    pub fn save_theme(&self, theme: Theme) {
        if let Err(e) = self.store.set(THEME_KEY, theme.as_str()) {
            tracing::error!(error = %e, %theme, "could not save theme");
        }
    }

    /// Stored theme; light when unset, unreadable, or unrecognised.
    pub fn load_theme(&self) -> Theme {
        match self.store.get(THEME_KEY) {
            Ok(Some(raw)) => Theme::parse_theme(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unrecognised theme, using light");
                Theme::Light
            }),
            Ok(None) => Theme::Light,
            Err(e) => {
                tracing::error!(error = %e, "could not load theme");
                Theme::Light
            }
        }
    }

    // -----------------------------------------------------------------------
    // Availability
    // -----------------------------------------------------------------------

    /// Write and delete a throwaway key. Any failure means unavailable.
    pub fn is_storage_available(&self) -> bool {
        let probe = self
            .store
            .set(PROBE_KEY, PROBE_KEY)
            .and_then(|()| self.store.remove(PROBE_KEY));
        match probe {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "storage probe failed");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Record normalisation
// ---------------------------------------------------------------------------

/// A stored task as written by any schema version. Fields added after the
/// first release are optional and may be null.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    selected: Option<bool>,
    created_at: String,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    archived: Option<bool>,
}

fn normalize_record(value: Value) -> Result<Task, String> {
    let record: TaskRecord = serde_json::from_value(value).map_err(|e| e.to_string())?;

    let created_at = parse_timestamp(&record.created_at)
        .ok_or_else(|| format!("bad createdAt {:?}", record.created_at))?;

    let due_date = match record.due_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                tracing::warn!(id = record.id, value = raw, "dropping unreadable due date");
            }
            parsed
        }
    };

    let priority = match record.priority.as_deref() {
        None | Some("") => Priority::Medium,
        Some(label) => {
            let priority = Priority::from_label(label);
            if let Priority::Other(_) = priority {
                tracing::warn!(id = record.id, label, "unknown priority, keeping it");
            }
            priority
        }
    };

    Ok(Task {
        id: record.id,
        title: record.title,
        description: record.description.unwrap_or_default(),
        completed: record.completed.unwrap_or(false),
        selected: record.selected.unwrap_or(false),
        created_at,
        due_date,
        priority,
        archived: record.archived.unwrap_or(false),
    })
}

/// RFC 3339, or a bare `YYYY-MM-DD` taken as UTC midnight.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_time(chrono::NaiveTime::default()).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::{FileStore, MemoryStore};
    use crate::model::view::SortKey;
    use crate::ops::view::{ViewQuery, visible_tasks};
    use chrono::TimeZone;
    use std::rc::Rc;

    fn shared() -> (Rc<MemoryStore>, Storage) {
        let store = Rc::new(MemoryStore::new());
        let storage = Storage::new(Rc::clone(&store));
        (store, storage)
    }

    fn sample_tasks() -> Vec<Task> {
        let created = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let mut with_due = Task::new(1, "Dentist", created);
        with_due.due_date = Some(Utc.with_ymd_and_hms(2026, 3, 9, 14, 30, 0).unwrap());
        with_due.priority = Priority::High;
        with_due.description = "Bring insurance card".into();
        with_due.selected = true;

        let mut plain = Task::new(2, "Water plants", created);
        plain.completed = true;
        plain.archived = true;
        plain.priority = Priority::Low;
        vec![with_due, plain]
    }

    #[test]
    fn save_load_round_trip_is_exact() {
        let (_store, storage) = shared();
        let tasks = sample_tasks();
        storage.save_tasks(&tasks);
        assert_eq!(storage.load_tasks(), tasks);
    }

    #[test]
    fn missing_due_date_is_omitted_not_sentinel() {
        let (store, storage) = shared();
        storage.save_tasks(&sample_tasks()[1..]);
        let raw = store.get(TASKS_KEY).unwrap().unwrap();
        assert!(!raw.contains("dueDate"), "absent due date must not be written: {raw}");
    }

    #[test]
    fn ever_saved_distinguishes_empty_from_absent() {
        let (_store, storage) = shared();
        assert!(!storage.has_any_tasks_ever_saved());
        storage.save_tasks(&[]);
        assert!(storage.has_any_tasks_ever_saved());
        assert!(storage.load_tasks().is_empty());

        storage.clear_tasks();
        assert!(!storage.has_any_tasks_ever_saved());
    }

    #[test]
    fn legacy_records_get_defaults() {
        let (store, storage) = shared();
        store.insert_raw(
            TASKS_KEY,
            r#"[{"id":1,"title":"Old","completed":false,"createdAt":"2024-01-15T00:00:00.000Z"},
                {"id":2,"title":"Nulls","completed":true,"createdAt":"2024-01-16",
                 "priority":null,"archived":null,"selected":null,"dueDate":null}]"#,
        );
        let tasks = storage.load_tasks();
        assert_eq!(tasks.len(), 2);
        for task in &tasks {
            assert_eq!(task.priority, Priority::Medium);
            assert!(!task.archived);
            assert!(!task.selected);
            assert!(task.due_date.is_none());
            assert_eq!(task.description, "");
        }
        assert_eq!(
            tasks[1].created_at,
            Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn bad_records_are_dropped_individually() {
        let (store, storage) = shared();
        store.insert_raw(
            TASKS_KEY,
            r#"[{"title":"no id","completed":false,"createdAt":"2024-01-15"},
                {"id":2,"title":"bad date","completed":false,"createdAt":"yesterday"},
                {"id":3,"title":"fine","completed":false,"createdAt":"2024-01-15",
                 "dueDate":"someday","priority":"Urgent"}]"#,
        );
        let tasks = storage.load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 3);
        assert!(tasks[0].due_date.is_none());
        assert_eq!(tasks[0].priority, Priority::Other("Urgent".to_string()));
    }

    #[test]
    fn unknown_priority_survives_load_and_sorts_last() {
        let (store, storage) = shared();
        store.insert_raw(
            TASKS_KEY,
            r#"[{"id":1,"title":"Odd","completed":false,"createdAt":"2024-01-15","priority":"Urgent"},
                {"id":2,"title":"Later","completed":false,"createdAt":"2024-01-15","priority":"Low"}]"#,
        );
        let tasks = storage.load_tasks();
        let query = ViewQuery {
            sort: SortKey::Priority,
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let order: Vec<TaskId> = visible_tasks(&tasks, &query, today).iter().map(|t| t.id).collect();
        assert_eq!(order, vec![2, 1]);

        storage.save_tasks(&tasks);
        assert!(store.get(TASKS_KEY).unwrap().unwrap().contains("\"Urgent\""));
    }

    #[test]
    fn unreadable_tasks_file_counts_as_saved() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join(TASKS_KEY), b"[{\"title\":\"Caf\xe9\"}]").unwrap();
        let storage = Storage::new(FileStore::new(tmp.path()));
        assert!(storage.load_tasks().is_empty());
        assert!(storage.try_load_tasks().is_err());
        assert!(storage.has_any_tasks_ever_saved());
    }

    #[test]
    fn corrupt_json_loads_empty() {
        let (store, storage) = shared();
        store.insert_raw(TASKS_KEY, "not json {{{");
        assert!(storage.load_tasks().is_empty());
        assert!(matches!(storage.try_load_tasks(), Err(StorageError::Json(_))));

        store.insert_raw(TASKS_KEY, r#"{"id":1}"#);
        assert!(matches!(storage.try_load_tasks(), Err(StorageError::NotAList)));
    }

    #[test]
    fn save_faults_are_contained() {
        let (store, storage) = shared();
        store.set_read_only(true);
        storage.save_tasks(&sample_tasks());
        storage.save_theme(Theme::Dark);
        storage.clear_tasks();
        assert!(!store.contains_key(TASKS_KEY));
        assert!(matches!(
            storage.try_save_tasks(&sample_tasks()),
            Err(StorageError::Store(StoreError::ReadOnly))
        ));
    }

    #[test]
    fn quota_exceeded_is_contained() {
        let storage = Storage::new(MemoryStore::with_quota(64));
        storage.save_tasks(&sample_tasks());
        assert!(!storage.has_any_tasks_ever_saved());
    }

    #[test]
    fn theme_defaults_and_round_trip() {
        let (store, storage) = shared();
        assert_eq!(storage.load_theme(), Theme::Light);
        storage.save_theme(Theme::Dark);
        assert_eq!(storage.load_theme(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        store.insert_raw(THEME_KEY, "neon");
        assert_eq!(storage.load_theme(), Theme::Light);
    }

    #[test]
    fn probe_reports_availability_and_cleans_up() {
        let (store, storage) = shared();
        assert!(storage.is_storage_available());
        assert!(!store.contains_key(PROBE_KEY));

        store.set_read_only(true);
        assert!(!storage.is_storage_available());
    }
}
