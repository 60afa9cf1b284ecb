use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::model::task::{Priority, Task, TaskId};

/// Error type for task operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// User input for a new task
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Build a task from a draft. Title and description are trimmed; a blank
/// title is rejected.
pub fn create_task(id: TaskId, draft: TaskDraft, now: DateTime<Utc>) -> Result<Task, TaskError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    let mut task = Task::new(id, title, now);
    task.description = draft.description.trim().to_string();
    task.due_date = draft.due_date;
    task.priority = draft.priority;
    Ok(task)
}

/// Next id for a new task: the creation time in epoch milliseconds, bumped
/// past every existing id so ids stay monotonic even if the clock goes back.
pub fn next_task_id(tasks: &[Task], now: DateTime<Utc>) -> TaskId {
    let from_clock = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let after_max = tasks.iter().map(|t| t.id).max().map_or(1, |m| m.saturating_add(1));
    from_clock.max(after_max)
}

/// Stored due timestamp for a calendar date: local midnight.
pub fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::default());
    match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        // Midnight skipped by a DST jump
        None => Utc.from_utc_datetime(&naive),
    }
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

/// The editable fields of a task, as a whole form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

impl TaskEdit {
    /// Seed the form with the task's current values
    pub fn from_task(task: &Task) -> Self {
        TaskEdit {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            priority: task.priority.clone(),
        }
    }
}

/// Result of applying an edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Every field matched the task; nothing to write
    Unchanged,
    Changed(Task),
}

/// Apply an edit form to a copy of `task`.
pub fn apply_edit(task: &Task, edit: &TaskEdit) -> Result<EditOutcome, TaskError> {
    let title = edit.title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    let description = edit.description.trim();

    let unchanged = title == task.title
        && description == task.description
        && edit.due_date == task.due_date
        && edit.priority == task.priority;
    if unchanged {
        return Ok(EditOutcome::Unchanged);
    }

    let mut updated = task.clone();
    updated.title = title.to_string();
    updated.description = description.to_string();
    updated.due_date = edit.due_date;
    updated.priority = edit.priority.clone();
    Ok(EditOutcome::Changed(updated))
}

// ---------------------------------------------------------------------------
// Single-field transitions (return the updated copy)
// ---------------------------------------------------------------------------

pub fn toggled_complete(task: &Task) -> Task {
    Task {
        completed: !task.completed,
        ..task.clone()
    }
}

pub fn toggled_selected(task: &Task) -> Task {
    Task {
        selected: !task.selected,
        ..task.clone()
    }
}

/// Archiving leaves `completed` alone
pub fn with_archived(task: &Task, archived: bool) -> Task {
    Task {
        archived,
        ..task.clone()
    }
}

/// Find a task by id. With duplicate ids the first wins.
pub fn find_task(tasks: &[Task], id: TaskId) -> Option<&Task> {
    tasks.iter().find(|t| t.id == id)
}

/// Move one element from `from` to `to`, shifting the rest.
/// Both indices must be in bounds.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}
