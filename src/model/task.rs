use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Task identifier. Assigned by the owner of the list, never reused.
pub type TaskId = u64;

/// Task priority. Labels written by other versions that this one does not
/// know are kept verbatim and rank below every known priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Sort rank, higher sorts first. Unknown labels rank 0.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
            Priority::Other(_) => 0,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(label) => label,
        }
    }

    /// Parse one of the known labels, case-insensitively
    pub fn parse_priority(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Any stored label; unknown ones become `Other`
    pub fn from_label(s: &str) -> Priority {
        Priority::parse_priority(s).unwrap_or_else(|| Priority::Other(s.to_string()))
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Priority::from_label(&s)
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

/// A single task in the canonical list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Title text, never empty after trimming
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    /// Bulk-selection flag. UI state, but persisted with the task.
    #[serde(default)]
    pub selected: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub archived: bool,
}

impl Task {
    /// Create a pending, unselected, unarchived task with default priority
    pub fn new(id: TaskId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Task {
            id,
            title: title.into(),
            description: String::new(),
            completed: false,
            selected: false,
            created_at,
            due_date: None,
            priority: Priority::Medium,
            archived: false,
        }
    }

    /// Overdue: has a due date, is not completed, and the due date's local
    /// calendar day is strictly before `today`. Time of day is ignored.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if self.completed {
            return false;
        }
        match self.due_date {
            Some(due) => due.with_timezone(&Local).date_naive() < today,
            None => false,
        }
    }

    /// Case-insensitive substring match against title or description.
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
