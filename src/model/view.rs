use std::fmt;

use serde::{Deserialize, Serialize};

/// Which tasks the visible subset includes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every non-archived task
    #[default]
    All,
    Completed,
    Pending,
    Overdue,
    /// Only archived tasks
    Archived,
}

/// Ordering of the visible subset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first by creation time
    Date,
    /// High → Medium → Low
    Priority,
    /// Pending before completed
    Status,
    Title,
    /// Canonical list order. The only order that can be rearranged.
    #[default]
    Manual,
}

impl Filter {
    pub fn parse_filter(s: &str) -> Option<Filter> {
        match s {
            "all" => Some(Filter::All),
            "completed" => Some(Filter::Completed),
            "pending" => Some(Filter::Pending),
            "overdue" => Some(Filter::Overdue),
            "archived" => Some(Filter::Archived),
            _ => None,
        }
    }
}

impl SortKey {
    pub fn parse_sort(s: &str) -> Option<SortKey> {
        match s {
            "date" => Some(SortKey::Date),
            "priority" => Some(SortKey::Priority),
            "status" => Some(SortKey::Status),
            "title" => Some(SortKey::Title),
            "manual" => Some(SortKey::Manual),
            _ => None,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Pending => "pending",
            Filter::Overdue => "overdue",
            Filter::Archived => "archived",
        };
        f.write_str(s)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Date => "date",
            SortKey::Priority => "priority",
            SortKey::Status => "status",
            SortKey::Title => "title",
            SortKey::Manual => "manual",
        };
        f.write_str(s)
    }
}
