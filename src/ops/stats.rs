use chrono::NaiveDate;
use serde::Serialize;

use crate::model::task::{Priority, Task};

/// Header counts. Everything except `archived` ignores archived tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub archived: usize,
}

/// Exclusive status buckets. Each task lands in exactly one, checked in
/// the order archived, completed, overdue, pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub archived: usize,
}

/// Priority distribution over non-archived tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

pub fn count_tasks(tasks: &[Task], today: NaiveDate) -> TaskCounts {
    let mut counts = TaskCounts::default();
    for task in tasks {
        if task.archived {
            counts.archived += 1;
            continue;
        }
        counts.total += 1;
        if task.completed {
            counts.completed += 1;
        } else {
            counts.pending += 1;
        }
        if task.is_overdue(today) {
            counts.overdue += 1;
        }
    }
    counts
}

pub fn status_breakdown(tasks: &[Task], today: NaiveDate) -> StatusBreakdown {
    let mut stats = StatusBreakdown::default();
    for task in tasks {
        if task.archived {
            stats.archived += 1;
        } else if task.completed {
            stats.completed += 1;
        } else if task.is_overdue(today) {
            stats.overdue += 1;
        } else {
            stats.pending += 1;
        }
    }
    stats
}

pub fn priority_breakdown(tasks: &[Task]) -> PriorityBreakdown {
    let mut stats = PriorityBreakdown::default();
    for task in tasks.iter().filter(|t| !t.archived) {
        match task.priority {
            Priority::High => stats.high += 1,
            Priority::Medium => stats.medium += 1,
            Priority::Low => stats.low += 1,
            Priority::Other(_) => {}
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::task_ops::local_midnight;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
    }

    fn list() -> Vec<Task> {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let mut a = Task::new(1, "a", at);
        a.priority = Priority::High;
        let mut b = Task::new(2, "b", at);
        b.completed = true;
        let mut c = Task::new(3, "c", at);
        c.due_date = Some(local_midnight(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
        c.priority = Priority::Low;
        let mut d = Task::new(4, "d", at);
        d.archived = true;
        d.priority = Priority::High;
        vec![a, b, c, d]
    }

    #[test]
    fn counts_exclude_archived() {
        let counts = count_tasks(&list(), today());
        assert_eq!(
            counts,
            TaskCounts {
                total: 3,
                completed: 1,
                pending: 2,
                overdue: 1,
                archived: 1,
            }
        );
    }

    #[test]
    fn status_buckets_are_exclusive() {
        let stats = status_breakdown(&list(), today());
        assert_eq!(stats.completed + stats.pending + stats.overdue + stats.archived, 4);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.pending, 1);
    }

    #[test]
    fn priority_breakdown_skips_archived() {
        let stats = priority_breakdown(&list());
        assert_eq!(
            stats,
            PriorityBreakdown {
                high: 1,
                medium: 1,
                low: 1,
            }
        );
    }

    #[test]
    fn empty_list_counts_zero() {
        assert_eq!(count_tasks(&[], today()), TaskCounts::default());
        assert_eq!(status_breakdown(&[], today()), StatusBreakdown::default());
        assert_eq!(priority_breakdown(&[]), PriorityBreakdown::default());
    }
}
