use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::model::task::{Priority, Task};
use crate::model::toast::{Toast, ToastKind};
use crate::ops::stats::{PriorityBreakdown, StatusBreakdown, TaskCounts};
use crate::util::unicode::{pad_to_width, truncate_to_width};

/// Titles longer than this are cut in list output
const TITLE_CELLS: usize = 40;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson<'a> {
    /// 1-based position in the visible list
    pub position: usize,
    #[serde(flatten)]
    pub task: &'a Task,
    pub overdue: bool,
}

#[derive(Serialize)]
pub struct ListJson<'a> {
    pub counts: TaskCounts,
    pub tasks: Vec<TaskJson<'a>>,
    pub toasts: &'a [Toast],
}

#[derive(Serialize)]
pub struct StatsJson {
    pub counts: TaskCounts,
    pub status: StatusBreakdown,
    pub priority: PriorityBreakdown,
}

pub fn list_to_json<'a>(
    tasks: &[&'a Task],
    counts: TaskCounts,
    toasts: &'a [Toast],
    today: NaiveDate,
) -> ListJson<'a> {
    ListJson {
        counts,
        tasks: tasks
            .iter()
            .enumerate()
            .map(|(i, &task)| TaskJson {
                position: i + 1,
                task,
                overdue: task.is_overdue(today),
            })
            .collect(),
        toasts,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn check_char(task: &Task) -> char {
    if task.completed { 'x' } else { ' ' }
}

fn priority_char(priority: &Priority) -> char {
    match priority {
        Priority::High => '!',
        Priority::Medium => '-',
        Priority::Low => '.',
        Priority::Other(_) => '?',
    }
}

fn format_due(due: DateTime<Utc>) -> String {
    due.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// One task as a single line: checkbox, selection, position, priority,
/// id, title, then due date and flags
pub fn format_task_line(position: usize, task: &Task, today: NaiveDate) -> String {
    let sel = if task.selected { '*' } else { ' ' };
    let title = pad_to_width(&truncate_to_width(&task.title, TITLE_CELLS), TITLE_CELLS);
    let mut line = format!(
        "[{}]{}{:>3}. {} {:<13} {}",
        check_char(task),
        sel,
        position,
        priority_char(&task.priority),
        task.id,
        title
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", format_due(due)));
    }
    if task.is_overdue(today) {
        line.push_str("  OVERDUE");
    }
    if task.archived {
        line.push_str("  (archived)");
    }
    line.trim_end().to_string()
}

/// Header line with the task counts
pub fn format_counts(counts: &TaskCounts) -> String {
    format!(
        "{} tasks: {} done, {} pending, {} overdue, {} archived",
        counts.total, counts.completed, counts.pending, counts.overdue, counts.archived
    )
}

pub fn format_stats(stats: &StatsJson) -> Vec<String> {
    let s = &stats.status;
    let p = &stats.priority;
    vec![
        format_counts(&stats.counts),
        String::new(),
        "status:".to_string(),
        format!("  completed  {:>4}", s.completed),
        format!("  pending    {:>4}", s.pending),
        format!("  overdue    {:>4}", s.overdue),
        format!("  archived   {:>4}", s.archived),
        String::new(),
        "priority:".to_string(),
        format!("  high       {:>4}", p.high),
        format!("  medium     {:>4}", p.medium),
        format!("  low        {:>4}", p.low),
    ]
}

pub fn format_toast(toast: &Toast) -> String {
    let tag = match toast.kind {
        ToastKind::Success => "ok",
        ToastKind::Warning => "warning",
        ToastKind::Error => "error",
    };
    format!("{}: {}", tag, toast.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::task_ops::local_midnight;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn task(id: u64, title: &str) -> Task {
        Task::new(id, title, Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    #[test]
    fn list_lines() {
        let mut overdue = task(2, "Pay rent");
        overdue.due_date = Some(local_midnight(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()));
        overdue.priority = Priority::High;
        overdue.selected = true;

        let mut done = task(3, "Water the plants");
        done.completed = true;
        done.priority = Priority::Low;
        done.archived = true;

        let lines: Vec<String> = [task(1, "Buy milk"), overdue, done]
            .iter()
            .enumerate()
            .map(|(i, t)| format_task_line(i + 1, t, today()))
            .collect();
        insta::assert_snapshot!(lines.join("\n"), @r"
        [ ]   1. - 1             Buy milk
        [ ]*  2. ! 2             Pay rent                                  due 2026-03-09  OVERDUE
        [x]   3. . 3             Water the plants                          (archived)
        ");
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "a".repeat(60);
        let line = format_task_line(1, &task(1, &long), today());
        assert!(line.contains(&format!("{}\u{2026}", "a".repeat(39))));
    }

    #[test]
    fn toast_lines() {
        let toast = Toast {
            id: 1,
            message: "You didn't change anything!".to_string(),
            kind: ToastKind::Warning,
            duration_ms: 3000,
        };
        assert_eq!(format_toast(&toast), "warning: You didn't change anything!");
    }

    #[test]
    fn stats_block() {
        let stats = StatsJson {
            counts: TaskCounts {
                total: 4,
                completed: 1,
                pending: 3,
                overdue: 1,
                archived: 2,
            },
            status: StatusBreakdown {
                completed: 1,
                pending: 2,
                overdue: 1,
                archived: 2,
            },
            priority: PriorityBreakdown {
                high: 2,
                medium: 1,
                low: 1,
            },
        };
        insta::assert_snapshot!(format_stats(&stats).join("\n"), @r"
        4 tasks: 1 done, 3 pending, 1 overdue, 2 archived

        status:
          completed     1
          pending       2
          overdue       1
          archived      2

        priority:
          high          2
          medium        1
          low           1
        ");
    }

    #[test]
    fn json_positions_are_one_based() {
        let tasks = [task(7, "a"), task(8, "b")];
        let refs: Vec<&Task> = tasks.iter().collect();
        let json = list_to_json(&refs, TaskCounts::default(), &[], today());
        let value = serde_json::to_value(&json).unwrap();
        assert_eq!(value["tasks"][1]["position"], 2);
        assert_eq!(value["tasks"][1]["id"], 8);
        assert_eq!(value["tasks"][0]["overdue"], false);
    }
}
