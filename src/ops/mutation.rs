use crate::model::task::{Task, TaskId};

/// A change to the canonical list, described by whoever wants it and applied
/// by the list's single owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Add(Task),
    /// Replace the task with the same id
    Update(Task),
    Delete(TaskId),
    /// Replace each task with the same id
    BulkUpdate(Vec<Task>),
    BulkDelete(Vec<TaskId>),
    /// Replace the whole list with this ordering
    Reorder(Vec<Task>),
}

impl Mutation {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::Add(_) => "add",
            Mutation::Update(_) => "update",
            Mutation::Delete(_) => "delete",
            Mutation::BulkUpdate(_) => "bulk-update",
            Mutation::BulkDelete(_) => "bulk-delete",
            Mutation::Reorder(_) => "reorder",
        }
    }

    /// Number of tasks the mutation names
    pub fn len(&self) -> usize {
        match self {
            Mutation::Add(_) | Mutation::Update(_) | Mutation::Delete(_) => 1,
            Mutation::BulkUpdate(tasks) | Mutation::Reorder(tasks) => tasks.len(),
            Mutation::BulkDelete(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply to the canonical list. Returns whether anything changed.
    /// Updates for ids that are no longer present are dropped.
    pub fn apply(self, tasks: &mut Vec<Task>) -> bool {
        match self {
            Mutation::Add(task) => {
                tasks.push(task);
                true
            }
            Mutation::Update(task) => replace_task(tasks, task),
            Mutation::Delete(id) => {
                let before = tasks.len();
                tasks.retain(|t| t.id != id);
                tasks.len() != before
            }
            Mutation::BulkUpdate(updated) => {
                let mut changed = false;
                for task in updated {
                    changed |= replace_task(tasks, task);
                }
                changed
            }
            Mutation::BulkDelete(ids) => {
                let before = tasks.len();
                tasks.retain(|t| !ids.contains(&t.id));
                tasks.len() != before
            }
            Mutation::Reorder(reordered) => {
                let changed = *tasks != reordered;
                *tasks = reordered;
                changed
            }
        }
    }
}

fn replace_task(tasks: &mut [Task], task: Task) -> bool {
    match tasks.iter_mut().find(|t| t.id == task.id) {
        Some(slot) => {
            let changed = *slot != task;
            *slot = task;
            changed
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn list() -> Vec<Task> {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        vec![Task::new(1, "one", at), Task::new(2, "two", at), Task::new(3, "three", at)]
    }

    #[test]
    fn add_appends() {
        let mut tasks = list();
        let extra = Task::new(9, "nine", tasks[0].created_at);
        assert!(Mutation::Add(extra).apply(&mut tasks));
        assert_eq!(tasks.last().unwrap().id, 9);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut tasks = list();
        let mut two = tasks[1].clone();
        two.completed = true;
        assert!(Mutation::Update(two).apply(&mut tasks));
        assert!(tasks[1].completed);
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn update_of_missing_id_is_noop() {
        let mut tasks = list();
        let ghost = Task::new(77, "ghost", tasks[0].created_at);
        assert!(!Mutation::Update(ghost).apply(&mut tasks));
        assert_eq!(tasks, list());
    }

    #[test]
    fn bulk_delete_removes_listed_ids() {
        let mut tasks = list();
        assert!(Mutation::BulkDelete(vec![1, 3]).apply(&mut tasks));
        let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn delete_missing_reports_unchanged() {
        let mut tasks = list();
        assert!(!Mutation::Delete(42).apply(&mut tasks));
    }

    #[test]
    fn reorder_replaces_list() {
        let mut tasks = list();
        let mut reordered = list();
        reordered.reverse();
        assert!(Mutation::Reorder(reordered.clone()).apply(&mut tasks));
        assert_eq!(tasks, reordered);
    }
}
