//! View state and intent production over a borrowed task list.
//!
//! The engine never writes to the list it is handed. Every operation that
//! wants a change returns a [`Mutation`] for the list's owner to apply.

use chrono::{Local, NaiveDate};

use crate::model::task::{Task, TaskId};
use crate::model::view::{Filter, SortKey};
use crate::ops::mutation::Mutation;
use crate::ops::stats::{self, TaskCounts};
use crate::ops::task_ops::{
    self, EditOutcome, TaskEdit, TaskError, find_task, move_item, with_archived,
};
use crate::ops::view::{ViewQuery, visible_tasks};

/// Result of an edit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    /// Nothing differed from the stored task
    Unchanged,
    Changed(Mutation),
}

#[derive(Debug, Clone, Default)]
pub struct TaskEngine {
    query: ViewQuery,
    bulk_delete_pending: bool,
    /// Fixed "today" for overdue checks; `None` reads the local clock
    today: Option<NaiveDate>,
}

impl TaskEngine {
    pub fn new() -> Self {
        TaskEngine::default()
    }

    pub fn with_view(filter: Filter, sort: SortKey) -> Self {
        TaskEngine {
            query: ViewQuery {
                filter,
                sort,
                search: String::new(),
            },
            ..Default::default()
        }
    }

    /// Pin the date used for overdue checks
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    // -----------------------------------------------------------------------
    // View state
    // -----------------------------------------------------------------------

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn filter(&self) -> Filter {
        self.query.filter
    }

    pub fn sort(&self) -> SortKey {
        self.query.sort
    }

    pub fn search(&self) -> &str {
        &self.query.search
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.query.filter = filter;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.query.sort = sort;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn clear_search(&mut self) {
        self.query.search.clear();
    }

    /// Drag-to-reorder is only meaningful in manual order
    pub fn can_reorder(&self) -> bool {
        self.query.sort == SortKey::Manual
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    pub fn visible<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        visible_tasks(tasks, &self.query, self.today())
    }

    pub fn counts(&self, tasks: &[Task]) -> TaskCounts {
        stats::count_tasks(tasks, self.today())
    }

    pub fn selected_count(&self, tasks: &[Task]) -> usize {
        self.visible(tasks).iter().filter(|t| t.selected).count()
    }

    pub fn has_selection(&self, tasks: &[Task]) -> bool {
        self.visible(tasks).iter().any(|t| t.selected)
    }

    pub fn all_visible_selected(&self, tasks: &[Task]) -> bool {
        let visible = self.visible(tasks);
        !visible.is_empty() && visible.iter().all(|t| t.selected)
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Flip the selection flag on one task. Looks through the whole list, not
    /// just the visible subset.
    pub fn toggle_selection(&self, tasks: &[Task], id: TaskId) -> Option<Mutation> {
        let task = find_task(tasks, id)?;
        Some(Mutation::Update(task_ops::toggled_selected(task)))
    }

    /// If anything visible is selected, deselect every visible task;
    /// otherwise select every visible task. Only changed tasks are emitted.
    pub fn toggle_select_all(&self, tasks: &[Task]) -> Option<Mutation> {
        let visible = self.visible(tasks);
        let target = !visible.iter().any(|t| t.selected);
        let changed: Vec<Task> = visible
            .into_iter()
            .filter(|t| t.selected != target)
            .map(|t| Task {
                selected: target,
                ..t.clone()
            })
            .collect();
        if changed.is_empty() {
            return None;
        }
        Some(Mutation::BulkUpdate(changed))
    }

    // -----------------------------------------------------------------------
    // Bulk actions
    // -----------------------------------------------------------------------

    /// Complete every visible selected task and drop its selection.
    pub fn bulk_complete(&self, tasks: &[Task]) -> Option<Mutation> {
        let completed: Vec<Task> = self
            .visible(tasks)
            .into_iter()
            .filter(|t| t.selected)
            .map(|t| Task {
                completed: true,
                selected: false,
                ..t.clone()
            })
            .collect();
        if completed.is_empty() {
            return None;
        }
        Some(Mutation::BulkUpdate(completed))
    }

    /// First step of bulk delete. The confirmation flag is raised only while
    /// a visible task is selected and cleared otherwise; returns it.
    pub fn request_bulk_delete(&mut self, tasks: &[Task]) -> bool {
        self.bulk_delete_pending = self.has_selection(tasks);
        self.bulk_delete_pending
    }

    pub fn is_bulk_delete_pending(&self) -> bool {
        self.bulk_delete_pending
    }

    /// Second step of bulk delete. Does nothing unless a request is pending.
    pub fn confirm_bulk_delete(&mut self, tasks: &[Task]) -> Option<Mutation> {
        if !self.bulk_delete_pending {
            return None;
        }
        self.bulk_delete_pending = false;
        let ids: Vec<TaskId> = self
            .visible(tasks)
            .into_iter()
            .filter(|t| t.selected)
            .map(|t| t.id)
            .collect();
        if ids.is_empty() {
            return None;
        }
        Some(Mutation::BulkDelete(ids))
    }

    /// Drop a pending bulk delete. Selection is left as it was.
    pub fn cancel_bulk_delete(&mut self) {
        self.bulk_delete_pending = false;
    }

    // -----------------------------------------------------------------------
    // Ordering
    // -----------------------------------------------------------------------

    /// Move the task at visible position `from` to where the task at visible
    /// position `to` sits in the canonical list. Rejected unless the sort is
    /// manual, the positions differ, and both are in range.
    pub fn reorder(&self, tasks: &[Task], from: usize, to: usize) -> Option<Mutation> {
        if !self.can_reorder() || from == to {
            return None;
        }
        let visible = self.visible(tasks);
        let moved = visible.get(from)?.id;
        let target = visible.get(to)?.id;

        let source_idx = tasks.iter().position(|t| t.id == moved)?;
        let target_idx = tasks.iter().position(|t| t.id == target)?;

        let mut reordered = tasks.to_vec();
        move_item(&mut reordered, source_idx, target_idx);
        Some(Mutation::Reorder(reordered))
    }

    // -----------------------------------------------------------------------
    // Single-task actions
    // -----------------------------------------------------------------------

    pub fn archive(&self, tasks: &[Task], id: TaskId) -> Option<Mutation> {
        let task = find_task(tasks, id)?;
        Some(Mutation::Update(with_archived(task, true)))
    }

    pub fn unarchive(&self, tasks: &[Task], id: TaskId) -> Option<Mutation> {
        let task = find_task(tasks, id)?;
        Some(Mutation::Update(with_archived(task, false)))
    }

    pub fn toggle_complete(&self, tasks: &[Task], id: TaskId) -> Option<Mutation> {
        let task = find_task(tasks, id)?;
        Some(Mutation::Update(task_ops::toggled_complete(task)))
    }

    pub fn delete(&self, tasks: &[Task], id: TaskId) -> Option<Mutation> {
        find_task(tasks, id).map(|t| Mutation::Delete(t.id))
    }

    pub fn edit(&self, tasks: &[Task], id: TaskId, edit: &TaskEdit) -> Result<EditResult, TaskError> {
        let task = find_task(tasks, id).ok_or(TaskError::NotFound(id))?;
        match task_ops::apply_edit(task, edit)? {
            EditOutcome::Unchanged => Ok(EditResult::Unchanged),
            EditOutcome::Changed(updated) => Ok(EditResult::Changed(Mutation::Update(updated))),
        }
    }
}
