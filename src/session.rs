//! The owning context: holds the canonical task list, applies mutations,
//! persists after each one, and turns outcomes into toasts.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::io::storage::Storage;
use crate::model::config::Config;
use crate::model::task::{Priority, Task, TaskId};
use crate::model::theme::Theme;
use crate::ops::engine::{EditResult, TaskEngine};
use crate::ops::mutation::Mutation;
use crate::ops::stats::TaskCounts;
use crate::ops::task_ops::{self, TaskDraft, TaskEdit, TaskError};
use crate::state::theme::ThemeState;
use crate::state::toast::{Clock, SystemClock, ToastQueue};

pub struct Session {
    storage: Storage,
    /// Captured at startup; when false nothing is ever written
    persistent: bool,
    tasks: Vec<Task>,
    engine: TaskEngine,
    toasts: ToastQueue,
    theme: ThemeState,
}

impl Session {
    pub fn open(storage: Storage, config: &Config) -> Session {
        Session::open_with_clock(storage, config, SystemClock::new())
    }

    /// Start a session. Loads saved tasks, or seeds the demo list on a first
    /// run. Unavailable storage gives an in-memory session with the demo
    /// list.
    pub fn open_with_clock(storage: Storage, config: &Config, clock: impl Clock + 'static) -> Session {
        let mut persistent = storage.is_storage_available();
        let tasks = if persistent {
            match storage.try_load_tasks() {
                Ok(saved) if saved.is_empty() && !storage.has_any_tasks_ever_saved() => {
                    tracing::info!("first run, seeding demo tasks");
                    let demo = demo_tasks();
                    storage.save_tasks(&demo);
                    demo
                }
                Ok(saved) => saved,
                // Stored data stays untouched until someone repairs or resets it.
                Err(e) => {
                    tracing::warn!(error = %e, "stored tasks unreadable, changes will not be saved");
                    persistent = false;
                    Vec::new()
                }
            }
        } else {
            tracing::warn!("storage unavailable, changes will not be saved");
            demo_tasks()
        };

        let mut toasts = ToastQueue::with_clock(clock);
        toasts.set_default_duration(config.toasts.duration_ms);
        let theme = ThemeState::load(&storage);

        Session {
            storage,
            persistent,
            tasks,
            engine: TaskEngine::with_view(config.view.filter, config.view.sort),
            toasts,
            theme,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn engine(&self) -> &TaskEngine {
        &self.engine
    }

    /// View state (filter, sort, search) lives on the engine
    pub fn engine_mut(&mut self) -> &mut TaskEngine {
        &mut self.engine
    }

    /// Fix the date used for overdue checks
    pub fn pin_today(&mut self, today: NaiveDate) {
        self.engine = std::mem::take(&mut self.engine).with_today(today);
    }

    pub fn visible(&self) -> Vec<&Task> {
        self.engine.visible(&self.tasks)
    }

    pub fn counts(&self) -> TaskCounts {
        self.engine.counts(&self.tasks)
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeState {
        &mut self.theme
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Apply a mutation to the canonical list and save. Returns whether the
    /// list changed.
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        let kind = mutation.kind();
        let count = mutation.len();
        let changed = mutation.apply(&mut self.tasks);
        tracing::debug!(kind, count, changed, "applied mutation");
        self.persist();
        changed
    }

    fn persist(&self) {
        if self.persistent {
            self.storage.save_tasks(&self.tasks);
        }
    }

    fn apply_opt(&mut self, mutation: Option<Mutation>) -> bool {
        match mutation {
            Some(m) => self.apply(m),
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Single-task actions
    // -----------------------------------------------------------------------

    /// Validation failures post no toast
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<TaskId, TaskError> {
        let now = Utc::now();
        let id = task_ops::next_task_id(&self.tasks, now);
        let task = task_ops::create_task(id, draft, now)?;
        self.apply(Mutation::Add(task));
        Ok(id)
    }

    /// Returns whether the task changed
    pub fn edit_task(&mut self, id: TaskId, edit: &TaskEdit) -> Result<bool, TaskError> {
        match self.engine.edit(&self.tasks, id, edit)? {
            EditResult::Unchanged => {
                self.toasts.warning("You didn't change anything!");
                Ok(false)
            }
            EditResult::Changed(mutation) => {
                self.apply(mutation);
                self.toasts.success("Task updated successfully!");
                Ok(true)
            }
        }
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        let mutation = self.engine.toggle_complete(&self.tasks, id);
        self.apply_opt(mutation)
    }

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let mutation = self.engine.delete(&self.tasks, id);
        let deleted = self.apply_opt(mutation);
        if deleted {
            self.toasts.success("Task deleted successfully!");
        }
        deleted
    }

    pub fn archive(&mut self, id: TaskId) -> bool {
        let Some(mutation) = self.engine.archive(&self.tasks, id) else {
            return false;
        };
        self.apply(mutation);
        self.toasts.success("Task archived successfully!");
        true
    }

    pub fn unarchive(&mut self, id: TaskId) -> bool {
        let Some(mutation) = self.engine.unarchive(&self.tasks, id) else {
            return false;
        };
        self.apply(mutation);
        self.toasts.success("Task unarchived successfully!");
        true
    }

    // -----------------------------------------------------------------------
    // Selection and bulk actions
    // -----------------------------------------------------------------------

    pub fn toggle_selection(&mut self, id: TaskId) -> bool {
        let mutation = self.engine.toggle_selection(&self.tasks, id);
        self.apply_opt(mutation)
    }

    pub fn toggle_select_all(&mut self) -> bool {
        let mutation = self.engine.toggle_select_all(&self.tasks);
        self.apply_opt(mutation)
    }

    /// Returns how many tasks were completed
    pub fn bulk_complete(&mut self) -> usize {
        let Some(mutation) = self.engine.bulk_complete(&self.tasks) else {
            return 0;
        };
        let n = mutation.len();
        self.apply(mutation);
        self.toasts.success(bulk_message(n, "completed"));
        n
    }

    pub fn request_bulk_delete(&mut self) -> bool {
        self.engine.request_bulk_delete(&self.tasks)
    }

    pub fn is_bulk_delete_pending(&self) -> bool {
        self.engine.is_bulk_delete_pending()
    }

    /// Returns how many tasks were deleted
    pub fn confirm_bulk_delete(&mut self) -> usize {
        let Some(mutation) = self.engine.confirm_bulk_delete(&self.tasks) else {
            return 0;
        };
        let n = mutation.len();
        self.apply(mutation);
        self.toasts.success(bulk_message(n, "deleted"));
        n
    }

    pub fn cancel_bulk_delete(&mut self) {
        self.engine.cancel_bulk_delete();
    }

    /// Move between visible positions (0-based). Only under manual sort.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let mutation = self.engine.reorder(&self.tasks, from, to);
        self.apply_opt(mutation)
    }

    // -----------------------------------------------------------------------
    // Theme and reset
    // -----------------------------------------------------------------------

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle(&self.storage)
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        self.theme.set(theme, &self.storage)
    }

    /// Forget every task, in memory and in storage. The next session seeds
    /// the demo list again.
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.engine.cancel_bulk_delete();
        if self.persistent {
            self.storage.clear_tasks();
        }
    }
}

fn bulk_message(n: usize, verb: &str) -> String {
    if n == 1 {
        format!("Task {verb} successfully!")
    } else {
        format!("{n} tasks {verb} successfully!")
    }
}

fn demo_date(day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// The list a first run starts with
pub fn demo_tasks() -> Vec<Task> {
    let seed = [
        (1, "Learn Rust Basics", "Study ownership, borrowing, and lifetimes", true, 15, Priority::High),
        (2, "Build Task Tracker App", "Create a complete task management application", false, 16, Priority::High),
        (3, "Practice Pattern Matching", "Work on enums, match arms, and destructuring", false, 17, Priority::Medium),
        (4, "Study Traits", "Learn about trait objects and generic bounds", true, 18, Priority::Medium),
        (5, "Write Integration Tests", "Drive the binary against a temporary data directory", false, 19, Priority::Low),
    ];
    seed.into_iter()
        .map(|(id, title, description, completed, day, priority)| Task {
            description: description.to_string(),
            completed,
            priority,
            ..Task::new(id, title, demo_date(day))
        })
        .collect()
}
