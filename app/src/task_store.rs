//! The task store: the ordered task list and all task-count arithmetic.
//!
//! `TaskState` owns the tasks. Every count and view over them is computed on
//! read, so a read that follows a mutation always sees the new list.
//!
//! The reducer does not validate titles. The render layer trims input and
//! never sends an empty title to `AddTask` or `SetTitle`.

use crate::types::{Filter, Task, TaskId, TaskRecord};
use std::sync::Arc;
use todomvc_core::{effect::Effect, environment::IdGenerator, reducer::Reducer, SmallVec};

/// Ordered task list, insertion order preserved
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskState {
    tasks: Vec<Task>,
}

impl TaskState {
    /// Creates an empty task list
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// All tasks in insertion order
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when there are no tasks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks a task up by id
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    /// Number of tasks not yet completed
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed()).count()
    }

    /// Number of completed tasks
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.len() - self.active_count()
    }

    /// "item" or "items", agreeing with [`TaskState::active_count`]
    #[must_use]
    pub fn active_word(&self) -> &'static str {
        pluralize(self.active_count(), "item", "items")
    }

    /// Whether no task is left active (drives the toggle-all checkbox)
    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.active_count() == 0
    }

    /// Tasks matching `filter`, in list order
    #[must_use]
    pub fn visible_tasks(&self, filter: Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|task| filter.matches(task)).collect()
    }

    /// Plain serializable snapshot, in list order
    #[must_use]
    pub fn to_records(&self) -> Vec<TaskRecord> {
        self.tasks.iter().map(Task::to_record).collect()
    }

    /// Rebuilds a task list from a snapshot produced by [`TaskState::to_records`]
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = TaskRecord>) -> Self {
        Self {
            tasks: records.into_iter().map(Task::from_record).collect(),
        }
    }
}

const fn pluralize(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

/// Mutations of the task list
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskAction {
    /// Append a new active task with a fresh id
    AddTask {
        /// Caller-trimmed title
        title: String,
    },
    /// Set every task's completed flag
    ToggleAll {
        /// New completed flag
        checked: bool,
    },
    /// Drop completed tasks, keeping the rest in order
    ClearCompleted,
    /// Flip one task's completed flag
    Toggle {
        /// Task to flip
        id: TaskId,
    },
    /// Rename one task
    SetTitle {
        /// Task to rename
        id: TaskId,
        /// Caller-trimmed, non-empty title
        title: String,
    },
    /// Remove one task
    Destroy {
        /// Task to remove
        id: TaskId,
    },
    /// Replace the whole list from a persisted snapshot
    Hydrate {
        /// Snapshot in list order
        records: Vec<TaskRecord>,
    },
}

/// Environment dependencies for the task reducer
#[derive(Clone)]
pub struct TaskEnvironment {
    /// Source of fresh task ids
    pub ids: Arc<dyn IdGenerator>,
}

impl TaskEnvironment {
    /// Creates a new `TaskEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }
}

/// Reducer for the task list
#[derive(Clone, Debug, Default)]
pub struct TaskReducer;

impl TaskReducer {
    /// Creates a new `TaskReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TaskReducer {
    type State = TaskState;
    type Action = TaskAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TaskAction::AddTask { title } => {
                let id = TaskId::new(env.ids.next_id());
                tracing::debug!(%id, "Adding task");
                state.tasks.push(Task::new(id, title));
            },
            TaskAction::ToggleAll { checked } => {
                for task in &mut state.tasks {
                    task.set_completed(checked);
                }
            },
            TaskAction::ClearCompleted => {
                state.tasks.retain(|task| !task.completed());
            },
            TaskAction::Toggle { id } => match state.get_mut(&id) {
                Some(task) => task.toggle(),
                None => tracing::debug!(%id, "Toggle for unknown task ignored"),
            },
            TaskAction::SetTitle { id, title } => match state.get_mut(&id) {
                Some(task) => task.set_title(title),
                None => tracing::debug!(%id, "Rename for unknown task ignored"),
            },
            TaskAction::Destroy { id } => {
                let before = state.tasks.len();
                state.tasks.retain(|task| task.id() != &id);
                if state.tasks.len() == before {
                    tracing::debug!(%id, "Destroy for unknown task ignored");
                }
            },
            TaskAction::Hydrate { records } => {
                tracing::debug!(count = records.len(), "Hydrating task list");
                *state = TaskState::from_records(records);
            },
        }

        SmallVec::new()
    }
}
