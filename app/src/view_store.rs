//! The view store: which filter is selected and which task is being edited.
//!
//! Edit mode is a small state machine driven only by commands:
//! `BeginEdit` enters it (replacing any edit in progress without committing
//! it), `CancelEdit` leaves it. Committing lives in the app reducer because
//! it touches the task list too.

use crate::task_store::TaskState;
use crate::types::{Filter, Task, TaskId};
use todomvc_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Transient UI selection state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    filter: Filter,
    editing: Option<TaskId>,
}

impl ViewState {
    /// Default view: all tasks, nothing being edited
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected filter
    #[must_use]
    pub const fn filter(&self) -> Filter {
        self.filter
    }

    /// Id of the task in edit mode, if any
    #[must_use]
    pub const fn editing_id(&self) -> Option<&TaskId> {
        self.editing.as_ref()
    }

    /// Whether `id` is the task in edit mode
    #[must_use]
    pub fn is_editing(&self, id: &TaskId) -> bool {
        self.editing.as_ref() == Some(id)
    }

    /// Resolves the edited task in `tasks`
    ///
    /// The view only remembers the id. If the task has since been removed,
    /// this returns `None`.
    #[must_use]
    pub fn task_being_edited<'a>(&self, tasks: &'a TaskState) -> Option<&'a Task> {
        self.editing.as_ref().and_then(|id| tasks.get(id))
    }
}

/// View selection commands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewAction {
    /// Select a filter
    SetFilter {
        /// New filter
        filter: Filter,
    },
    /// Put a task in edit mode; last write wins
    BeginEdit {
        /// Task to edit
        id: TaskId,
    },
    /// Leave edit mode without changing the task
    CancelEdit,
}

/// Reducer for the view selection
#[derive(Clone, Debug, Default)]
pub struct ViewReducer;

impl ViewReducer {
    /// Creates a new `ViewReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for ViewReducer {
    type State = ViewState;
    type Action = ViewAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ViewAction::SetFilter { filter } => {
                tracing::debug!(%filter, "Selecting filter");
                state.filter = filter;
            },
            ViewAction::BeginEdit { id } => {
                if let Some(previous) = state.editing.replace(id) {
                    tracing::debug!(%previous, "Abandoning edit in progress");
                }
            },
            ViewAction::CancelEdit => {
                state.editing = None;
            },
        }

        SmallVec::new()
    }
}
