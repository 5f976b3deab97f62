//! Application state: the task store and the view store composed.
//!
//! `AppReducer` lifts both child reducers into `AppState` and owns the
//! operations that need both halves: committing an edit and following a
//! route. It also emits the persistence effects after task list changes.

use crate::environment::AppEnvironment;
use crate::router::Router;
use crate::task_store::{TaskAction, TaskReducer, TaskState};
use crate::types::{Task, TaskRecord};
use crate::view_store::{ViewAction, ViewReducer, ViewState};
use std::sync::Arc;
use todomvc_core::composition::{scope, ScopedReducer};
use todomvc_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Both stores
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Task list
    pub tasks: TaskState,
    /// Filter and edit selection
    pub view: ViewState,
}

impl AppState {
    /// Empty task list, default view
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks visible under the selected filter, in list order
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.visible_tasks(self.view.filter())
    }

    /// The task in edit mode, if it still exists
    #[must_use]
    pub fn task_being_edited(&self) -> Option<&Task> {
        self.view.task_being_edited(&self.tasks)
    }
}

/// Every input the application store accepts
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppAction {
    /// Task list mutation
    Task(TaskAction),
    /// View selection change
    View(ViewAction),
    /// Finish the edit in progress with `text`
    ///
    /// The text is trimmed. Non-empty renames the task, empty destroys it.
    /// Either way edit mode ends.
    CommitEdit {
        /// Raw text from the edit field
        text: String,
    },
    /// The location fragment changed
    Navigate {
        /// Path or fragment, e.g. `/active` or `#/completed`
        path: String,
    },
}

/// Reducer for the whole application
#[derive(Clone, Debug)]
pub struct AppReducer {
    tasks: ScopedReducer<AppState, AppAction, TaskReducer>,
    view: ScopedReducer<AppState, AppAction, ViewReducer>,
    router: Router,
}

impl AppReducer {
    /// Creates a new `AppReducer`
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: scope(
                TaskReducer::new(),
                |app: &mut AppState| &mut app.tasks,
                |action| match action {
                    AppAction::Task(action) => Some(action),
                    _ => None,
                },
                AppAction::Task,
            ),
            view: scope(
                ViewReducer::new(),
                |app: &mut AppState| &mut app.view,
                |action| match action {
                    AppAction::View(action) => Some(action),
                    _ => None,
                },
                AppAction::View,
            ),
            router: Router::new(),
        }
    }

    fn reduce_tasks(
        &self,
        state: &mut AppState,
        action: TaskAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        // A restored snapshot is what the sinks already hold
        let write_back = !matches!(action, TaskAction::Hydrate { .. });
        let before = state.tasks.to_records();

        let mut effects = self.tasks.reduce(state, AppAction::Task(action), &env.tasks);

        if write_back && !env.persistence.is_empty() {
            let after = state.tasks.to_records();
            if after != before {
                effects.push(persist(&env.persistence, &after));
            }
        }

        effects
    }

    fn reduce_view(&self, state: &mut AppState, action: ViewAction) -> SmallVec<[Effect<AppAction>; 4]> {
        self.view.reduce(state, AppAction::View(action), &())
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::Task(action) => self.reduce_tasks(state, action, env),
            AppAction::View(action) => self.reduce_view(state, action),
            AppAction::CommitEdit { text } => {
                let Some(id) = state.view.editing_id().cloned() else {
                    tracing::debug!("Commit without an edit in progress ignored");
                    return SmallVec::new();
                };

                let title = text.trim();
                let action = if title.is_empty() {
                    TaskAction::Destroy { id }
                } else {
                    TaskAction::SetTitle {
                        id,
                        title: title.to_string(),
                    }
                };

                let mut effects = self.reduce_tasks(state, action, env);
                effects.extend(self.reduce_view(state, ViewAction::CancelEdit));
                effects
            },
            AppAction::Navigate { path } => match self.router.resolve(&path) {
                Some(filter) => self.reduce_view(state, ViewAction::SetFilter { filter }),
                None => {
                    tracing::debug!(%path, "Unhandled route");
                    SmallVec::new()
                },
            },
        }
    }
}

/// One fire-and-forget write per sink
fn persist(
    sinks: &[Arc<dyn crate::persistence::Persistence>],
    records: &[TaskRecord],
) -> Effect<AppAction> {
    Effect::merge(
        sinks
            .iter()
            .map(|sink| {
                let name = sink.name();
                let write = Arc::clone(sink).save(records.to_vec());
                Effect::fire_and_forget(async move {
                    if let Err(error) = write.await {
                        tracing::warn!(sink = name, %error, "Failed to persist tasks");
                    }
                })
            })
            .collect(),
    )
}
