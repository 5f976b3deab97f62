//! Reducer composition utilities
//!
//! A parent store owns several independent pieces of state, each with its own
//! reducer and action type. [`scope`] lifts a child reducer so it runs against
//! a field of the parent state and only sees the parent actions addressed to it.
//!
//! # Example
//!
//! ```ignore
//! use todomvc_core::composition::scope;
//!
//! let tasks = scope(
//!     TaskReducer::new(),
//!     |app: &mut AppState| &mut app.tasks,
//!     |action: AppAction| match action {
//!         AppAction::Task(action) => Some(action),
//!         _ => None,
//!     },
//!     AppAction::Task,
//! );
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Focus a child reducer on a field of the parent state.
///
/// # Arguments
///
/// - `reducer`: The child reducer
/// - `get_state`: Borrow the child state out of the parent state
/// - `extract_action`: Return the child action if the parent action targets it
/// - `embed_action`: Wrap child actions produced by effects back into parent actions
#[must_use]
pub fn scope<S, A, R>(
    reducer: R,
    get_state: fn(&mut S) -> &mut R::State,
    extract_action: fn(A) -> Option<R::Action>,
    embed_action: fn(R::Action) -> A,
) -> ScopedReducer<S, A, R>
where
    R: Reducer,
{
    ScopedReducer {
        reducer,
        get_state,
        extract_action,
        embed_action,
    }
}

/// A reducer focused on part of a larger state. Built by [`scope`].
pub struct ScopedReducer<S, A, R>
where
    R: Reducer,
{
    reducer: R,
    get_state: fn(&mut S) -> &mut R::State,
    extract_action: fn(A) -> Option<R::Action>,
    embed_action: fn(R::Action) -> A,
}

impl<S, A, R> Clone for ScopedReducer<S, A, R>
where
    R: Reducer + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            get_state: self.get_state,
            extract_action: self.extract_action,
            embed_action: self.embed_action,
        }
    }
}

impl<S, A, R> std::fmt::Debug for ScopedReducer<S, A, R>
where
    R: Reducer + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedReducer")
            .field("reducer", &self.reducer)
            .finish_non_exhaustive()
    }
}

impl<S, A, R> Reducer for ScopedReducer<S, A, R>
where
    R: Reducer,
    R::Action: Send + 'static,
    A: Send + 'static,
{
    type State = S;
    type Action = A;
    type Environment = R::Environment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(action) = (self.extract_action)(action) else {
            return SmallVec::new();
        };

        self.reducer
            .reduce((self.get_state)(state), action, env)
            .into_iter()
            .map(|effect| effect.map(self.embed_action))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smallvec;

    #[derive(Clone, Default)]
    struct SubState {
        value: i32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum SubAction {
        Add(i32),
        Echo,
    }

    #[derive(Clone)]
    struct SubReducer;

    impl Reducer for SubReducer {
        type State = SubState;
        type Action = SubAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                SubAction::Add(n) => {
                    state.value += n;
                    smallvec![Effect::None]
                },
                SubAction::Echo => {
                    smallvec![Effect::Future(Box::pin(async { Some(SubAction::Add(1)) }))]
                },
            }
        }
    }

    #[derive(Clone, Default)]
    struct ParentState {
        sub: SubState,
        other: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ParentAction {
        Sub(SubAction),
        Rename(String),
    }

    fn scoped() -> ScopedReducer<ParentState, ParentAction, SubReducer> {
        scope(
            SubReducer,
            |parent: &mut ParentState| &mut parent.sub,
            |action| match action {
                ParentAction::Sub(action) => Some(action),
                ParentAction::Rename(_) => None,
            },
            ParentAction::Sub,
        )
    }

    #[test]
    fn scoped_reducer_updates_only_its_field() {
        let scoped = scoped();
        let mut state = ParentState {
            sub: SubState { value: 5 },
            other: "test".to_string(),
        };

        let _ = scoped.reduce(&mut state, ParentAction::Sub(SubAction::Add(3)), &());
        assert_eq!(state.sub.value, 8);
        assert_eq!(state.other, "test");
    }

    #[test]
    fn scoped_reducer_ignores_foreign_actions() {
        let scoped = scoped();
        let mut state = ParentState::default();

        let effects = scoped.reduce(&mut state, ParentAction::Rename("x".to_string()), &());
        assert!(effects.is_empty());
        assert_eq!(state.sub.value, 0);
    }

    #[tokio::test]
    async fn scoped_reducer_embeds_effect_actions() {
        let scoped = scoped();
        let mut state = ParentState::default();

        let mut effects = scoped.reduce(&mut state, ParentAction::Sub(SubAction::Echo), &());
        assert_eq!(effects.len(), 1);

        let Some(Effect::Future(fut)) = effects.pop() else {
            unreachable!("echo produces a future effect");
        };
        assert_eq!(fut.await, Some(ParentAction::Sub(SubAction::Add(1))));
    }
}
