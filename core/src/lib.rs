//! # TodoMVC Core
//!
//! Core traits and types shared by the TodoMVC stores.
//!
//! State changes flow in one direction: an event handler sends an action,
//! a reducer mutates state in place and returns effect descriptions, and the
//! runtime executes those effects. Nothing outside a reducer writes state.
//!
//! ## Core Concepts
//!
//! - **State**: Owned data for a feature (task list, view selection)
//! - **Action**: Every input a reducer accepts
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: A side effect description, executed later by the runtime
//! - **Environment**: Injected dependencies (id generation, persistence sinks)
//!
//! ## Example
//!
//! ```ignore
//! use todomvc_core::{Effect, Reducer, SmallVec, smallvec};
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         state.count += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer composition (scoping child reducers into a parent state)
pub mod composition;

/// Reducer module - The core trait for state transitions
///
/// Reducers are deterministic: `(State, Action, Environment) → (State, Effects)`.
/// All I/O they want performed is described by the returned effects.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates `state` in place. Any read of `state` after this returns
        /// observes the new values.
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime. Most actions return none.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values, not execution. The runtime decides when and where
/// they run.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can feed back into the store
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Wrap a computation whose completion is not observed by the store
        ///
        /// Persistence writes use this: the store never awaits or retries them.
        pub fn fire_and_forget<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = ()> + Send + 'static,
            Action: 'static,
        {
            Effect::Future(Box::pin(async move {
                fut.await;
                None
            }))
        }

        /// Returns `true` if the effect does nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }

        /// Convert the actions an effect may produce into another action type
        ///
        /// Used when a child reducer's effects are lifted into a parent store.
        #[must_use]
        pub fn map<B>(self, f: fn(Action) -> B) -> Effect<B>
        where
            Action: Send + 'static,
            B: Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map(f)).collect())
                },
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    /// Generates opaque unique identifiers for new entities
    ///
    /// Production code uses random UUIDs; tests use a sequential generator so
    /// expected ids can be written down.
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier, never returned before by this generator
        fn next_id(&self) -> String;
    }
}

pub use effect::Effect;
pub use environment::IdGenerator;
pub use reducer::Reducer;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Inner {
        Ping,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Outer {
        Inner(Inner),
    }

    #[test]
    fn none_is_none() {
        assert!(Effect::<Inner>::None.is_none());
        assert!(Effect::<Inner>::merge(vec![Effect::None, Effect::None]).is_none());
        assert!(!Effect::<Inner>::fire_and_forget(async {}).is_none());
    }

    #[tokio::test]
    async fn map_lifts_future_output() {
        let effect: Effect<Inner> = Effect::Future(Box::pin(async { Some(Inner::Ping) }));

        let Effect::Future(fut) = effect.map(Outer::Inner) else {
            unreachable!("map preserves the variant");
        };
        assert_eq!(fut.await, Some(Outer::Inner(Inner::Ping)));
    }

    #[tokio::test]
    async fn fire_and_forget_produces_no_action() {
        let Effect::Future(fut) = Effect::<Inner>::fire_and_forget(async {}) else {
            unreachable!("fire_and_forget builds a future effect");
        };
        assert_eq!(fut.await, None);
    }
}
