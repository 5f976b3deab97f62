//! # TodoMVC Testing
//!
//! Testing utilities and helpers for the TodoMVC stores.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then builder for reducers
//! - Property-based testing strategies
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todomvc_testing::{ReducerTest, SequentialIdGenerator};
//!
//! ReducerTest::new(TaskReducer::new())
//!     .with_env(TaskEnvironment::new(Arc::new(SequentialIdGenerator::new())))
//!     .given_state(TaskState::new())
//!     .when_action(TaskAction::AddTask { title: "Buy milk".into() })
//!     .then_state(|state| assert_eq!(state.active_count(), 1))
//!     .run();
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use todomvc_core::environment::IdGenerator;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{AtomicU64, IdGenerator, Ordering};

    /// Predictable id generator: `task-1`, `task-2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use todomvc_testing::mocks::SequentialIdGenerator;
    /// use todomvc_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id(), "task-1");
    /// assert_eq!(ids.next_id(), "task-2");
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Generator producing `task-N`
        #[must_use]
        pub fn new() -> Self {
            Self::with_prefix("task")
        }

        /// Generator producing `{prefix}-N`
        #[must_use]
        pub fn with_prefix(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            format!("{}-{n}", self.prefix)
        }
    }
}

/// Property-based testing strategies using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// A title as the render layer would pass it: trimmed and non-empty
    pub fn title() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ]{0,22}[A-Za-z0-9]|[A-Za-z0-9]"
    }

    /// Between `0` and `max` titles
    pub fn titles(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(title(), 0..=max)
    }

    /// Titles paired with the completed flag each task should end up with
    pub fn tasks_with_flags(max: usize) -> impl Strategy<Value = Vec<(String, bool)>> {
        prop::collection::vec((title(), any::<bool>()), 0..=max)
    }
}

// Re-export commonly used items
pub use mocks::SequentialIdGenerator;
pub use reducer_test::{assertions, ReducerTest};
