//! Production dependencies for the application store.

use crate::persistence::Persistence;
use crate::task_store::TaskEnvironment;
use std::sync::Arc;
use todomvc_core::environment::IdGenerator;
use uuid::Uuid;

/// Random v4 UUIDs as task ids
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Environment dependencies for the application reducer
#[derive(Clone)]
pub struct AppEnvironment {
    /// Dependencies of the task reducer
    pub tasks: TaskEnvironment,
    /// Sinks that receive a snapshot after every task list change
    pub persistence: Vec<Arc<dyn Persistence>>,
}

impl AppEnvironment {
    /// Creates a new `AppEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, persistence: Vec<Arc<dyn Persistence>>) -> Self {
        Self {
            tasks: TaskEnvironment::new(ids),
            persistence,
        }
    }

    /// Production environment: UUID ids
    #[must_use]
    pub fn production(persistence: Vec<Arc<dyn Persistence>>) -> Self {
        Self::new(Arc::new(UuidGenerator), persistence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_are_unique() {
        let ids = UuidGenerator;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
