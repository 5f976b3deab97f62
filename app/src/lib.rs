//! TodoMVC on a reducer/store runtime.
//!
//! Two stores make up the application state:
//!
//! - the task store: an ordered list of tasks with derived counts and
//!   filtered views, recomputed on every read
//! - the view store: the selected filter and the task in edit mode
//!
//! Both are reducers composed into one [`AppReducer`] and run by a single
//! [`Store`](todomvc_runtime::Store). Every task list change is written to
//! the configured persistence sinks as a fire-and-forget effect.
//!
//! # Quick Start
//!
//! ```no_run
//! use todomvc::{AppAction, AppEnvironment, AppReducer, AppState, TaskAction};
//! use todomvc_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Store::new(
//!     AppState::new(),
//!     AppReducer::new(),
//!     AppEnvironment::production(Vec::new()),
//! );
//!
//! store
//!     .send(AppAction::Task(TaskAction::AddTask {
//!         title: "Buy milk".to_string(),
//!     }))
//!     .await?;
//!
//! let left = store.state(|s| s.tasks.active_count()).await;
//! println!("{left} left");
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod components;
pub mod config;
pub mod environment;
pub mod persistence;
pub mod router;
pub mod shell;
pub mod task_store;
pub mod types;
pub mod view_store;

// Re-export commonly used types
pub use app::{AppAction, AppReducer, AppState};
pub use config::{Config, ConfigError};
pub use environment::{AppEnvironment, UuidGenerator};
pub use persistence::{InMemoryStorage, LocalStorage, Persistence, PersistenceError, RemoteEndpoint};
pub use router::Router;
pub use task_store::{TaskAction, TaskEnvironment, TaskReducer, TaskState};
pub use types::{Filter, Task, TaskId, TaskRecord};
pub use view_store::{ViewAction, ViewReducer, ViewState};
