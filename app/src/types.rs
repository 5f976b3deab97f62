//! Domain types for the task list.
//!
//! A task is an id, a title and a completed flag. The id is assigned once at
//! creation and never changes; the title only changes through an explicit
//! rename.

use serde::{Deserialize, Serialize};

/// Opaque unique identifier for a task
///
/// Stored as a string so that ids read back from persisted snapshots are
/// accepted as-is, whatever generator produced them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single to-do entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    completed: bool,
}

impl Task {
    /// Creates an active task
    #[must_use]
    pub const fn new(id: TaskId, title: String) -> Self {
        Self {
            id,
            title,
            completed: false,
        }
    }

    /// Unique identifier
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Current title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the task is completed
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Flips the completed flag
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Sets the completed flag
    pub const fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Renames the task
    ///
    /// Callers trim and reject empty titles before calling; an empty commit
    /// destroys the task instead of renaming it.
    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    /// Plain serializable snapshot of this task
    #[must_use]
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id.as_str().to_string(),
            title: self.title.clone(),
            completed: self.completed,
        }
    }

    /// Rebuilds a task from its snapshot, keeping every field
    #[must_use]
    pub fn from_record(record: TaskRecord) -> Self {
        Self {
            id: TaskId::new(record.id),
            title: record.title,
            completed: record.completed,
        }
    }
}

/// Persisted shape of a task: `{id, title, completed}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Completed flag
    pub completed: bool,
}

/// Which tasks the list shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks
    Completed,
}

impl Filter {
    /// All filters in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Route path selecting this filter
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::All => "/",
            Self::Active => "/active",
            Self::Completed => "/completed",
        }
    }

    /// Link target used by the footer
    #[must_use]
    pub const fn href(self) -> &'static str {
        match self {
            Self::All => "#/",
            Self::Active => "#/active",
            Self::Completed => "#/completed",
        }
    }

    /// Footer caption
    #[must_use]
    pub const fn caption(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Whether `task` is visible under this filter
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.caption())
    }
}
