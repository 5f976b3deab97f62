//! Line-oriented shell driving the application store.
//!
//! Each input line parses into a [`Command`]. A [`Session`] turns commands
//! into gestures on the render tree and sends the resulting actions. Row
//! numbers are 1-based positions in the currently visible list.
//!
//! Rendering is separate: [`render_loop`] waits for store revisions (or edit
//! field changes) and hands a fresh rendition to its sink. Each rendition is
//! a [`frame`] that ends with the prompt, so output after a change is never
//! split by the next prompt.

use crate::app::{AppAction, AppReducer, AppState};
use crate::components::{self, EditField, Footer, Header, MainSection, TaskItem};
use crate::environment::AppEnvironment;
use crate::types::Task;
use crate::view_store::ViewAction;
use thiserror::Error;
use todomvc_runtime::{EffectHandle, Store, StoreError};
use tokio::sync::watch;

/// The application store
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Printed before each input line
pub const PROMPT: &str = "> ";

/// Shell usage text
pub const HELP: &str = "\
commands:
  add <title>        add a task
  toggle <n>         toggle row n
  toggle-all         complete every task, or reopen all when all are done
  edit <n>           start editing row n
  commit [text]      finish the edit (empty text deletes the task)
  cancel             abandon the edit
  destroy <n>        delete row n
  clear              delete completed tasks
  route <path>       show /, /active or /completed (or type #/active)
  show               print the list
  help               print this text
  quit               exit";

/// Errors reported back to the shell user
#[derive(Error, Debug)]
pub enum ShellError {
    /// The first word is not a command
    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    /// A required argument is absent
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// A row argument is not a positive integer
    #[error("Not a row number: {0}")]
    InvalidRow(String),

    /// The row is not in the visible list
    #[error("No row {0} in the current list")]
    NoSuchRow(usize),

    /// Commit or cancel with no edit in progress
    #[error("Nothing is being edited")]
    NotEditing,

    /// The store rejected the action
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Add a task
    Add(String),
    /// Toggle a row
    Toggle(usize),
    /// Toggle-all checkbox
    ToggleAll,
    /// Begin editing a row
    Edit(usize),
    /// Commit the edit, optionally replacing the field text first
    Commit(Option<String>),
    /// Cancel the edit
    Cancel,
    /// Delete a row
    Destroy(usize),
    /// Clear completed tasks
    Clear,
    /// Follow a route
    Route(String),
    /// Print the list
    Show,
    /// Print usage
    Help,
    /// Exit
    Quit,
    /// Blank line
    Empty,
}

impl Command {
    /// Parse one input line
    ///
    /// # Errors
    ///
    /// Returns [`ShellError`] for unknown commands and bad arguments.
    pub fn parse(line: &str) -> Result<Self, ShellError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }
        if line.starts_with('#') {
            return Ok(Self::Route(line.to_string()));
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word {
            "add" => Ok(Self::Add(rest.to_string())),
            "toggle" => Ok(Self::Toggle(row(rest)?)),
            "toggle-all" => Ok(Self::ToggleAll),
            "edit" => Ok(Self::Edit(row(rest)?)),
            "commit" => Ok(Self::Commit((!rest.is_empty()).then(|| rest.to_string()))),
            "cancel" => Ok(Self::Cancel),
            "destroy" | "rm" => Ok(Self::Destroy(row(rest)?)),
            "clear" => Ok(Self::Clear),
            "route" => {
                if rest.is_empty() {
                    return Err(ShellError::MissingArgument("path"));
                }
                Ok(Self::Route(rest.to_string()))
            },
            "show" | "ls" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(ShellError::UnknownCommand(other.to_string())),
        }
    }
}

fn row(arg: &str) -> Result<usize, ShellError> {
    if arg.is_empty() {
        return Err(ShellError::MissingArgument("row"));
    }
    match arg.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(ShellError::InvalidRow(arg.to_string())),
    }
}

/// Outcome of one command
#[derive(Debug)]
pub enum Reply {
    /// An action was sent; the handle tracks its persistence writes
    Sent(EffectHandle),
    /// Text for the user
    Message(String),
    /// Nothing happened
    Nothing,
    /// The user asked to leave
    Quit,
}

/// One interactive session against a store
///
/// Owns the edit field, the only state that lives outside the store.
pub struct Session {
    store: AppStore,
    edit: watch::Sender<Option<EditField>>,
}

impl Session {
    /// Session driving `store`
    #[must_use]
    pub fn new(store: AppStore) -> Self {
        let (edit, _) = watch::channel(None);
        Self { store, edit }
    }

    /// The store this session drives
    #[must_use]
    pub const fn store(&self) -> &AppStore {
        &self.store
    }

    /// Follow edit field changes
    #[must_use]
    pub fn subscribe_edit(&self) -> watch::Receiver<Option<EditField>> {
        self.edit.subscribe()
    }

    /// Current rendition of the whole application
    pub async fn render(&self) -> String {
        let edit = self.edit.borrow().clone();
        self.store
            .state(|state| components::render(state, edit.as_ref()))
            .await
    }

    /// Parse and run one input line
    ///
    /// # Errors
    ///
    /// See [`Session::execute`].
    pub async fn handle_line(&self, line: &str) -> Result<Reply, ShellError> {
        self.execute(Command::parse(line)?).await
    }

    /// Run one command
    ///
    /// # Errors
    ///
    /// Returns [`ShellError`] for rows outside the visible list, commit or
    /// cancel without an edit, and actions the store rejects.
    pub async fn execute(&self, command: Command) -> Result<Reply, ShellError> {
        match command {
            Command::Add(title) => match Header::submit(&title) {
                Some(action) => self.send(action).await,
                None => Ok(Reply::Nothing),
            },
            Command::Toggle(row) => {
                let task = self.visible_row(row).await?;
                self.send(TaskItem::toggle(&task)).await
            },
            Command::ToggleAll => {
                let action = self.store.state(MainSection::toggle_all).await;
                self.send(action).await
            },
            Command::Edit(row) => {
                let task = self.visible_row(row).await?;
                let (action, field) = TaskItem::begin_edit(&task);
                self.edit.send_replace(Some(field));
                self.send(action).await
            },
            Command::Commit(text) => {
                let mut field = self.edit.borrow().clone().ok_or(ShellError::NotEditing)?;
                if let Some(text) = text {
                    field.set_text(text);
                }
                let action = TaskItem::submit(&mut field);
                self.edit.send_replace(None);
                self.send(action).await
            },
            Command::Cancel => {
                let mut field = self.edit.borrow().clone().ok_or(ShellError::NotEditing)?;
                let task = self
                    .store
                    .state(|state| state.task_being_edited().cloned())
                    .await;
                self.edit.send_replace(None);
                match task {
                    Some(task) => self.send(TaskItem::cancel(&mut field, &task)).await,
                    None => self.send(AppAction::View(ViewAction::CancelEdit)).await,
                }
            },
            Command::Destroy(row) => {
                let task = self.visible_row(row).await?;
                let editing = self.store.state(|state| state.view.is_editing(task.id())).await;
                if editing {
                    self.edit.send_replace(None);
                }
                self.send(TaskItem::destroy(&task)).await
            },
            Command::Clear => self.send(Footer::clear_completed()).await,
            Command::Route(path) => self.send(AppAction::Navigate { path }).await,
            Command::Show => Ok(Reply::Message(self.render().await)),
            Command::Help => Ok(Reply::Message(HELP.to_string())),
            Command::Quit => Ok(Reply::Quit),
            Command::Empty => Ok(Reply::Nothing),
        }
    }

    async fn send(&self, action: AppAction) -> Result<Reply, ShellError> {
        Ok(Reply::Sent(self.store.send(action).await?))
    }

    async fn visible_row(&self, row: usize) -> Result<Task, ShellError> {
        self.store
            .state(|state| {
                row.checked_sub(1)
                    .and_then(|index| state.visible_tasks().get(index).map(|task| (*task).clone()))
            })
            .await
            .ok_or(ShellError::NoSuchRow(row))
    }
}

/// A rendition followed by the prompt for the next line
#[must_use]
pub fn frame(view: &str) -> String {
    format!("\n{view}\n\n{PROMPT}")
}

/// Render whenever the store revision or the edit field changes
///
/// Subscribes to the store when called, so changes sent before the returned
/// future first runs are not missed. Each rendition goes to `sink` as a
/// [`frame`].
pub fn render_loop<F>(
    store: AppStore,
    mut edit: watch::Receiver<Option<EditField>>,
    mut sink: F,
) -> impl Future<Output = ()>
where
    F: FnMut(String),
{
    let mut revisions = store.subscribe();
    async move {
        loop {
            tokio::select! {
                changed = revisions.changed() => if changed.is_err() { break },
                changed = edit.changed() => if changed.is_err() { break },
            }

            // One frame for changes that arrived together
            let _ = revisions.borrow_and_update();
            let field = edit.borrow_and_update().clone();
            let view = store
                .state(|state| components::render(state, field.as_ref()))
                .await;
            sink(frame(&view));
        }
    }
}
