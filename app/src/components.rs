//! Text render tree.
//!
//! Components are plain functions of `AppState`: they read derived values
//! and return lines, and turn user gestures into `AppAction`s. The only
//! component-local state is the text of the edit field, which lives in
//! [`EditField`] and is owned by whoever drives the UI.

use crate::app::{AppAction, AppState};
use crate::task_store::TaskAction;
use crate::types::{Filter, Task};
use crate::view_store::ViewAction;
use std::fmt::Write as _;

/// Text typed into the edit field of the task in edit mode
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditField {
    text: String,
}

impl EditField {
    /// Field pre-filled with `text`
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Current text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text, as typing would
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// Title and new-task entry
pub struct Header;

impl Header {
    /// Heading text
    pub const TITLE: &'static str = "todos";

    /// Placeholder of the entry field
    pub const PLACEHOLDER: &'static str = "What needs to be done?";

    /// Enter pressed in the entry field
    ///
    /// Blank input adds nothing.
    #[must_use]
    pub fn submit(input: &str) -> Option<AppAction> {
        let title = input.trim();
        if title.is_empty() {
            return None;
        }

        Some(AppAction::Task(TaskAction::AddTask {
            title: title.to_string(),
        }))
    }

    /// Render the header
    #[must_use]
    pub fn render() -> String {
        format!("{}\n  ({})", Self::TITLE, Self::PLACEHOLDER)
    }
}

/// Toggle-all control and the visible list
pub struct MainSection;

impl MainSection {
    /// Whether the toggle-all checkbox is checked
    #[must_use]
    pub fn toggle_all_checked(state: &AppState) -> bool {
        state.tasks.active_count() == 0
    }

    /// Toggle-all checkbox clicked
    #[must_use]
    pub fn toggle_all(state: &AppState) -> AppAction {
        AppAction::Task(TaskAction::ToggleAll {
            checked: !Self::toggle_all_checked(state),
        })
    }

    /// Render the section, or `None` when there are no tasks
    #[must_use]
    pub fn render(state: &AppState, edit: Option<&EditField>) -> Option<String> {
        if state.tasks.is_empty() {
            return None;
        }

        let mut out = format!(
            "{} toggle all",
            checkbox(Self::toggle_all_checked(state))
        );
        for (index, task) in state.visible_tasks().into_iter().enumerate() {
            let editing = state.view.is_editing(task.id());
            out.push('\n');
            out.push_str(&TaskItem::render(index + 1, task, editing.then_some(edit).flatten()));
        }

        Some(out)
    }
}

/// One row of the list
pub struct TaskItem;

impl TaskItem {
    /// Double-click on the title: enter edit mode pre-filled with the title
    #[must_use]
    pub fn begin_edit(task: &Task) -> (AppAction, EditField) {
        (
            AppAction::View(ViewAction::BeginEdit {
                id: task.id().clone(),
            }),
            EditField::new(task.title()),
        )
    }

    /// Enter pressed (or focus lost) in the edit field
    #[must_use]
    pub fn submit(field: &mut EditField) -> AppAction {
        let text = field.text().trim().to_string();
        field.set_text(text.clone());
        AppAction::CommitEdit { text }
    }

    /// Escape pressed in the edit field: discard the typed text
    #[must_use]
    pub fn cancel(field: &mut EditField, task: &Task) -> AppAction {
        field.set_text(task.title());
        AppAction::View(ViewAction::CancelEdit)
    }

    /// Checkbox clicked
    #[must_use]
    pub fn toggle(task: &Task) -> AppAction {
        AppAction::Task(TaskAction::Toggle {
            id: task.id().clone(),
        })
    }

    /// Destroy button clicked
    #[must_use]
    pub fn destroy(task: &Task) -> AppAction {
        AppAction::Task(TaskAction::Destroy {
            id: task.id().clone(),
        })
    }

    /// Render the row at 1-based `position`
    ///
    /// `edit` is the field text when this row is in edit mode.
    #[must_use]
    pub fn render(position: usize, task: &Task, edit: Option<&EditField>) -> String {
        let mut row = format!("{position:>3}. {} {}", checkbox(task.completed()), task.title());
        if let Some(field) = edit {
            let _ = write!(row, "  [editing: {}]", field.text());
        }
        row
    }
}

/// Count, filter links and clear button
pub struct Footer;

impl Footer {
    /// "3 items left", "1 item left", "No items left"
    #[must_use]
    pub fn count_text(state: &AppState) -> String {
        let count = state.tasks.active_count();
        let count = if count == 0 {
            "No".to_string()
        } else {
            count.to_string()
        };
        format!("{count} {} left", state.tasks.active_word())
    }

    /// Filter link, selected one in brackets
    #[must_use]
    pub fn filter_link(filter: Filter, selected: Filter) -> String {
        if filter == selected {
            format!("[{}]({})", filter.caption(), filter.href())
        } else {
            format!("{}({})", filter.caption(), filter.href())
        }
    }

    /// Whether "Clear completed" is offered
    #[must_use]
    pub fn shows_clear_completed(state: &AppState) -> bool {
        state.tasks.completed_count() > 0
    }

    /// "Clear completed" clicked
    #[must_use]
    pub const fn clear_completed() -> AppAction {
        AppAction::Task(TaskAction::ClearCompleted)
    }

    /// Render the footer, or `None` when there are no tasks
    #[must_use]
    pub fn render(state: &AppState) -> Option<String> {
        if state.tasks.is_empty() {
            return None;
        }

        let links: Vec<String> = Filter::ALL
            .iter()
            .map(|filter| Self::filter_link(*filter, state.view.filter()))
            .collect();

        let mut out = format!("{}   {}", Self::count_text(state), links.join(" "));
        if Self::shows_clear_completed(state) {
            out.push_str("   Clear completed");
        }
        Some(out)
    }
}

/// Render the whole application
#[must_use]
pub fn render(state: &AppState, edit: Option<&EditField>) -> String {
    let mut sections = vec![Header::render()];
    sections.extend(MainSection::render(state, edit));
    sections.extend(Footer::render(state));
    sections.join("\n")
}

const fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_store::TaskState;
    use crate::types::{TaskId, TaskRecord};
    use crate::view_store::ViewState;

    fn record(id: &str, title: &str, completed: bool) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            title: title.to_string(),
            completed,
        }
    }

    fn state(records: Vec<TaskRecord>) -> AppState {
        AppState {
            tasks: TaskState::from_records(records),
            view: ViewState::new(),
        }
    }

    #[test]
    fn header_ignores_blank_input() {
        assert_eq!(Header::submit("   "), None);
        assert_eq!(
            Header::submit("  Buy milk "),
            Some(AppAction::Task(TaskAction::AddTask {
                title: "Buy milk".to_string()
            }))
        );
    }

    #[test]
    fn empty_list_hides_main_and_footer() {
        let empty = AppState::new();
        assert_eq!(MainSection::render(&empty, None), None);
        assert_eq!(Footer::render(&empty), None);
        assert_eq!(render(&empty, None), Header::render());
    }

    #[test]
    fn footer_count_text() {
        assert_eq!(
            Footer::count_text(&state(vec![record("a", "a", true)])),
            "No items left"
        );
        assert_eq!(
            Footer::count_text(&state(vec![record("a", "a", false)])),
            "1 item left"
        );
        assert_eq!(
            Footer::count_text(&state(vec![
                record("a", "a", false),
                record("b", "b", false),
                record("c", "c", true),
            ])),
            "2 items left"
        );
    }

    #[test]
    fn footer_marks_selected_filter_and_clear_button() {
        let mut app = state(vec![record("a", "a", false)]);
        let footer = Footer::render(&app).unwrap_or_default();
        assert_eq!(footer, "1 item left   [All](#/) Active(#/active) Completed(#/completed)");

        app = state(vec![record("a", "a", true)]);
        assert!(Footer::shows_clear_completed(&app));
        assert!(Footer::render(&app).unwrap_or_default().ends_with("Clear completed"));
    }

    #[test]
    fn toggle_all_checkbox_follows_active_count() {
        let all_done = state(vec![record("a", "a", true), record("b", "b", true)]);
        assert!(MainSection::toggle_all_checked(&all_done));
        assert_eq!(
            MainSection::toggle_all(&all_done),
            AppAction::Task(TaskAction::ToggleAll { checked: false })
        );

        let some_active = state(vec![record("a", "a", true), record("b", "b", false)]);
        assert!(!MainSection::toggle_all_checked(&some_active));
        assert_eq!(
            MainSection::toggle_all(&some_active),
            AppAction::Task(TaskAction::ToggleAll { checked: true })
        );
    }

    #[test]
    fn main_section_lists_visible_tasks() {
        let app = state(vec![record("a", "Walk dog", true), record("b", "Buy milk", false)]);

        let rendered = MainSection::render(&app, None).unwrap_or_default();
        assert_eq!(
            rendered,
            "[ ] toggle all\n  1. [x] Walk dog\n  2. [ ] Buy milk"
        );
    }

    #[test]
    fn edit_gestures() {
        let app = state(vec![record("a", "Buy milk", false)]);
        let task = &app.tasks.tasks()[0];

        let (action, mut field) = TaskItem::begin_edit(task);
        assert_eq!(
            action,
            AppAction::View(ViewAction::BeginEdit { id: TaskId::new("a") })
        );
        assert_eq!(field.text(), "Buy milk");

        field.set_text("  Buy oat milk ");
        assert_eq!(
            TaskItem::submit(&mut field),
            AppAction::CommitEdit {
                text: "Buy oat milk".to_string()
            }
        );
        assert_eq!(field.text(), "Buy oat milk");

        field.set_text("scrap this");
        assert_eq!(
            TaskItem::cancel(&mut field, task),
            AppAction::View(ViewAction::CancelEdit)
        );
        assert_eq!(field.text(), "Buy milk");
    }

    #[test]
    fn editing_row_shows_field_text() {
        let task = Task::from_record(record("a", "Buy milk", false));
        let field = EditField::new("Buy m");
        assert_eq!(
            TaskItem::render(1, &task, Some(&field)),
            "  1. [ ] Buy milk  [editing: Buy m]"
        );
    }
}
