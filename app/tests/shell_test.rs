//! Shell sessions driving a store end to end.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;
use todomvc::shell::{frame, AppStore, Command, Reply, Session, ShellError, PROMPT};
use todomvc::{AppEnvironment, AppReducer, AppState, Filter, InMemoryStorage, Persistence};
use todomvc_runtime::Store;
use todomvc_testing::SequentialIdGenerator;

fn session_with(sinks: Vec<Arc<dyn Persistence>>) -> Session {
    let store: AppStore = Store::new(
        AppState::new(),
        AppReducer::new(),
        AppEnvironment::new(Arc::new(SequentialIdGenerator::new()), sinks),
    );
    Session::new(store)
}

async fn run(session: &Session, lines: &[&str]) {
    for line in lines {
        session.handle_line(line).await.unwrap();
    }
}

async fn titles(session: &Session) -> Vec<(String, bool)> {
    session
        .store()
        .state(|s| {
            s.tasks
                .tasks()
                .iter()
                .map(|t| (t.title().to_string(), t.completed()))
                .collect()
        })
        .await
}

#[test]
fn parses_commands() {
    assert_eq!(Command::parse("add  Buy milk ").unwrap(), Command::Add("Buy milk".to_string()));
    assert_eq!(Command::parse("toggle 2").unwrap(), Command::Toggle(2));
    assert_eq!(Command::parse("commit").unwrap(), Command::Commit(None));
    assert_eq!(
        Command::parse("commit new title").unwrap(),
        Command::Commit(Some("new title".to_string()))
    );
    assert_eq!(Command::parse("#/active").unwrap(), Command::Route("#/active".to_string()));
    assert_eq!(Command::parse("  ").unwrap(), Command::Empty);
    assert_eq!(Command::parse("q").unwrap(), Command::Quit);

    assert!(matches!(Command::parse("toggle 0"), Err(ShellError::InvalidRow(_))));
    assert!(matches!(Command::parse("toggle"), Err(ShellError::MissingArgument("row"))));
    assert!(matches!(Command::parse("route"), Err(ShellError::MissingArgument("path"))));
    assert!(matches!(Command::parse("frobnicate"), Err(ShellError::UnknownCommand(_))));
}

#[test]
fn frame_ends_with_the_prompt() {
    let framed = frame("0 items");
    assert!(framed.contains("0 items"));
    assert!(framed.ends_with(PROMPT));
    assert_eq!(framed.matches(PROMPT).count(), 1);
}

#[tokio::test]
async fn blank_add_is_ignored() {
    let session = session_with(Vec::new());
    let reply = session.handle_line("add    ").await.unwrap();
    assert!(matches!(reply, Reply::Nothing));
    assert!(titles(&session).await.is_empty());
}

#[tokio::test]
async fn rows_follow_the_visible_list() {
    let session = session_with(Vec::new());
    run(&session, &["add a", "add b", "add c", "toggle 2", "route /active", "toggle 2"]).await;

    // Under /active the second row is "c"
    assert_eq!(
        titles(&session).await,
        [
            ("a".to_string(), false),
            ("b".to_string(), true),
            ("c".to_string(), true),
        ]
    );

    let error = session.handle_line("toggle 2").await.unwrap_err();
    assert!(matches!(error, ShellError::NoSuchRow(2)));
}

#[tokio::test]
async fn edit_commit_and_cancel() {
    let session = session_with(Vec::new());
    run(&session, &["add Buy milk", "edit 1"]).await;
    assert!(session.render().await.contains("[editing: Buy milk]"));

    run(&session, &["commit   Buy oat milk  "]).await;
    assert_eq!(titles(&session).await, [("Buy oat milk".to_string(), false)]);
    assert!(!session.render().await.contains("editing"));

    run(&session, &["edit 1", "cancel"]).await;
    assert_eq!(titles(&session).await, [("Buy oat milk".to_string(), false)]);

    let error = session.handle_line("cancel").await.unwrap_err();
    assert!(matches!(error, ShellError::NotEditing));
}

#[tokio::test]
async fn commit_with_empty_field_deletes() {
    let session = session_with(Vec::new());
    run(&session, &["add x", "add y", "edit 1"]).await;

    // The field starts with the title; clear it the way a user would
    session.execute(Command::Commit(Some("   ".to_string()))).await.unwrap();
    assert_eq!(titles(&session).await, [("y".to_string(), false)]);
}

#[tokio::test]
async fn toggle_all_and_clear() {
    let session = session_with(Vec::new());
    run(&session, &["add a", "add b", "toggle-all"]).await;
    assert!(session.render().await.contains("No items left"));

    run(&session, &["toggle-all"]).await;
    assert!(session.render().await.contains("2 items left"));

    run(&session, &["toggle 1", "clear"]).await;
    assert_eq!(titles(&session).await, [("b".to_string(), false)]);
}

#[tokio::test]
async fn routes_change_the_footer_selection() {
    let session = session_with(Vec::new());
    run(&session, &["add a", "#/completed"]).await;

    assert_eq!(session.store().state(|s| s.view.filter()).await, Filter::Completed);
    assert!(session.render().await.contains("[Completed](#/completed)"));
}

#[tokio::test]
async fn commands_persist_through_the_store() {
    let storage = Arc::new(InMemoryStorage::new());
    let sinks: Vec<Arc<dyn Persistence>> = vec![storage.clone()];
    let session = session_with(sinks);

    let Reply::Sent(mut handle) = session.handle_line("add Buy milk").await.unwrap() else {
        unreachable!("add sends an action");
    };
    handle.wait().await;

    let latest = storage.latest().unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].title, "Buy milk");
}

#[tokio::test]
async fn renderer_prints_after_changes() {
    let session = session_with(Vec::new());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let renderer = tokio::spawn(todomvc::shell::render_loop(
        session.store().clone(),
        session.subscribe_edit(),
        move |view| {
            let _ = tx.send(view);
        },
    ));

    run(&session, &["add Walk dog"]).await;
    let view = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(view.contains("Walk dog"));
    assert!(view.contains("1 item left"));
    assert!(view.ends_with(PROMPT));
    assert_eq!(view, frame(&session.render().await));

    renderer.abort();
}
