//! `todomvc` binary: the task list in a terminal.
//!
//! Reads commands from stdin, prints the list after every change, and writes
//! snapshots to the configured sinks. Logs go to stderr.

use std::io::Write as _;
use todomvc::shell::{self, Reply, Session};
use todomvc::{persistence, AppAction, AppEnvironment, AppReducer, AppState, Config, TaskAction};
use todomvc_runtime::{Store, StoreConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(
        storage = ?config.storage_path,
        remote = ?config.remote_url,
        "Starting todomvc"
    );

    let sinks = config.sinks();
    let saved = persistence::load_first(&sinks).await;

    let store = Store::with_config(
        AppState::new(),
        AppReducer::new(),
        AppEnvironment::production(sinks),
        StoreConfig::default().with_shutdown_timeout(config.shutdown_timeout()),
    );

    if let Some(records) = saved {
        store.send(AppAction::Task(TaskAction::Hydrate { records })).await?;
    }
    store
        .send(AppAction::Navigate {
            path: config.initial_route.clone(),
        })
        .await?;

    let session = Session::new(store.clone());
    let renderer = tokio::spawn(shell::render_loop(
        store.clone(),
        session.subscribe_edit(),
        |frame| {
            print!("{frame}");
            let _ = std::io::stdout().flush();
        },
    ));

    println!("{}\n\n{}\n", session.render().await, shell::HELP);
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match session.handle_line(&line).await {
            Ok(Reply::Quit) => break,
            // The renderer prints the list and the prompt
            Ok(Reply::Sent(_)) => continue,
            Ok(Reply::Message(text)) => println!("{text}"),
            Ok(Reply::Nothing) => {},
            Err(error) => eprintln!("{error}"),
        }
        prompt();
    }

    renderer.abort();

    tracing::info!("Waiting for pending writes");
    if let Err(error) = store.shutdown_default().await {
        tracing::warn!(%error, "Exiting with writes still pending");
    }

    Ok(())
}

fn prompt() {
    print!("{}", shell::PROMPT);
    let _ = std::io::stdout().flush();
}
