//! Persistence collaborators for task snapshots.
//!
//! Every sink stores the same shape, `{"todos": [{id, title, completed}, ...]}`,
//! and restores it without reordering. Writes are fire-and-forget from the
//! store's point of view: failures are logged by the caller and dropped.
//!
//! Writes are issued in the order the store reduced the mutations (each
//! `save` call takes a ticket before it returns its future), and a sink never
//! lets an older snapshot overwrite a newer one.

use crate::types::TaskRecord;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Local storage key the snapshot is written under
pub const STORAGE_KEY: &str = "mobx-react-todomvc-todos";

/// Path appended to the remote base URL
pub const REMOTE_PATH: &str = "/api/todos";

/// Errors raised by persistence sinks
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Reading or writing the storage file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request could not be sent or its response read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success status
    #[error("Remote endpoint returned status {0}")]
    Status(u16),
}

/// Boxed future returned by [`Persistence`] methods
pub type PersistFuture<T> = Pin<Box<dyn Future<Output = Result<T, PersistenceError>> + Send>>;

/// Document written by every sink
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTodos {
    /// Tasks in list order
    pub todos: Vec<TaskRecord>,
}

/// A place task snapshots are written to
///
/// Methods take `Arc<Self>` so the returned future owns the sink and can be
/// spawned as a store effect.
pub trait Persistence: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Write a snapshot
    ///
    /// The write is ordered when this is called, not when the future is
    /// first polled.
    fn save(self: Arc<Self>, records: Vec<TaskRecord>) -> PersistFuture<()>;

    /// Read the last written snapshot, if the sink can and has one
    fn load(self: Arc<Self>) -> PersistFuture<Option<Vec<TaskRecord>>> {
        Box::pin(async { Ok(None) })
    }
}

/// Orders writes by ticket and drops stale ones
#[derive(Debug, Default)]
struct WriteOrder {
    issued: AtomicU64,
    last_written: tokio::sync::Mutex<u64>,
}

impl WriteOrder {
    fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn write<F, Fut>(&self, ticket: u64, write: F) -> Result<(), PersistenceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), PersistenceError>>,
    {
        let mut last_written = self.last_written.lock().await;
        if ticket < *last_written {
            tracing::debug!(ticket, last_written = *last_written, "Skipping stale snapshot");
            return Ok(());
        }

        write().await?;
        *last_written = ticket;
        Ok(())
    }
}

/// Browser-style local storage backed by a JSON file
///
/// The file holds a JSON object of key → value, like `localStorage`. The task
/// snapshot lives under [`STORAGE_KEY`]; other keys are preserved.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    order: WriteOrder,
}

impl LocalStorage {
    /// Storage backed by the file at `path` (created on first write)
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            order: WriteOrder::default(),
        }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<serde_json::Map<String, serde_json::Value>, PersistenceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(serde_json::Map::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(serde_json::Map::new()),
            Err(error) => Err(error.into()),
        }
    }

    async fn write_snapshot(&self, records: Vec<TaskRecord>) -> Result<(), PersistenceError> {
        let mut entries = self.read_entries().await?;
        entries.insert(
            STORAGE_KEY.to_string(),
            serde_json::to_value(StoredTodos { todos: records })?,
        );

        let contents = serde_json::to_string_pretty(&entries)?;
        let staging = self.path.with_extension("tmp");
        tokio::fs::write(&staging, contents).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

impl Persistence for LocalStorage {
    fn name(&self) -> &'static str {
        "local-storage"
    }

    fn save(self: Arc<Self>, records: Vec<TaskRecord>) -> PersistFuture<()> {
        let ticket = self.order.ticket();
        Box::pin(async move {
            self.order
                .write(ticket, || self.write_snapshot(records))
                .await
        })
    }

    fn load(self: Arc<Self>) -> PersistFuture<Option<Vec<TaskRecord>>> {
        Box::pin(async move {
            let mut entries = self.read_entries().await?;
            let Some(value) = entries.remove(STORAGE_KEY) else {
                return Ok(None);
            };
            let stored: StoredTodos = serde_json::from_value(value)?;
            Ok(Some(stored.todos))
        })
    }
}

/// Remote endpoint receiving `POST /api/todos` with the snapshot as JSON
#[derive(Debug)]
pub struct RemoteEndpoint {
    client: reqwest::Client,
    url: String,
    order: WriteOrder,
}

impl RemoteEndpoint {
    /// Endpoint under `base_url`, e.g. `http://localhost:3000`
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Endpoint using a preconfigured client
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}{REMOTE_PATH}", base_url.trim_end_matches('/')),
            order: WriteOrder::default(),
        }
    }

    /// Full URL snapshots are posted to
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post_snapshot(&self, records: Vec<TaskRecord>) -> Result<(), PersistenceError> {
        let response = self
            .client
            .post(&self.url)
            .json(&StoredTodos { todos: records })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PersistenceError::Status(status.as_u16()));
        }
        Ok(())
    }
}

impl Persistence for RemoteEndpoint {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn save(self: Arc<Self>, records: Vec<TaskRecord>) -> PersistFuture<()> {
        let ticket = self.order.ticket();
        Box::pin(async move {
            self.order
                .write(ticket, || self.post_snapshot(records))
                .await
        })
    }
}

/// In-process sink keeping the latest snapshot written
///
/// Used when no storage file is configured, and in tests.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    latest: Mutex<Option<Vec<TaskRecord>>>,
    writes: AtomicU64,
    order: WriteOrder,
}

impl InMemoryStorage {
    /// Empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `records`, as if written earlier
    #[must_use]
    pub fn with_snapshot(records: Vec<TaskRecord>) -> Self {
        Self {
            latest: Mutex::new(Some(records)),
            ..Self::default()
        }
    }

    /// Number of snapshots written since construction
    ///
    /// Stale writes that were skipped are not counted.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Acquire)
    }

    /// The most recent snapshot
    #[must_use]
    pub fn latest(&self) -> Option<Vec<TaskRecord>> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[allow(clippy::unused_async)] // matches the other sinks' write signature
    async fn replace(&self, records: Vec<TaskRecord>) -> Result<(), PersistenceError> {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(records);
        self.writes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

impl Persistence for InMemoryStorage {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    fn save(self: Arc<Self>, records: Vec<TaskRecord>) -> PersistFuture<()> {
        let ticket = self.order.ticket();
        Box::pin(async move {
            self.order
                .write(ticket, || self.replace(records))
                .await
        })
    }

    fn load(self: Arc<Self>) -> PersistFuture<Option<Vec<TaskRecord>>> {
        Box::pin(async move { Ok(self.latest()) })
    }
}

/// Loads the first snapshot any sink has, in order
///
/// A sink that fails to load is logged and skipped.
pub async fn load_first(sinks: &[Arc<dyn Persistence>]) -> Option<Vec<TaskRecord>> {
    for sink in sinks {
        match Arc::clone(sink).load().await {
            Ok(Some(records)) => {
                tracing::info!(sink = sink.name(), count = records.len(), "Loaded saved tasks");
                return Some(records);
            },
            Ok(None) => {},
            Err(error) => {
                tracing::warn!(sink = sink.name(), %error, "Failed to load saved tasks");
            },
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(id: &str, title: &str, completed: bool) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            title: title.to_string(),
            completed,
        }
    }

    #[tokio::test]
    async fn local_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path().join("todos.json")));

        let records = vec![record("1", "a", true), record("2", "b", false)];
        Arc::clone(&storage).save(records.clone()).await.unwrap();

        let loaded = Arc::clone(&storage).load().await.unwrap();
        assert_eq!(loaded, Some(records));
    }

    #[tokio::test]
    async fn local_storage_missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path().join("absent.json")));

        assert_eq!(storage.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn local_storage_document_shape_and_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let storage = Arc::new(LocalStorage::new(&path));
        storage.save(vec![record("1", "a", false)]).await.unwrap();

        let document: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document["theme"], "dark");
        assert_eq!(
            document[STORAGE_KEY],
            serde_json::json!({"todos": [{"id": "1", "title": "a", "completed": false}]})
        );
    }

    #[tokio::test]
    async fn local_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        let result = Arc::new(LocalStorage::new(&path)).load().await;
        assert!(matches!(result, Err(PersistenceError::Serialization(_))));
    }

    #[tokio::test]
    async fn stale_write_does_not_overwrite_newer_one() {
        let storage = Arc::new(InMemoryStorage::new());

        // Tickets are taken at call time; the newer write finishes first
        let older = Arc::clone(&storage).save(vec![record("1", "old", false)]);
        let newer = Arc::clone(&storage).save(vec![record("1", "new", false)]);
        newer.await.unwrap();
        older.await.unwrap();

        assert_eq!(storage.writes(), 1);
        assert_eq!(storage.latest(), Some(vec![record("1", "new", false)]));
    }

    #[tokio::test]
    async fn in_memory_keeps_only_the_latest_snapshot() {
        let storage = Arc::new(InMemoryStorage::new());

        let mut records = Vec::new();
        for n in 0..300 {
            records.push(record(&n.to_string(), "task", false));
            Arc::clone(&storage).save(records.clone()).await.unwrap();
        }

        assert_eq!(storage.writes(), 300);
        assert_eq!(storage.latest(), Some(records));
    }

    #[tokio::test]
    async fn in_memory_with_snapshot_loads_it() {
        let storage = Arc::new(InMemoryStorage::with_snapshot(vec![record("x", "saved", true)]));
        assert_eq!(
            storage.load().await.unwrap(),
            Some(vec![record("x", "saved", true)])
        );
    }

    #[test]
    fn remote_url_joins_base() {
        assert_eq!(
            RemoteEndpoint::new("http://localhost:3000/").url(),
            "http://localhost:3000/api/todos"
        );
        assert_eq!(
            RemoteEndpoint::new("http://example.test").url(),
            "http://example.test/api/todos"
        );
    }

    #[tokio::test]
    async fn remote_failure_is_reported() {
        // Nothing listens on the discard port
        let remote = Arc::new(RemoteEndpoint::new("http://127.0.0.1:9"));
        let result = remote.save(vec![record("1", "a", false)]).await;
        assert!(matches!(result, Err(PersistenceError::Http(_))));
    }

    #[tokio::test]
    async fn remote_posts_snapshot_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/todos"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "todos": [
                    {"id": "1", "title": "Buy milk", "completed": false},
                    {"id": "2", "title": "Walk dog", "completed": true}
                ]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let remote = Arc::new(RemoteEndpoint::new(&server.uri()));
        remote
            .save(vec![record("1", "Buy milk", false), record("2", "Walk dog", true)])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn remote_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/todos"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let remote = Arc::new(RemoteEndpoint::new(&server.uri()));
        let result = remote.save(vec![record("1", "a", false)]).await;
        assert!(matches!(result, Err(PersistenceError::Status(503))));
    }

    #[tokio::test]
    async fn load_first_skips_empty_sinks() {
        let sinks: Vec<Arc<dyn Persistence>> = vec![
            Arc::new(InMemoryStorage::new()),
            Arc::new(InMemoryStorage::with_snapshot(vec![record("1", "a", false)])),
        ];

        assert_eq!(load_first(&sinks).await, Some(vec![record("1", "a", false)]));
        assert_eq!(load_first(&[]).await, None);
    }
}
