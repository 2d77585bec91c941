//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use catalog_backend::db::Database;
use catalog_backend::error::CatalogError;
use catalog_backend::ingest::IngestionWorker;
use catalog_backend::job_controller::progress::{
    ProgressTracker, ProgressUpdate, SqliteProgressTracker,
};
use catalog_backend::notifications::{NotificationEvent, Notifier};
use catalog_backend::store::{ProductStore, SqliteProductStore};
use catalog_common::jobs::UploadProgress;
use catalog_common::model::product::{Product, ProductInput};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Ordered log of observable side effects, shared between doubles.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Records every `processed_rows` write, then delegates to SQLite.
pub struct RecordingTracker {
    inner: SqliteProgressTracker,
    log: EventLog,
}

impl RecordingTracker {
    pub fn new(inner: SqliteProgressTracker, log: EventLog) -> Self {
        Self { inner, log }
    }
}

impl ProgressTracker for RecordingTracker {
    fn create(&self, job_id: &str) -> Result<UploadProgress, CatalogError> {
        self.inner.create(job_id)
    }

    fn get(&self, job_id: &str) -> Result<Option<UploadProgress>, CatalogError> {
        self.inner.get(job_id)
    }

    fn update(&self, job_id: &str, update: ProgressUpdate) -> Result<UploadProgress, CatalogError> {
        if let Some(rows) = update.processed_rows {
            self.log.push(format!("progress:{rows}"));
        }
        self.inner.update(job_id, update)
    }
}

/// Collects notifications instead of delivering them.
pub struct RecordingNotifier {
    log: EventLog,
    pub events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn batches(&self) -> Vec<u64> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.payload["batch"].as_u64().unwrap())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: NotificationEvent) {
        self.log.push(format!("notify:{}", event.payload["batch"]));
        self.events.lock().unwrap().push(event);
    }
}

/// Delegates to SQLite but fails the `fail_on`-th batch (zero-based).
pub struct FailingStore {
    inner: SqliteProductStore,
    fail_on: usize,
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: SqliteProductStore, fail_on: usize) -> Self {
        Self {
            inner,
            fail_on,
            calls: AtomicUsize::new(0),
        }
    }
}

impl ProductStore for FailingStore {
    fn find_by_key_ci(&self, sku: &str) -> Result<Option<Product>, CatalogError> {
        self.inner.find_by_key_ci(sku)
    }

    fn upsert(&self, input: &ProductInput) -> Result<Product, CatalogError> {
        self.inner.upsert(input)
    }

    fn upsert_batch(&self, inputs: &[ProductInput]) -> Result<usize, CatalogError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == self.fail_on {
            return Err(CatalogError::Database(rusqlite::Error::InvalidQuery));
        }
        self.inner.upsert_batch(inputs)
    }

    fn delete(&self, id: i64) -> Result<(), CatalogError> {
        self.inner.delete(id)
    }

    fn delete_all(&self) -> Result<usize, CatalogError> {
        self.inner.delete_all()
    }
}

/// Panics on the first batch, as a worker bug would.
pub struct PanickingStore;

impl ProductStore for PanickingStore {
    fn find_by_key_ci(&self, _sku: &str) -> Result<Option<Product>, CatalogError> {
        Ok(None)
    }

    fn upsert(&self, _input: &ProductInput) -> Result<Product, CatalogError> {
        panic!("store exploded")
    }

    fn upsert_batch(&self, _inputs: &[ProductInput]) -> Result<usize, CatalogError> {
        panic!("store exploded")
    }

    fn delete(&self, _id: i64) -> Result<(), CatalogError> {
        Ok(())
    }

    fn delete_all(&self) -> Result<usize, CatalogError> {
        Ok(0)
    }
}

/// A worker over a fresh in-memory database, plus handles to inspect it.
pub struct Harness {
    pub db: Database,
    pub products: SqliteProductStore,
    pub progress: SqliteProgressTracker,
    pub notifier: Arc<RecordingNotifier>,
    pub log: EventLog,
    pub worker: IngestionWorker,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(|products| Arc::new(products) as Arc<dyn ProductStore>)
    }

    /// Like [`Harness::new`] but with the store wrapped by `wrap`.
    pub fn build<F>(wrap: F) -> Self
    where
        F: FnOnce(SqliteProductStore) -> Arc<dyn ProductStore>,
    {
        let db = Database::open_in_memory().unwrap();
        let products = SqliteProductStore::new(db.clone());
        let progress = SqliteProgressTracker::new(db.clone());
        let log = EventLog::default();
        let notifier = Arc::new(RecordingNotifier::new(log.clone()));
        let worker = IngestionWorker::new(
            wrap(products.clone()),
            Arc::new(RecordingTracker::new(progress.clone(), log.clone())),
            notifier.clone(),
        );
        Self {
            db,
            products,
            progress,
            notifier,
            log,
            worker,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.worker = self.worker.with_batch_size(batch_size);
        self
    }

    /// Registers a pending job under `job_id`.
    pub fn job<'a>(&self, job_id: &'a str) -> &'a str {
        self.progress.create(job_id).unwrap();
        job_id
    }
}

/// A CSV body with `rows` products `SKU-0..`, names `Product n`, price `n.50`.
pub fn catalog_csv(rows: usize) -> String {
    let mut csv = String::from("sku,name,description,price\n");
    for i in 0..rows {
        csv.push_str(&format!("SKU-{i},Product {i},Item number {i},{i}.50\n"));
    }
    csv
}
