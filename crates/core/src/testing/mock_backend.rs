//! Mock debrid backend for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::backend::{AvailabilityRecord, BackendError, ClientContext, DebridBackend};
use crate::release::MediaKind;

/// A recorded availability lookup for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedLookup {
    pub kind: MediaKind,
    pub hashes: Vec<String>,
    pub request_id: String,
    pub client: Option<ClientContext>,
}

/// Mock implementation of the DebridBackend trait.
///
/// Provides controllable behavior for testing:
/// - Answer lookups from configured records (only hashes that were asked for)
/// - Track lookups for assertions
/// - Simulate failures, slow responses and panics
/// - Toggle usenet support
///
/// # Example
///
/// ```rust,ignore
/// let backend = MockBackend::new("torbox").with_usenet();
/// backend.add_record(fixtures::cached_record("h1", &["a.mkv"])).await;
/// backend.set_next_error(BackendError::Auth("auth failed".into())).await;
///
/// // ...resolve...
///
/// assert_eq!(backend.lookup_count().await, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockBackend {
    id: String,
    supports_usenet: bool,
    /// Configured availability answers.
    records: Arc<RwLock<Vec<AvailabilityRecord>>>,
    /// Recorded lookups.
    lookups: Arc<RwLock<Vec<RecordedLookup>>>,
    /// If set, the next lookup will fail with this error.
    next_error: Arc<RwLock<Option<BackendError>>>,
    /// If set, the next lookup will panic with this message.
    next_panic: Arc<RwLock<Option<String>>>,
    /// Artificial latency for every lookup.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockBackend {
    /// Create a torrent-only mock backend with no records.
    pub fn new(id: &str) -> Self {
        Self::with_records(id, Vec::new())
    }

    /// Create a mock backend with predefined records.
    pub fn with_records(id: &str, records: Vec<AvailabilityRecord>) -> Self {
        Self {
            id: id.to_string(),
            supports_usenet: false,
            records: Arc::new(RwLock::new(records)),
            lookups: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            next_panic: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Enable usenet lookups.
    pub fn with_usenet(mut self) -> Self {
        self.supports_usenet = true;
        self
    }

    /// Set the records to answer with.
    pub async fn set_records(&self, records: Vec<AvailabilityRecord>) {
        *self.records.write().await = records;
    }

    /// Add a single record.
    pub async fn add_record(&self, record: AvailabilityRecord) {
        self.records.write().await.push(record);
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: BackendError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure the next lookup to panic.
    pub async fn set_next_panic(&self, message: &str) {
        *self.next_panic.write().await = Some(message.to_string());
    }

    /// Delay every lookup by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded lookups.
    pub async fn lookups(&self) -> Vec<RecordedLookup> {
        self.lookups.read().await.clone()
    }

    /// Get the number of lookups performed.
    pub async fn lookup_count(&self) -> usize {
        self.lookups.read().await.len()
    }

    async fn lookup(
        &self,
        kind: MediaKind,
        hashes: &[String],
        request_id: &str,
        client: Option<&ClientContext>,
    ) -> Result<Vec<AvailabilityRecord>, BackendError> {
        self.lookups.write().await.push(RecordedLookup {
            kind,
            hashes: hashes.to_vec(),
            request_id: request_id.to_string(),
            client: client.cloned(),
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let panic_message = self.next_panic.write().await.take();
        if let Some(message) = panic_message {
            panic!("{}", message);
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| hashes.iter().any(|h| h.eq_ignore_ascii_case(&r.hash)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DebridBackend for MockBackend {
    fn id(&self) -> &str {
        &self.id
    }

    async fn check_availability(
        &self,
        hashes: &[String],
        request_id: &str,
        client: Option<&ClientContext>,
    ) -> Result<Vec<AvailabilityRecord>, BackendError> {
        self.lookup(MediaKind::Torrent, hashes, request_id, client)
            .await
    }

    fn supports_usenet(&self) -> bool {
        self.supports_usenet
    }

    async fn check_usenet_availability(
        &self,
        hashes: &[String],
        request_id: &str,
        client: Option<&ClientContext>,
    ) -> Result<Vec<AvailabilityRecord>, BackendError> {
        if !self.supports_usenet {
            return Err(BackendError::Unsupported(format!(
                "{} does not support usenet",
                self.id
            )));
        }
        self.lookup(MediaKind::Usenet, hashes, request_id, client)
            .await
    }
}
