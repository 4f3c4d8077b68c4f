//! Batch orchestrator: fan-out over backends with per-backend isolation.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::backend::{ClientContext, DebridBackend};
use crate::config::{Config, ResolverConfig};
use crate::matching::{
    FileSelector, HeuristicFileSelector, MetadataValidator, RequestedMetadata, StandardValidator,
    VideoFilter,
};
use crate::metrics;
use crate::parser::TitleParser;
use crate::release::{MediaKind, Release};

use super::types::{BackendFailure, BatchOutcome, ResolveError, ResolvedRelease};

/// Resolves batches of releases against every configured backend.
pub struct BatchResolver {
    pub(super) backends: Vec<Arc<dyn DebridBackend>>,
    pub(super) parser: Arc<dyn TitleParser>,
    pub(super) validator: Arc<dyn MetadataValidator>,
    pub(super) selector: Arc<dyn FileSelector>,
    pub(super) video: VideoFilter,
    pub(super) config: ResolverConfig,
}

impl BatchResolver {
    /// Create a resolver with the standard validator and heuristic selector.
    pub fn new(
        backends: Vec<Arc<dyn DebridBackend>>,
        parser: Arc<dyn TitleParser>,
        config: &Config,
    ) -> Self {
        let video = VideoFilter::new(&config.matching);
        Self {
            backends,
            parser,
            validator: Arc::new(StandardValidator::new()),
            selector: Arc::new(HeuristicFileSelector::new(video.clone())),
            video,
            config: config.resolver.clone(),
        }
    }

    /// Replace the metadata validator.
    pub fn with_validator(mut self, validator: Arc<dyn MetadataValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the file selector.
    pub fn with_selector(mut self, selector: Arc<dyn FileSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn backends(&self) -> &[Arc<dyn DebridBackend>] {
        &self.backends
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a torrent batch. See [`resolve_batch`](Self::resolve_batch).
    pub async fn resolve_torrents(
        &self,
        releases: &[Release],
        request_id: &str,
        metadata: Option<&RequestedMetadata>,
        client: Option<&ClientContext>,
    ) -> BatchOutcome {
        self.resolve_batch(MediaKind::Torrent, releases, request_id, metadata, client)
            .await
    }

    /// Resolve an NZB batch. See [`resolve_batch`](Self::resolve_batch).
    pub async fn resolve_usenet(
        &self,
        releases: &[Release],
        request_id: &str,
        metadata: Option<&RequestedMetadata>,
        client: Option<&ClientContext>,
    ) -> BatchOutcome {
        self.resolve_batch(MediaKind::Usenet, releases, request_id, metadata, client)
            .await
    }

    /// Resolve a batch against all backends concurrently.
    ///
    /// Every backend receives the full, unfiltered batch. Results are
    /// appended as backends finish; a backend that errors, times out or
    /// panics is reported in `errors` and does not affect the others.
    /// An empty batch returns immediately without contacting any backend.
    pub async fn resolve_batch(
        &self,
        kind: MediaKind,
        releases: &[Release],
        request_id: &str,
        metadata: Option<&RequestedMetadata>,
        client: Option<&ClientContext>,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        if releases.is_empty() {
            debug!(request_id = request_id, kind = %kind, "Empty batch, nothing to resolve");
            return outcome;
        }

        let start = Instant::now();
        debug!(
            request_id = request_id,
            kind = %kind,
            releases = releases.len(),
            backends = self.backends.len(),
            "Starting batch resolution"
        );

        let mut tasks: FuturesUnordered<_> = self
            .backends
            .iter()
            .map(|backend| async move {
                let started = Instant::now();
                let result = self
                    .resolve_isolated(backend.as_ref(), kind, releases, request_id, metadata, client)
                    .await;
                (backend.id().to_string(), result, started.elapsed())
            })
            .collect();

        while let Some((backend_id, result, elapsed)) = tasks.next().await {
            metrics::BACKEND_RESOLUTION_DURATION
                .with_label_values(&[backend_id.as_str()])
                .observe(elapsed.as_secs_f64());

            match result {
                Ok(mut resolved) => {
                    metrics::BACKEND_RESOLUTIONS
                        .with_label_values(&[backend_id.as_str(), "ok"])
                        .inc();
                    debug!(
                        request_id = request_id,
                        backend = %backend_id,
                        resolved = resolved.len(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Backend resolution complete"
                    );
                    outcome.results.append(&mut resolved);
                }
                Err(error) => {
                    let label = match error {
                        ResolveError::Timeout { .. } => "timeout",
                        _ => "error",
                    };
                    metrics::BACKEND_RESOLUTIONS
                        .with_label_values(&[backend_id.as_str(), label])
                        .inc();
                    warn!(
                        request_id = request_id,
                        backend = %backend_id,
                        error = %error,
                        "Backend resolution failed"
                    );
                    outcome.errors.push(BackendFailure { backend_id, error });
                }
            }
        }

        info!(
            request_id = request_id,
            kind = %kind,
            releases = releases.len(),
            resolved = outcome.results.len(),
            failed_backends = outcome.errors.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch resolution complete"
        );

        outcome
    }

    /// Run one backend's pipeline under the configured timeout, turning a
    /// panic into an error.
    async fn resolve_isolated(
        &self,
        backend: &dyn DebridBackend,
        kind: MediaKind,
        releases: &[Release],
        request_id: &str,
        metadata: Option<&RequestedMetadata>,
        client: Option<&ClientContext>,
    ) -> Result<Vec<ResolvedRelease>, ResolveError> {
        let pipeline = AssertUnwindSafe(
            self.resolve_for_backend(backend, kind, releases, request_id, metadata, client),
        )
        .catch_unwind();

        let settled = match self.config.backend_timeout() {
            Some(limit) => tokio::time::timeout(limit, pipeline)
                .await
                .map_err(|_| ResolveError::Timeout {
                    backend: backend.id().to_string(),
                    secs: limit.as_secs(),
                })?,
            None => pipeline.await,
        };

        settled.unwrap_or_else(|payload| Err(ResolveError::Panicked(panic_message(payload))))
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
