//! Result and error types of the resolver.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::BackendError;
use crate::matching::SelectedFile;
use crate::parser::ParseError;
use crate::release::Release;

/// Which backend produced a result and in what state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceTag {
    /// Backend identifier.
    pub id: String,
    /// Backend reported the content as cached.
    pub cached: bool,
    /// Content belongs to the user's library. Always false when resolving.
    pub owned: bool,
}

/// A release with the file chosen to play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedRelease {
    #[serde(flatten)]
    pub release: Release,
    pub file: SelectedFile,
    /// Set when resolved through a backend; `None` for local resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceTag>,
}

/// Errors that abort one backend's resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Backend {backend} does not support usenet")]
    UsenetUnsupported { backend: String },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Parser error: {0}")]
    Parser(#[from] ParseError),

    #[error("Backend {backend} timed out after {secs}s")]
    Timeout { backend: String, secs: u64 },

    #[error("Resolution panicked: {0}")]
    Panicked(String),
}

/// A backend that failed as a whole.
#[derive(Debug)]
pub struct BackendFailure {
    pub backend_id: String,
    pub error: ResolveError,
}

/// Everything a batch resolution produced.
///
/// `results` are in backend completion order; within one backend they follow
/// input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<ResolvedRelease>,
    pub errors: Vec<BackendFailure>,
}

impl BatchOutcome {
    /// Every backend failed and nothing resolved.
    pub fn is_total_failure(&self) -> bool {
        self.results.is_empty() && !self.errors.is_empty()
    }

    /// Results contributed by one backend.
    pub fn resolved_for<'a>(
        &'a self,
        backend_id: &'a str,
    ) -> impl Iterator<Item = &'a ResolvedRelease> + 'a {
        self.results.iter().filter(move |r| {
            r.service
                .as_ref()
                .is_some_and(|s| s.id == backend_id)
        })
    }

    /// Identifiers of the backends that failed.
    pub fn failed_backends(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.backend_id.as_str()).collect()
    }
}
