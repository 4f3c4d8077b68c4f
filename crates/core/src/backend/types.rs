//! Types for the backend availability system.

use std::net::IpAddr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::release::ReleaseFile;

/// Availability of one hash as reported by a backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// Content is cached and can be streamed right away.
    Cached,
    /// Content is already in the user's downloads.
    Downloaded,
    /// Backend is currently fetching the content.
    Downloading,
    /// Backend knows the hash but has not cached it.
    Uncached,
    /// Backend returned a status it could not classify.
    Unknown,
}

impl AvailabilityStatus {
    pub fn is_cached(&self) -> bool {
        matches!(self, AvailabilityStatus::Cached)
    }
}

/// A backend's answer for a single hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    /// Hash this record answers for.
    pub hash: String,
    pub status: AvailabilityStatus,
    /// File listing, when the backend can enumerate the release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<ReleaseFile>>,
}

impl AvailabilityRecord {
    pub fn new(hash: impl Into<String>, status: AvailabilityStatus) -> Self {
        Self {
            hash: hash.into(),
            status,
            files: None,
        }
    }

    pub fn with_files(mut self, files: Vec<ReleaseFile>) -> Self {
        self.files = Some(files);
        self
    }

    /// File listing, or an empty slice when none was reported.
    pub fn file_list(&self) -> &[ReleaseFile] {
        self.files.as_deref().unwrap_or(&[])
    }
}

/// Information about the end user forwarded to backends.
///
/// Some services scope availability to the caller's address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

/// Errors a backend client can return.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Backend authentication failed: {0}")]
    Auth(String),

    #[error("Backend API error: {0}")]
    Api(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Operation not supported: {0}")]
    Unsupported(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for debrid / caching backends.
#[async_trait]
pub trait DebridBackend: Send + Sync {
    /// Backend identifier for logging and result tagging.
    fn id(&self) -> &str;

    /// Look up availability for a batch of torrent hashes.
    ///
    /// The returned records may be fewer than the hashes and in any order.
    async fn check_availability(
        &self,
        hashes: &[String],
        request_id: &str,
        client: Option<&ClientContext>,
    ) -> Result<Vec<AvailabilityRecord>, BackendError>;

    /// Whether this backend can look up Usenet content.
    fn supports_usenet(&self) -> bool {
        false
    }

    /// Look up availability for a batch of NZB hashes.
    async fn check_usenet_availability(
        &self,
        _hashes: &[String],
        _request_id: &str,
        _client: Option<&ClientContext>,
    ) -> Result<Vec<AvailabilityRecord>, BackendError> {
        Err(BackendError::Unsupported(format!(
            "{} does not support usenet",
            self.id()
        )))
    }
}
