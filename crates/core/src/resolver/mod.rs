//! Batch resolution of releases into playable files.
//!
//! [`BatchResolver::resolve_batch`] fans a batch out over every configured
//! backend at once. Each backend runs the same straight-line pipeline:
//!
//! 1. availability lookup (one batched call, reconciled by hash)
//! 2. title parsing, each distinct title once
//! 3. metadata filtering (title, season, episode)
//! 4. file-name parsing for surviving releases only
//! 5. file selection, or an opaque fallback when the backend cannot list files
//!
//! A failing backend becomes an entry in [`BatchOutcome::errors`]; it never
//! affects what other backends contribute.

mod orchestrator;
mod pipeline;
mod types;

pub use orchestrator::BatchResolver;
pub use types::*;

/// Generate a fresh request id for correlating backend calls in logs.
pub fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
