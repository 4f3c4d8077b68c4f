//! Debrid / caching backend abstraction.
//!
//! A backend answers, for a batch of content hashes, whether each one is
//! already cached and (when it knows) which files the release contains.
//! The HTTP protocols of concrete services live outside this crate; they
//! plug in through the [`DebridBackend`] trait.

mod reconcile;
mod types;

pub use reconcile::index_by_hash;
pub use types::*;
