//! Release candidates fed into the resolution pipeline.
//!
//! A release is a torrent or NZB found by an indexer. It is immutable input:
//! the resolver never mutates a release, it only clones it into a
//! [`ResolvedRelease`](crate::resolver::ResolvedRelease) once a file is picked.

mod types;

pub use types::*;
