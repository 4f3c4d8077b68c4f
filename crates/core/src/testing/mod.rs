//! Testing utilities and mock implementations.
//!
//! Mocks for the external collaborators of the resolver, so the whole
//! pipeline can be exercised without real debrid services.
//!
//! # Example
//!
//! ```rust,ignore
//! use debridino_core::testing::{fixtures, MockBackend, MockTitleParser};
//!
//! let backend = MockBackend::new("realdebrid");
//! backend
//!     .add_record(fixtures::cached_record("h1", &["show.s01e02.mkv"]))
//!     .await;
//! let parser = MockTitleParser::new();
//!
//! // Build a BatchResolver with them...
//! ```

mod mock_backend;
mod mock_parser;

pub use mock_backend::{MockBackend, RecordedLookup};
pub use mock_parser::MockTitleParser;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::backend::{AvailabilityRecord, AvailabilityStatus};
    use crate::matching::RequestedMetadata;
    use crate::release::{Release, ReleaseFile};

    /// Size given to fixture files and releases.
    pub const FIXTURE_SIZE: u64 = 1024 * 1024 * 700; // 700 MB

    /// Create a release with reasonable defaults.
    pub fn release(hash: &str, title: &str) -> Release {
        Release::new(hash, title, FIXTURE_SIZE * 2)
    }

    /// Create a release that lists its own files.
    pub fn release_with_files(hash: &str, title: &str, files: &[&str]) -> Release {
        release(hash, title).with_files(files_named(files))
    }

    /// Files with the given names and [`FIXTURE_SIZE`].
    pub fn files_named(names: &[&str]) -> Vec<ReleaseFile> {
        names
            .iter()
            .map(|name| ReleaseFile::new(*name, FIXTURE_SIZE))
            .collect()
    }

    /// A cached availability record listing the given files.
    pub fn cached_record(hash: &str, files: &[&str]) -> AvailabilityRecord {
        AvailabilityRecord::new(hash, AvailabilityStatus::Cached).with_files(files_named(files))
    }

    /// An availability record with a status but no file listing.
    pub fn bare_record(hash: &str, status: AvailabilityStatus) -> AvailabilityRecord {
        AvailabilityRecord::new(hash, status)
    }

    /// Metadata for a TV episode.
    pub fn episode_metadata(title: &str, season: u32, episode: u32) -> RequestedMetadata {
        RequestedMetadata::new([title])
            .with_season(season)
            .with_episode(episode)
    }

    /// Metadata for a movie.
    pub fn movie_metadata(title: &str) -> RequestedMetadata {
        RequestedMetadata::new([title])
    }
}
