//! Types shared by validators and file selectors.

use serde::{Deserialize, Serialize};

/// Index marking a selected file as the whole, opaque release.
pub const OPAQUE_PAYLOAD_INDEX: i64 = -1;

/// What the caller is resolving for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestedMetadata {
    /// Acceptable titles (original, localized, aliases).
    pub titles: Vec<String>,
    /// Requested season; `None` for movies or unconstrained lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    /// Absolute episode number for anime-style numbering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_episode: Option<u32>,
}

impl RequestedMetadata {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_season(mut self, season: u32) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_episode(mut self, episode: u32) -> Self {
        self.episode = Some(episode);
        self
    }

    pub fn with_absolute_episode(mut self, absolute: u32) -> Self {
        self.absolute_episode = Some(absolute);
        self
    }

    /// Whether a specific episode is requested (as opposed to a movie).
    pub fn wants_episode(&self) -> bool {
        self.episode.is_some() || self.absolute_episode.is_some()
    }
}

/// The file picked out of a release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    /// Position in the backend's file list, or [`OPAQUE_PAYLOAD_INDEX`].
    pub index: i64,
}

impl SelectedFile {
    /// Treat a whole release as a single payload of unknown layout.
    pub fn opaque(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            index: OPAQUE_PAYLOAD_INDEX,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.index == OPAQUE_PAYLOAD_INDEX
    }
}

/// Options passed to a [`FileSelector`](super::FileSelector).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOptions {
    /// Allow fuzzy (edit distance) title comparison between files.
    pub use_levenshtein_matching: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            use_levenshtein_matching: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_builder() {
        let meta = RequestedMetadata::new(["Show", "Show (US)"])
            .with_season(1)
            .with_episode(2);

        assert_eq!(meta.titles.len(), 2);
        assert_eq!(meta.season, Some(1));
        assert!(meta.wants_episode());
        assert!(!RequestedMetadata::new(["Movie"]).wants_episode());
    }

    #[test]
    fn test_absolute_episode_counts_as_episode_request() {
        let meta = RequestedMetadata::new(["One Piece"]).with_absolute_episode(1071);
        assert!(meta.wants_episode());
    }

    #[test]
    fn test_opaque_selected_file() {
        let file = SelectedFile::opaque("Movie.2020.1080p", 4_000);
        assert!(file.is_opaque());
        assert_eq!(file.index, -1);
        assert_eq!(file.size_bytes, 4_000);
    }
}
