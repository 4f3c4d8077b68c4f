//! Types describing release candidates.

use serde::{Deserialize, Serialize};

/// Which kind of content a batch of releases carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// BitTorrent releases, identified by info hash.
    Torrent,
    /// Usenet NZBs, identified by a content hash of the NZB.
    Usenet,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Torrent => "torrent",
            MediaKind::Usenet => "usenet",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file inside a release, as listed by the release itself or by a backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseFile {
    /// Path within the release.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

impl ReleaseFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }
}

/// A torrent or NZB candidate for a media request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Content hash, unique within a batch.
    pub hash: String,
    /// Release title as reported by the indexer.
    pub title: String,
    /// Total size in bytes.
    pub size_bytes: u64,
    /// File list, when the source already enumerated it (e.g. swarm metadata).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<ReleaseFile>>,
    /// Title is already known to match the request; skips title validation.
    #[serde(default)]
    pub confirmed: bool,
}

impl Release {
    /// Create a release without a file list.
    pub fn new(hash: impl Into<String>, title: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            hash: hash.into(),
            title: title.into(),
            size_bytes,
            files: None,
            confirmed: false,
        }
    }

    /// Attach a pre-enumerated file list.
    pub fn with_files(mut self, files: Vec<ReleaseFile>) -> Self {
        self.files = Some(files);
        self
    }

    /// Mark the release as confirmed.
    pub fn confirmed(mut self) -> Self {
        self.confirmed = true;
        self
    }

    /// Hash normalised for comparison with backend answers.
    pub fn normalized_hash(&self) -> String {
        self.hash.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_builder() {
        let release = Release::new("ABC123", "Show.S01E02.1080p", 1000)
            .with_files(vec![ReleaseFile::new("show.s01e02.mkv", 900)])
            .confirmed();

        assert_eq!(release.hash, "ABC123");
        assert_eq!(release.normalized_hash(), "abc123");
        assert!(release.confirmed);
        assert_eq!(release.files.as_ref().map(|f| f.len()), Some(1));
    }

    #[test]
    fn test_release_deserialize_defaults() {
        let json = r#"{"hash":"h1","title":"Movie 2020","size_bytes":42}"#;
        let release: Release = serde_json::from_str(json).unwrap();

        assert!(!release.confirmed);
        assert!(release.files.is_none());
    }

    #[test]
    fn test_media_kind_display() {
        assert_eq!(MediaKind::Torrent.to_string(), "torrent");
        assert_eq!(MediaKind::Usenet.to_string(), "usenet");
    }
}
