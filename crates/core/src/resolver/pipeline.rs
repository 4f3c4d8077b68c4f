//! Per-backend and local resolution pipelines.

use std::collections::HashSet;

use tracing::debug;

use crate::backend::{
    index_by_hash, AvailabilityRecord, AvailabilityStatus, ClientContext, DebridBackend,
};
use crate::matching::{RequestedMetadata, SelectedFile};
use crate::metrics;
use crate::parser::{parse_deduplicated, ParseLookup, ParsedTitle};
use crate::release::{MediaKind, Release, ReleaseFile};

use super::orchestrator::BatchResolver;
use super::types::{ResolveError, ResolvedRelease, ServiceTag};

/// Label used for releases resolved from their own file list.
const LOCAL_LABEL: &str = "local";

/// Why a release was rejected by the filter chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Title,
    Season,
    Episode,
}

impl Rejection {
    fn as_str(&self) -> &'static str {
        match self {
            Rejection::Title => "title",
            Rejection::Season => "season",
            Rejection::Episode => "episode",
        }
    }
}

impl BatchResolver {
    /// Resolve a batch against a single backend.
    ///
    /// Fails when the backend cannot serve `kind`, when its availability
    /// lookup fails, or when the parser breaks. Releases that are rejected or
    /// for which no file can be selected are dropped silently.
    pub async fn resolve_for_backend(
        &self,
        backend: &dyn DebridBackend,
        kind: MediaKind,
        releases: &[Release],
        request_id: &str,
        metadata: Option<&RequestedMetadata>,
        client: Option<&ClientContext>,
    ) -> Result<Vec<ResolvedRelease>, ResolveError> {
        if kind == MediaKind::Usenet && !backend.supports_usenet() {
            return Err(ResolveError::UsenetUnsupported {
                backend: backend.id().to_string(),
            });
        }

        let hashes = unique_hashes(releases);
        let records = match kind {
            MediaKind::Torrent => {
                backend
                    .check_availability(&hashes, request_id, client)
                    .await?
            }
            MediaKind::Usenet => {
                backend
                    .check_usenet_availability(&hashes, request_id, client)
                    .await?
            }
        };
        let availability = index_by_hash(records);
        debug!(
            request_id = request_id,
            backend = backend.id(),
            hashes = hashes.len(),
            known = availability.len(),
            "Availability lookup complete"
        );

        let survivors = self.filter_releases(releases, metadata).await?;

        let parsed_files = self
            .parse_file_names(
                survivors
                    .iter()
                    .filter_map(|r| availability.get(&r.normalized_hash()))
                    .flat_map(|record| record.file_list()),
            )
            .await?;

        let mut resolved = Vec::new();
        for release in survivors {
            let record = availability.get(&release.normalized_hash());

            let file = match record {
                Some(record) if !record.file_list().is_empty() => {
                    match self.select_file(release, record, &parsed_files, metadata) {
                        Some(file) => file,
                        None => continue,
                    }
                }
                // No enumerable layout: play the whole release.
                _ => SelectedFile::opaque(release.title.clone(), release.size_bytes),
            };

            resolved.push(ResolvedRelease {
                release: release.clone(),
                file,
                service: Some(ServiceTag {
                    id: backend.id().to_string(),
                    cached: record.is_some_and(|r| r.status.is_cached()),
                    owned: false,
                }),
            });
        }

        metrics::RELEASES_RESOLVED
            .with_label_values(&[backend.id()])
            .inc_by(resolved.len() as u64);

        Ok(resolved)
    }

    /// Resolve releases that carry their own file list, without any backend.
    ///
    /// Releases without a file list produce no entry.
    pub async fn resolve_local(
        &self,
        releases: &[Release],
        metadata: Option<&RequestedMetadata>,
    ) -> Result<Vec<ResolvedRelease>, ResolveError> {
        if releases.is_empty() {
            return Ok(Vec::new());
        }

        let survivors = self.filter_releases(releases, metadata).await?;

        let parsed_files = self
            .parse_file_names(
                survivors
                    .iter()
                    .filter_map(|r| r.files.as_deref())
                    .flatten(),
            )
            .await?;

        let mut resolved = Vec::new();
        for release in survivors {
            let Some(files) = &release.files else {
                continue;
            };
            let record = AvailabilityRecord {
                hash: release.normalized_hash(),
                status: AvailabilityStatus::Unknown,
                files: Some(files.clone()),
            };
            if let Some(file) = self.select_file(release, &record, &parsed_files, metadata) {
                resolved.push(ResolvedRelease {
                    release: release.clone(),
                    file,
                    service: None,
                });
            }
        }

        debug!(
            releases = releases.len(),
            resolved = resolved.len(),
            "Local resolution complete"
        );
        metrics::RELEASES_RESOLVED
            .with_label_values(&[LOCAL_LABEL])
            .inc_by(resolved.len() as u64);

        Ok(resolved)
    }

    /// Parse every distinct release title once and drop releases that
    /// contradict the requested metadata.
    async fn filter_releases<'a>(
        &self,
        releases: &'a [Release],
        metadata: Option<&RequestedMetadata>,
    ) -> Result<Vec<&'a Release>, ResolveError> {
        let titles = parse_deduplicated(
            self.parser.as_ref(),
            "title",
            releases.iter().map(|r| r.title.as_str()),
        )
        .await?;

        let Some(metadata) = metadata else {
            return Ok(releases.iter().collect());
        };

        Ok(releases
            .iter()
            .filter(|release| {
                let Some(parsed) = titles.get(&release.title) else {
                    return true;
                };
                match self.rejection(release, parsed, metadata) {
                    Some(reason) => {
                        metrics::RELEASES_FILTERED
                            .with_label_values(&[reason.as_str()])
                            .inc();
                        debug!(
                            hash = %release.hash,
                            title = %release.title,
                            reason = reason.as_str(),
                            "Release rejected"
                        );
                        false
                    }
                    None => true,
                }
            })
            .collect())
    }

    fn rejection(
        &self,
        release: &Release,
        parsed: &ParsedTitle,
        metadata: &RequestedMetadata,
    ) -> Option<Rejection> {
        if !release.confirmed && self.validator.title_mismatch(parsed, metadata) {
            return Some(Rejection::Title);
        }
        if self.validator.season_mismatch(parsed, metadata) {
            return Some(Rejection::Season);
        }
        if self.validator.episode_mismatch(parsed, metadata) {
            return Some(Rejection::Episode);
        }
        None
    }

    /// Parse the video files among `files`, each distinct name once.
    async fn parse_file_names<'a, I>(&self, files: I) -> Result<ParseLookup, ResolveError>
    where
        I: IntoIterator<Item = &'a ReleaseFile>,
    {
        let names = files
            .into_iter()
            .filter(|f| self.video.is_video(f))
            .map(|f| f.name.as_str());
        Ok(parse_deduplicated(self.parser.as_ref(), "file", names).await?)
    }

    fn select_file(
        &self,
        release: &Release,
        record: &AvailabilityRecord,
        parsed_files: &ParseLookup,
        metadata: Option<&RequestedMetadata>,
    ) -> Option<SelectedFile> {
        self.selector.select(
            release,
            record,
            parsed_files,
            metadata,
            &self.config.select_options(),
        )
    }
}

/// Lowercase hashes in input order, without duplicates.
fn unique_hashes(releases: &[Release]) -> Vec<String> {
    let mut seen = HashSet::new();
    releases
        .iter()
        .map(Release::normalized_hash)
        .filter(|h| seen.insert(h.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_hashes_normalized_and_ordered() {
        let releases = vec![
            Release::new("BBB", "b", 1),
            Release::new("aaa", "a", 1),
            Release::new("bbb", "b again", 1),
        ];
        assert_eq!(unique_hashes(&releases), vec!["bbb", "aaa"]);
    }

    #[test]
    fn test_rejection_labels() {
        assert_eq!(Rejection::Title.as_str(), "title");
        assert_eq!(Rejection::Season.as_str(), "season");
        assert_eq!(Rejection::Episode.as_str(), "episode");
    }
}
