//! Selection of the playable file inside a multi-file release.

use tracing::debug;

use crate::backend::AvailabilityRecord;
use crate::parser::{ParseLookup, ParsedTitle};
use crate::release::{Release, ReleaseFile};

use super::similarity::title_similarity;
use super::validators::{MetadataValidator, StandardValidator};
use super::video::VideoFilter;
use super::{RequestedMetadata, SelectOptions, SelectedFile};

/// Minimum fuzzy similarity for a file title to count as the requested title.
const FUZZY_TITLE_THRESHOLD: f32 = 0.8;

/// Trait for picking one file out of a release.
pub trait FileSelector: Send + Sync {
    /// Pick the best file from `record`'s file list, or `None` when no file
    /// is acceptable. `parsed_files` is keyed by file name.
    fn select(
        &self,
        release: &Release,
        record: &AvailabilityRecord,
        parsed_files: &ParseLookup,
        metadata: Option<&RequestedMetadata>,
        options: &SelectOptions,
    ) -> Option<SelectedFile>;
}

/// Heuristic file selector.
///
/// - Episode requests: the largest video file whose parsed season/episode
///   matches, preferring files whose title matches the request. A lone
///   video file is accepted when its name carries no episode number and no
///   conflicting season.
/// - Movie / unconstrained requests: the largest video file.
#[derive(Debug, Clone, Default)]
pub struct HeuristicFileSelector {
    video: VideoFilter,
    validator: StandardValidator,
}

impl HeuristicFileSelector {
    pub fn new(video: VideoFilter) -> Self {
        Self {
            video,
            validator: StandardValidator::new(),
        }
    }

    fn episode_matches(&self, parsed: &ParsedTitle, metadata: &RequestedMetadata) -> bool {
        !parsed.episodes.is_empty()
            && !self.validator.season_mismatch(parsed, metadata)
            && !self.validator.episode_mismatch(parsed, metadata)
    }

    /// A lone file may stand in for the episode only if its name does not
    /// point at a different one.
    fn lacks_episode_evidence(
        &self,
        file: &ReleaseFile,
        parsed_files: &ParseLookup,
        metadata: &RequestedMetadata,
    ) -> bool {
        match parsed_files.get(&file.name) {
            Some(parsed) => {
                parsed.episodes.is_empty() && !self.validator.season_mismatch(parsed, metadata)
            }
            None => true,
        }
    }

    fn title_matches(
        &self,
        parsed: &ParsedTitle,
        metadata: &RequestedMetadata,
        options: &SelectOptions,
    ) -> bool {
        if !self.validator.title_mismatch(parsed, metadata) {
            return true;
        }
        options.use_levenshtein_matching
            && metadata
                .titles
                .iter()
                .any(|t| title_similarity(t, &parsed.title) >= FUZZY_TITLE_THRESHOLD)
    }
}

impl FileSelector for HeuristicFileSelector {
    fn select(
        &self,
        release: &Release,
        record: &AvailabilityRecord,
        parsed_files: &ParseLookup,
        metadata: Option<&RequestedMetadata>,
        options: &SelectOptions,
    ) -> Option<SelectedFile> {
        let videos: Vec<(usize, &ReleaseFile)> = record
            .file_list()
            .iter()
            .enumerate()
            .filter(|(_, f)| self.video.is_video(f))
            .collect();

        if videos.is_empty() {
            debug!(hash = %release.hash, "No video files in release");
            return None;
        }

        let chosen = match metadata.filter(|m| m.wants_episode()) {
            Some(meta) => {
                let matching: Vec<(usize, &ReleaseFile, bool)> = videos
                    .iter()
                    .filter_map(|(idx, file)| {
                        let parsed = parsed_files.get(&file.name)?;
                        self.episode_matches(parsed, meta).then(|| {
                            (*idx, *file, self.title_matches(parsed, meta, options))
                        })
                    })
                    .collect();

                if matching.is_empty() {
                    match videos.as_slice() {
                        [(idx, file)] if self.lacks_episode_evidence(file, parsed_files, meta) => {
                            Some((*idx, *file))
                        }
                        _ => None,
                    }
                } else {
                    matching
                        .into_iter()
                        .max_by_key(|(_, file, title_ok)| (*title_ok, file.size_bytes))
                        .map(|(idx, file, _)| (idx, file))
                }
            }
            None => videos.iter().copied().max_by_key(|(_, f)| f.size_bytes),
        };

        let Some((idx, file)) = chosen else {
            debug!(hash = %release.hash, "No file matched requested episode");
            return None;
        };

        Some(SelectedFile {
            name: file.name.clone(),
            size_bytes: file.size_bytes,
            index: idx as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AvailabilityStatus;
    use crate::parser::SceneTitleParser;

    fn record(files: &[(&str, u64)]) -> AvailabilityRecord {
        AvailabilityRecord::new("h1", AvailabilityStatus::Cached).with_files(
            files
                .iter()
                .map(|(n, s)| ReleaseFile::new(*n, *s))
                .collect(),
        )
    }

    fn lookup(record: &AvailabilityRecord) -> ParseLookup {
        let parser = SceneTitleParser::new();
        record
            .file_list()
            .iter()
            .filter_map(|f| parser.parse_one(&f.name).map(|p| (f.name.clone(), p)))
            .collect()
    }

    fn select(
        record: &AvailabilityRecord,
        metadata: Option<&RequestedMetadata>,
    ) -> Option<SelectedFile> {
        let release = Release::new("h1", "Release", 1000);
        HeuristicFileSelector::default().select(
            &release,
            record,
            &lookup(record),
            metadata,
            &SelectOptions::default(),
        )
    }

    #[test]
    fn test_movie_picks_largest_video() {
        let rec = record(&[
            ("Movie/movie.nfo", 10),
            ("Movie/extras.mkv", 300),
            ("Movie/movie.2020.1080p.mkv", 4000),
            ("Movie/Sample/movie-sample.mkv", 5000),
        ]);
        let meta = RequestedMetadata::new(["Movie"]);
        let file = select(&rec, Some(&meta)).unwrap();

        assert_eq!(file.index, 2);
        assert_eq!(file.name, "Movie/movie.2020.1080p.mkv");
        assert_eq!(file.size_bytes, 4000);
    }

    #[test]
    fn test_no_metadata_picks_largest_video() {
        let rec = record(&[("a.mkv", 10), ("b.mp4", 20)]);
        assert_eq!(select(&rec, None).unwrap().index, 1);
    }

    #[test]
    fn test_episode_picked_from_season_pack() {
        let rec = record(&[
            ("Show.S01E01.mkv", 900),
            ("Show.S01E02.mkv", 800),
            ("Show.S01E03.mkv", 950),
            ("Show.S01E02.srt", 1),
        ]);
        let meta = RequestedMetadata::new(["Show"]).with_season(1).with_episode(2);
        let file = select(&rec, Some(&meta)).unwrap();

        assert_eq!(file.index, 1);
        assert_eq!(file.name, "Show.S01E02.mkv");
    }

    #[test]
    fn test_episode_missing_from_pack() {
        let rec = record(&[("Show.S01E01.mkv", 900), ("Show.S01E03.mkv", 950)]);
        let meta = RequestedMetadata::new(["Show"]).with_season(1).with_episode(2);
        assert!(select(&rec, Some(&meta)).is_none());
    }

    #[test]
    fn test_single_video_accepted_without_episode_evidence() {
        let rec = record(&[("video.mkv", 900), ("info.nfo", 1)]);
        let meta = RequestedMetadata::new(["Show"]).with_season(1).with_episode(2);
        assert_eq!(select(&rec, Some(&meta)).unwrap().index, 0);
    }

    #[test]
    fn test_single_video_with_other_episode_rejected() {
        let rec = record(&[("Show.S01E05.mkv", 900)]);
        let meta = RequestedMetadata::new(["Show"]).with_season(1).with_episode(2);
        assert!(select(&rec, Some(&meta)).is_none());
    }

    #[test]
    fn test_single_video_with_other_season_rejected() {
        let rec = record(&[("Show.S02.mkv", 900)]);
        let meta = RequestedMetadata::new(["Show"]).with_season(1).with_episode(2);
        assert!(select(&rec, Some(&meta)).is_none());
    }

    #[test]
    fn test_single_unparseable_video_accepted() {
        let rec = record(&[("S01E05.mkv", 900)]);
        let meta = RequestedMetadata::new(["Show"]).with_season(1).with_episode(2);
        // No title text remains, so the name has no parse entry at all.
        assert_eq!(select(&rec, Some(&meta)).unwrap().index, 0);
    }

    #[test]
    fn test_title_match_preferred_over_size() {
        let rec = record(&[
            ("Other.Show.S01E02.mkv", 2000),
            ("Show.S01E02.mkv", 1000),
        ]);
        let meta = RequestedMetadata::new(["Show"]).with_season(1).with_episode(2);
        assert_eq!(select(&rec, Some(&meta)).unwrap().index, 1);
    }

    #[test]
    fn test_fuzzy_title_only_with_levenshtein() {
        let rec = record(&[("Show.Nme.S01E02.mkv", 1000), ("Else.S01E02.mkv", 2000)]);
        let release = Release::new("h1", "Release", 1000);
        let meta = RequestedMetadata::new(["Show Name"]).with_season(1).with_episode(2);
        let selector = HeuristicFileSelector::default();

        let fuzzy = selector
            .select(&release, &rec, &lookup(&rec), Some(&meta), &SelectOptions::default())
            .unwrap();
        assert_eq!(fuzzy.index, 0);

        let strict = selector
            .select(
                &release,
                &rec,
                &lookup(&rec),
                Some(&meta),
                &SelectOptions {
                    use_levenshtein_matching: false,
                },
            )
            .unwrap();
        assert_eq!(strict.index, 1);
    }

    #[test]
    fn test_no_video_files() {
        let rec = record(&[("a.txt", 10)]);
        assert!(select(&rec, None).is_none());
        let empty = AvailabilityRecord::new("h1", AvailabilityStatus::Cached);
        assert!(select(&empty, None).is_none());
    }
}
