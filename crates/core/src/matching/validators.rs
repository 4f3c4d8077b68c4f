//! Metadata validators: does a parsed release contradict the request?
//!
//! Each check answers "mismatch", so missing information never rejects a
//! release: a season pack without episode numbers passes the episode check,
//! a movie request without a season passes the season check.

use crate::parser::ParsedTitle;

use super::similarity::normalize_title;
use super::RequestedMetadata;

/// Trait for metadata validators.
pub trait MetadataValidator: Send + Sync {
    fn title_mismatch(&self, parsed: &ParsedTitle, metadata: &RequestedMetadata) -> bool;

    fn season_mismatch(&self, parsed: &ParsedTitle, metadata: &RequestedMetadata) -> bool;

    fn episode_mismatch(&self, parsed: &ParsedTitle, metadata: &RequestedMetadata) -> bool;
}

/// Normalised title equality plus season/episode containment.
#[derive(Debug, Clone, Default)]
pub struct StandardValidator;

impl StandardValidator {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataValidator for StandardValidator {
    fn title_mismatch(&self, parsed: &ParsedTitle, metadata: &RequestedMetadata) -> bool {
        if metadata.titles.is_empty() {
            return false;
        }
        let parsed_title = strip_article(&normalize_title(&parsed.title)).to_string();
        if parsed_title.is_empty() {
            return false;
        }

        !metadata
            .titles
            .iter()
            .map(|t| normalize_title(t))
            .any(|t| strip_article(&t) == parsed_title)
    }

    fn season_mismatch(&self, parsed: &ParsedTitle, metadata: &RequestedMetadata) -> bool {
        match metadata.season {
            Some(season) => !parsed.seasons.is_empty() && !parsed.seasons.contains(&season),
            None => false,
        }
    }

    fn episode_mismatch(&self, parsed: &ParsedTitle, metadata: &RequestedMetadata) -> bool {
        if !metadata.wants_episode() || parsed.episodes.is_empty() {
            return false;
        }
        let wanted = [metadata.episode, metadata.absolute_episode];
        !wanted
            .iter()
            .flatten()
            .any(|ep| parsed.episodes.contains(ep))
    }
}

fn strip_article(title: &str) -> &str {
    title.strip_prefix("the ").unwrap_or(title)
}
