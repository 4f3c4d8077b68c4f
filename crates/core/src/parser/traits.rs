//! Traits and types for title parsers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured decomposition of a release or file title.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedTitle {
    /// Canonical title, with separators turned into spaces.
    pub title: String,
    /// Seasons covered (several for multi-season packs).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<u32>,
    /// Episodes covered. Absolute numbering when no season is present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub episodes: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Release group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Errors that can occur while parsing a batch of titles.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Title parsing failed: {0}")]
    Failed(String),

    #[error("Parser returned {actual} results for {expected} titles")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Trait for batched title parsers.
///
/// Result index `i` must correspond to input index `i`; `None` means the
/// title could not be parsed. Implementations keep no state between calls.
#[async_trait]
pub trait TitleParser: Send + Sync {
    /// Parser name for logging.
    fn name(&self) -> &str;

    async fn parse(&self, titles: &[String]) -> Result<Vec<Option<ParsedTitle>>, ParseError>;
}
