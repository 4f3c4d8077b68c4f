//! Mock title parser for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::parser::{ParseError, ParsedTitle, SceneTitleParser, TitleParser};

/// Mock implementation of the TitleParser trait.
///
/// Parses with [`SceneTitleParser`] unless a title has an override, and
/// records every batch it receives so tests can assert on parse work.
#[derive(Debug, Clone, Default)]
pub struct MockTitleParser {
    inner: SceneTitleParser,
    /// Recorded batches, in call order.
    calls: Arc<RwLock<Vec<Vec<String>>>>,
    /// Fixed results by title.
    overrides: Arc<RwLock<HashMap<String, ParsedTitle>>>,
    /// Titles that must fail to parse.
    unparseable: Arc<RwLock<HashSet<String>>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<ParseError>>>,
}

impl MockTitleParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always return `parsed` for `title`.
    pub async fn set_result(&self, title: &str, parsed: ParsedTitle) {
        self.overrides
            .write()
            .await
            .insert(title.to_string(), parsed);
    }

    /// Make `title` fail to parse.
    pub async fn set_unparseable(&self, title: &str) {
        self.unparseable.write().await.insert(title.to_string());
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: ParseError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get recorded batches.
    pub async fn calls(&self) -> Vec<Vec<String>> {
        self.calls.read().await.clone()
    }

    /// Get the number of batched calls.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Every string sent to the parser, across all calls.
    pub async fn all_inputs(&self) -> Vec<String> {
        self.calls.read().await.iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl TitleParser for MockTitleParser {
    fn name(&self) -> &str {
        "mock"
    }

    async fn parse(&self, titles: &[String]) -> Result<Vec<Option<ParsedTitle>>, ParseError> {
        self.calls.write().await.push(titles.to_vec());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let overrides = self.overrides.read().await;
        let unparseable = self.unparseable.read().await;
        Ok(titles
            .iter()
            .map(|t| {
                if unparseable.contains(t) {
                    None
                } else if let Some(parsed) = overrides.get(t) {
                    Some(parsed.clone())
                } else {
                    self.inner.parse_one(t)
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_batches() {
        let parser = MockTitleParser::new();
        parser
            .parse(&["Show S01E01".to_string(), "Movie 2020".to_string()])
            .await
            .unwrap();
        parser.parse(&["x.mkv".to_string()]).await.unwrap();

        assert_eq!(parser.call_count().await, 2);
        assert_eq!(parser.all_inputs().await.len(), 3);
    }

    #[tokio::test]
    async fn test_overrides_and_unparseable() {
        let parser = MockTitleParser::new();
        parser
            .set_result(
                "weird",
                ParsedTitle {
                    title: "Show".to_string(),
                    seasons: vec![1],
                    ..Default::default()
                },
            )
            .await;
        parser.set_unparseable("Show S01E01").await;

        let out = parser
            .parse(&["weird".to_string(), "Show S01E01".to_string()])
            .await
            .unwrap();

        assert_eq!(out[0].as_ref().unwrap().seasons, vec![1]);
        assert!(out[1].is_none());
    }

    #[tokio::test]
    async fn test_next_error() {
        let parser = MockTitleParser::new();
        parser
            .set_next_error(ParseError::Failed("boom".to_string()))
            .await;

        assert!(parser.parse(&["a".to_string()]).await.is_err());
        assert!(parser.parse(&["a".to_string()]).await.is_ok());
    }
}
