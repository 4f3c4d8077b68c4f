//! Deduplicated batch parsing into a string-keyed lookup.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::metrics;

use super::{ParseError, ParsedTitle, TitleParser};

/// Raw string -> parse result. Strings that failed to parse are absent.
pub type ParseLookup = HashMap<String, ParsedTitle>;

/// Parse every distinct string once, in a single batched call.
///
/// Input order is preserved (first occurrence) so the parser sees a stable
/// batch. An empty input does not call the parser at all. `kind` labels the
/// batch in logs and metrics ("title" or "file").
pub async fn parse_deduplicated<'a, I>(
    parser: &dyn TitleParser,
    kind: &str,
    raw: I,
) -> Result<ParseLookup, ParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let unique: Vec<String> = raw
        .into_iter()
        .filter(|s| seen.insert(*s))
        .map(str::to_string)
        .collect();

    if unique.is_empty() {
        return Ok(ParseLookup::new());
    }

    metrics::PARSE_BATCH_SIZE
        .with_label_values(&[kind])
        .observe(unique.len() as f64);

    let parsed = parser.parse(&unique).await?;
    if parsed.len() != unique.len() {
        return Err(ParseError::LengthMismatch {
            expected: unique.len(),
            actual: parsed.len(),
        });
    }

    let lookup: ParseLookup = unique
        .into_iter()
        .zip(parsed)
        .filter_map(|(raw, result)| result.map(|p| (raw, p)))
        .collect();

    debug!(
        parser = parser.name(),
        kind = kind,
        parsed = lookup.len(),
        "Parsed batch"
    );

    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records inputs; fails to parse anything starting with '?'.
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<Vec<String>>>,
        truncate: bool,
    }

    #[async_trait]
    impl TitleParser for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn parse(&self, titles: &[String]) -> Result<Vec<Option<ParsedTitle>>, ParseError> {
            self.calls.lock().unwrap().push(titles.to_vec());
            let mut out: Vec<_> = titles
                .iter()
                .map(|t| {
                    (!t.starts_with('?')).then(|| ParsedTitle {
                        title: t.to_uppercase(),
                        ..Default::default()
                    })
                })
                .collect();
            if self.truncate {
                out.pop();
            }
            Ok(out)
        }
    }

    #[tokio::test]
    async fn test_duplicates_parsed_once() {
        let parser = Recording::default();
        let lookup = parse_deduplicated(&parser, "title", ["a", "b", "a", "a", "c"])
            .await
            .unwrap();

        let calls = parser.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec!["a", "b", "c"]);
        assert_eq!(lookup.len(), 3);
        assert_eq!(lookup["a"].title, "A");
    }

    #[tokio::test]
    async fn test_unparseable_titles_absent() {
        let parser = Recording::default();
        let lookup = parse_deduplicated(&parser, "title", ["ok", "?bad"])
            .await
            .unwrap();

        assert!(lookup.contains_key("ok"));
        assert!(!lookup.contains_key("?bad"));
    }

    #[tokio::test]
    async fn test_empty_input_skips_parser() {
        let parser = Recording::default();
        let lookup = parse_deduplicated(&parser, "file", std::iter::empty())
            .await
            .unwrap();

        assert!(lookup.is_empty());
        assert!(parser.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_length_mismatch_is_error() {
        let parser = Recording {
            truncate: true,
            ..Default::default()
        };
        let err = parse_deduplicated(&parser, "title", ["a", "b"])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ParseError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }
}
