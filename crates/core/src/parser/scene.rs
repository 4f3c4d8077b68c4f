//! Heuristic scene-name parser.
//!
//! Handles the naming conventions that cover most indexer results:
//! - "Show.Name.S01E02.1080p.WEB.h264-GROUP"
//! - "Show Name S01E02-E04", "Show Name S01E02E03"
//! - "Show Name 1x02"
//! - "Show Name Season 1 Episode 2"
//! - "Show Name S01 Complete", "Show Name S01-S03"
//! - "[Group] Anime Title - 1071 (1080p) [ABCD1234].mkv"
//! - "Movie Title (2020) 2160p"

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::{ParseError, ParsedTitle, TitleParser};

/// S01E02, S01E02E03, S01E02-E04, S01E02-04
static SXXEXX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bs(\d{1,2})\s?e(\d{1,4})(?:-?e(\d{1,4})|-(\d{1,4}))?").unwrap()
});

/// 1x02
static NXNN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})x(\d{1,3})\b").unwrap());

/// Season 1 Episode 2
static VERBOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bseason\s?(\d{1,2})\s?episode\s?(\d{1,4})\b").unwrap());

/// S01, S01-S03, Season 1
static SEASON_ONLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:s(\d{1,2})(?:-s?(\d{1,2}))?|season\s?(\d{1,2}))\b").unwrap()
});

/// " - 1071" style absolute episode numbers
static ABSOLUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s-\s(\d{1,4})(?:v\d)?(?:\s|$)").unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());

static RESOLUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(2160p|1080p|720p|576p|480p|360p|4k|uhd)\b").unwrap());

static LEADING_GROUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\]]+)\]\s*").unwrap());

static TRAILING_GROUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-([A-Za-z0-9]+)$").unwrap());

const STRIPPED_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "wmv", "mov", "webm", "mpg", "iso", "nzb", "torrent",
];

/// Regex-based parser for scene and fansub naming.
#[derive(Debug, Clone, Default)]
pub struct SceneTitleParser;

impl SceneTitleParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a single title. Returns `None` when no title text remains.
    pub fn parse_one(&self, raw: &str) -> Option<ParsedTitle> {
        let stem = strip_extension(file_name(raw));

        let (mut group, rest) = match LEADING_GROUP_RE.captures(stem) {
            Some(caps) => {
                let whole = caps.get(0)?;
                (
                    caps.get(1).map(|m| m.as_str().to_string()),
                    &stem[whole.end()..],
                )
            }
            None => (None, stem),
        };

        if group.is_none() {
            group = TRAILING_GROUP_RE
                .captures(rest)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .filter(|g| looks_like_group(g))
                .map(str::to_string);
        }

        let text = rest.replace(['.', '_'], " ");
        let mut cut = text.len();
        let mut seasons = Vec::new();
        let mut episodes = Vec::new();

        if let Some(caps) = SXXEXX_RE.captures(&text) {
            cut = cut.min(caps.get(0)?.start());
            seasons.push(number(caps.get(1))?);
            let first = number(caps.get(2))?;
            let last = number(caps.get(3)).or_else(|| number(caps.get(4)));
            episodes = episode_range(first, last);
        } else if let Some(caps) = VERBOSE_RE.captures(&text) {
            cut = cut.min(caps.get(0)?.start());
            seasons.push(number(caps.get(1))?);
            episodes.push(number(caps.get(2))?);
        } else if let Some(caps) = NXNN_RE.captures(&text) {
            cut = cut.min(caps.get(0)?.start());
            seasons.push(number(caps.get(1))?);
            episodes.push(number(caps.get(2))?);
        } else if let Some(caps) = SEASON_ONLY_RE.captures(&text) {
            cut = cut.min(caps.get(0)?.start());
            match (number(caps.get(1)), number(caps.get(2)), number(caps.get(3))) {
                (Some(first), Some(last), _) if last >= first => seasons.extend(first..=last),
                (Some(first), _, _) => seasons.push(first),
                (_, _, Some(verbose)) => seasons.push(verbose),
                _ => {}
            }
        } else if let Some(caps) = ABSOLUTE_RE.captures(&text) {
            cut = cut.min(caps.get(0)?.start());
            episodes.push(number(caps.get(1))?);
        }

        // A leading year is part of the title ("2012", "1917").
        let year = YEAR_RE
            .captures_iter(&text)
            .filter_map(|caps| caps.get(1))
            .find(|m| m.start() > 0)
            .map(|m| {
                cut = cut.min(m.start());
                m.as_str()
            })
            .and_then(|y| y.parse().ok());

        let resolution = RESOLUTION_RE.captures(&text).and_then(|caps| {
            let m = caps.get(1)?;
            if m.start() > 0 {
                cut = cut.min(m.start());
            }
            Some(m.as_str().to_lowercase())
        });

        let title = text[..cut]
            .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '(' | '['))
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        if title.is_empty() {
            return None;
        }

        Some(ParsedTitle {
            title,
            seasons,
            episodes,
            year,
            resolution,
            group,
        })
    }
}

#[async_trait]
impl TitleParser for SceneTitleParser {
    fn name(&self) -> &str {
        "scene"
    }

    async fn parse(&self, titles: &[String]) -> Result<Vec<Option<ParsedTitle>>, ParseError> {
        Ok(titles.iter().map(|t| self.parse_one(t)).collect())
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if STRIPPED_EXTENSIONS
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext)) =>
        {
            stem
        }
        _ => name,
    }
}

/// Rejects "-E04" / "-S03" / "-06" tails that belong to episode and season ranges.
fn looks_like_group(candidate: &str) -> bool {
    let digits = candidate.trim_start_matches(['s', 'S', 'e', 'E']);
    digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit())
}

fn number(m: Option<regex_lite::Match<'_>>) -> Option<u32> {
    m.and_then(|m| m.as_str().parse().ok())
}

fn episode_range(first: u32, last: Option<u32>) -> Vec<u32> {
    match last {
        Some(last) if last > first && last - first < 100 => (first..=last).collect(),
        _ => vec![first],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ParsedTitle {
        SceneTitleParser::new().parse_one(raw).unwrap()
    }

    #[test]
    fn test_standard_episode() {
        let p = parse("Show.Name.S01E02.1080p.WEB.h264-GROUP");
        assert_eq!(p.title, "Show Name");
        assert_eq!(p.seasons, vec![1]);
        assert_eq!(p.episodes, vec![2]);
        assert_eq!(p.resolution.as_deref(), Some("1080p"));
        assert_eq!(p.group.as_deref(), Some("GROUP"));
    }

    #[test]
    fn test_episode_file_with_extension() {
        let p = parse("show.s01e02.mkv");
        assert_eq!(p.title, "show");
        assert_eq!(p.seasons, vec![1]);
        assert_eq!(p.episodes, vec![2]);
    }

    #[test]
    fn test_multi_episode_range() {
        let ranged = parse("Show S01E02-E04");
        assert_eq!(ranged.episodes, vec![2, 3, 4]);
        assert!(ranged.group.is_none());
        assert_eq!(parse("Show S01E02E03").episodes, vec![2, 3]);
        assert_eq!(parse("Show S01E05-06 720p").episodes, vec![5, 6]);
    }

    #[test]
    fn test_cross_format() {
        let p = parse("Show Name 1x02 HDTV");
        assert_eq!(p.title, "Show Name");
        assert_eq!(p.seasons, vec![1]);
        assert_eq!(p.episodes, vec![2]);
    }

    #[test]
    fn test_verbose_format() {
        let p = parse("Show Name Season 2 Episode 7");
        assert_eq!(p.title, "Show Name");
        assert_eq!(p.seasons, vec![2]);
        assert_eq!(p.episodes, vec![7]);
    }

    #[test]
    fn test_season_pack() {
        let p = parse("Show.Name.S03.COMPLETE.1080p");
        assert_eq!(p.title, "Show Name");
        assert_eq!(p.seasons, vec![3]);
        assert!(p.episodes.is_empty());
    }

    #[test]
    fn test_multi_season_pack() {
        assert_eq!(parse("Show Name S01-S03").seasons, vec![1, 2, 3]);
    }

    #[test]
    fn test_absolute_anime_episode() {
        let p = parse("[SubsPlease] One Piece - 1071 (1080p) [ABCD1234].mkv");
        assert_eq!(p.title, "One Piece");
        assert!(p.seasons.is_empty());
        assert_eq!(p.episodes, vec![1071]);
        assert_eq!(p.group.as_deref(), Some("SubsPlease"));
    }

    #[test]
    fn test_movie_with_year() {
        let p = parse("Movie Title (2020) 2160p");
        assert_eq!(p.title, "Movie Title");
        assert_eq!(p.year, Some(2020));
        assert_eq!(p.resolution.as_deref(), Some("2160p"));
    }

    #[test]
    fn test_leading_year_is_title() {
        let p = parse("1917.2019.1080p.BluRay");
        assert_eq!(p.title, "1917");
        assert_eq!(p.year, Some(2019));
    }

    #[test]
    fn test_path_uses_file_name() {
        let p = parse("Show/Season 1/show.s01e03.mkv");
        assert_eq!(p.episodes, vec![3]);
    }

    #[test]
    fn test_unparseable_returns_none() {
        assert!(SceneTitleParser::new().parse_one("S01E01").is_none());
        assert!(SceneTitleParser::new().parse_one("").is_none());
    }

    #[tokio::test]
    async fn test_batch_is_positional() {
        let parser = SceneTitleParser::new();
        let titles = vec!["S01E01".to_string(), "Show S01E01".to_string()];
        let out = parser.parse(&titles).await.unwrap();

        assert_eq!(out.len(), 2);
        assert!(out[0].is_none());
        assert_eq!(out[1].as_ref().unwrap().title, "Show");
    }
}
