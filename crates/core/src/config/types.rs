use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::matching::SelectOptions;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Batch resolver configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Upper bound for one backend's whole resolution, in seconds.
    /// 0 waits indefinitely.
    #[serde(default = "default_backend_timeout")]
    pub backend_timeout_secs: u64,
    /// Let the file selector fall back to fuzzy title comparison.
    #[serde(default = "default_use_levenshtein")]
    pub use_levenshtein_matching: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            backend_timeout_secs: default_backend_timeout(),
            use_levenshtein_matching: default_use_levenshtein(),
        }
    }
}

impl ResolverConfig {
    pub fn backend_timeout(&self) -> Option<Duration> {
        (self.backend_timeout_secs > 0).then(|| Duration::from_secs(self.backend_timeout_secs))
    }

    pub fn select_options(&self) -> SelectOptions {
        SelectOptions {
            use_levenshtein_matching: self.use_levenshtein_matching,
        }
    }
}

fn default_backend_timeout() -> u64 {
    30
}

fn default_use_levenshtein() -> bool {
    true
}

/// File matching configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Extensions treated as playable video (case-insensitive, no dot).
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
    /// Treat sample clips as non-video.
    #[serde(default = "default_ignore_samples")]
    pub ignore_samples: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            video_extensions: default_video_extensions(),
            ignore_samples: default_ignore_samples(),
        }
    }
}

fn default_video_extensions() -> Vec<String> {
    vec![
        "mkv", "mp4", "avi", "mov", "wmv", "m4v", "webm", "ts", "m2ts", "mpg", "mpeg", "flv",
        "iso", "vob", "divx", "ogm", "3gp",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_ignore_samples() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.resolver.backend_timeout_secs, 30);
        assert!(config.resolver.use_levenshtein_matching);
        assert!(config.matching.ignore_samples);
        assert!(config
            .matching
            .video_extensions
            .contains(&"mkv".to_string()));
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_deserialize_partial_section() {
        let toml = r#"
[resolver]
use_levenshtein_matching = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.resolver.use_levenshtein_matching);
        assert_eq!(config.resolver.backend_timeout_secs, 30); // default
    }

    #[test]
    fn test_select_options_follow_config() {
        let config = ResolverConfig {
            backend_timeout_secs: 30,
            use_levenshtein_matching: false,
        };
        assert!(!config.select_options().use_levenshtein_matching);
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let config = ResolverConfig {
            backend_timeout_secs: 0,
            use_levenshtein_matching: true,
        };
        assert!(config.backend_timeout().is_none());
        assert_eq!(
            ResolverConfig::default().backend_timeout(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.matching.video_extensions,
            config.matching.video_extensions
        );
    }
}
