//! Video file detection.

use once_cell::sync::Lazy;

use crate::config::MatchingConfig;
use crate::release::ReleaseFile;

static DEFAULT_FILTER: Lazy<VideoFilter> = Lazy::new(VideoFilter::default);

/// Decides which files in a release are playable video.
#[derive(Debug, Clone)]
pub struct VideoFilter {
    extensions: Vec<String>,
    ignore_samples: bool,
}

impl Default for VideoFilter {
    fn default() -> Self {
        Self::new(&MatchingConfig::default())
    }
}

impl VideoFilter {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            extensions: config
                .video_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            ignore_samples: config.ignore_samples,
        }
    }

    pub fn is_video(&self, file: &ReleaseFile) -> bool {
        let ext = get_extension(&file.name);
        if !self.extensions.iter().any(|e| *e == ext) {
            return false;
        }
        !(self.ignore_samples && is_sample(&file.name))
    }

    pub fn is_not_video(&self, file: &ReleaseFile) -> bool {
        !self.is_video(file)
    }
}

/// `true` for subtitles, artwork, NFOs, samples and other non-media entries.
pub fn is_not_video_file(file: &ReleaseFile) -> bool {
    DEFAULT_FILTER.is_not_video(file)
}

fn get_extension(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.contains(['/', '\\']) => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// Sample clips live in a "sample" folder or carry "sample" as a name token.
fn is_sample(path: &str) -> bool {
    let lower = path.to_lowercase();
    let mut components: Vec<&str> = lower.split(['/', '\\']).collect();
    let file = components.pop().unwrap_or("");

    if components
        .iter()
        .any(|dir| *dir == "sample" || *dir == "samples")
    {
        return true;
    }

    let stem = file.rsplit_once('.').map(|(s, _)| s).unwrap_or(file);
    stem.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == "sample")
}
