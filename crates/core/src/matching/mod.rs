//! Metadata validation and file selection.
//!
//! Everything here is synchronous and pure: validators decide whether a
//! parsed release contradicts the request, the video filter drops non-media
//! entries, and the file selector picks the one file to play.

mod selector;
mod similarity;
mod types;
mod validators;
mod video;

pub use selector::{FileSelector, HeuristicFileSelector};
pub use similarity::{levenshtein_distance, normalize_title, title_similarity};
pub use types::*;
pub use validators::{MetadataValidator, StandardValidator};
pub use video::{is_not_video_file, VideoFilter};
