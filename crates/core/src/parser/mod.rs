//! Release-title parsing.
//!
//! The pipeline consumes a [`TitleParser`] through a batched, positional
//! interface and immediately turns the answer into a string-keyed
//! [`ParseLookup`], so each distinct title is parsed at most once per
//! resolver invocation.

mod lookup;
mod scene;
mod traits;

pub use lookup::{parse_deduplicated, ParseLookup};
pub use scene::SceneTitleParser;
pub use traits::*;
