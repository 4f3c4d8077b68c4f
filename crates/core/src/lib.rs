pub mod backend;
pub mod config;
pub mod logging;
pub mod matching;
pub mod metrics;
pub mod parser;
pub mod release;
pub mod resolver;
pub mod testing;

pub use backend::{
    AvailabilityRecord, AvailabilityStatus, BackendError, ClientContext, DebridBackend,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LoggingConfig,
    MatchingConfig, ResolverConfig,
};
pub use logging::{init_logging, LoggingError};
pub use matching::{
    is_not_video_file, FileSelector, HeuristicFileSelector, MetadataValidator, RequestedMetadata,
    SelectOptions, SelectedFile, StandardValidator, VideoFilter, OPAQUE_PAYLOAD_INDEX,
};
pub use parser::{ParseError, ParsedTitle, SceneTitleParser, TitleParser};
pub use release::{MediaKind, Release, ReleaseFile};
pub use resolver::{
    new_request_id, BackendFailure, BatchOutcome, BatchResolver, ResolveError, ResolvedRelease,
    ServiceTag,
};
