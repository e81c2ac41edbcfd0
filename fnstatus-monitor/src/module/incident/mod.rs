mod analyzer;

pub use analyzer::{
    LATEST_UPDATE_MAX_CHARS, format_resolved_time, is_resolved, latest_update, matches_keywords,
    partition, recent_resolved,
};
