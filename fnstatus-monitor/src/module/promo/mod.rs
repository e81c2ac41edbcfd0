mod window;

pub use window::{
    CurrentFree, GameWindows, Remaining, UpcomingFree, classify_catalog, classify_game,
    parse_timestamp, remaining, until,
};
