mod classifier;
mod matcher;
mod state;

pub use classifier::{Classification, OverallHealth, Tier, Transition, classify, detect_transition};
pub use matcher::find_component;
pub use state::MonitorState;
