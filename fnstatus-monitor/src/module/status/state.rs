//! Cross-cycle monitor state

use super::classifier::{Transition, detect_transition};

/// Last observed status of the tracked component.
///
/// Owned by the poll loop and handed to each cycle by `&mut`; it is the only
/// state that survives between cycles and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    last_status: Option<String>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    /// Compare `current` with the previous observation, then record it.
    pub fn observe(&mut self, current: &str) -> Option<Transition> {
        let transition = detect_transition(self.last_status.as_deref(), current);
        self.last_status = Some(current.to_string());
        transition
    }
}
