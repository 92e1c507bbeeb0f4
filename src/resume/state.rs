use std::collections::HashMap;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::handler::ResumeHandler;

/// Mutable coordinator state, guarded by the coordinator's mutex and never
/// held across a handler await.
pub(crate) struct ResumeState {
    /// Registry keyed by handler id; last write wins.
    pub handlers: HashMap<String, ResumeHandler>,
    /// True only during the immediate/fast span of one cycle plus the settle
    /// window; background waits are not covered.
    pub is_handling_resume: bool,
    pub last_resume_time: Option<Instant>,
    /// Token for the current cycle's background timers. Replaced (and the old
    /// one cancelled) whenever a new cycle is accepted.
    pub background_cancel: CancellationToken,
}

impl ResumeState {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            is_handling_resume: false,
            last_resume_time: None,
            background_cancel: CancellationToken::new(),
        }
    }
}
