//! Timing knobs for the resume coordinator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeSettings {
    /// Minimum gap between two accepted resume events.
    pub debounce_window_ms: u64,
    /// How long the re-entrancy guard stays up after the immediate/fast phase,
    /// so duplicate visibility+focus signals collapse into one cycle.
    pub settle_delay_ms: u64,
    /// Default pre-delay for fast-tier handlers.
    pub fast_delay_ms: u64,
    /// Background stagger for handler ids without a table entry.
    pub background_default_delay_ms: u64,
    /// Quiet window applied to native focus signals before they reach the
    /// coordinator at all.
    pub focus_quiet_window_ms: u64,
    /// Upper bound on a single handler invocation. A handler past this is
    /// logged and abandoned; the cycle continues.
    pub handler_timeout_ms: u64,
}

impl Default for ResumeSettings {
    fn default() -> Self {
        Self {
            debounce_window_ms: 2_000,
            settle_delay_ms: 100,
            fast_delay_ms: 100,
            background_default_delay_ms: 3_000,
            focus_quiet_window_ms: 1_000,
            handler_timeout_ms: 30_000,
        }
    }
}

impl ResumeSettings {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn fast_delay(&self) -> Duration {
        Duration::from_millis(self.fast_delay_ms)
    }

    pub fn background_default_delay(&self) -> Duration {
        Duration::from_millis(self.background_default_delay_ms)
    }

    pub fn focus_quiet_window(&self) -> Duration {
        Duration::from_millis(self.focus_quiet_window_ms)
    }

    pub fn handler_timeout(&self) -> Duration {
        Duration::from_millis(self.handler_timeout_ms)
    }
}
