//! Wiring from platform visibility/focus events to the coordinator.

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::coordinator::ResumeCoordinator;

/// A foreground transition reported by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeSignal {
    /// The app surface became visible again.
    BecameVisible,
    /// The app window gained input focus. Native shells emit this more
    /// chattily than visibility changes, so it passes a quiet-window
    /// pre-filter before reaching the coordinator.
    GainedFocus,
}

/// Drive the coordinator from a stream of resume signals. Runs until the
/// sending side of the channel is dropped.
pub fn spawn_signal_listener(
    coordinator: Arc<ResumeCoordinator>,
    mut signals: mpsc::UnboundedReceiver<ResumeSignal>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let quiet_window = coordinator.settings().focus_quiet_window();
        let mut last_focus: Option<Instant> = None;

        while let Some(signal) = signals.recv().await {
            match signal {
                ResumeSignal::BecameVisible => coordinator.handle_resume().await,
                ResumeSignal::GainedFocus => {
                    let now = Instant::now();
                    if last_focus
                        .is_some_and(|last| now.duration_since(last) < quiet_window)
                    {
                        debug!("Focus signal dropped: within quiet window");
                        continue;
                    }
                    last_focus = Some(now);
                    coordinator.handle_resume().await;
                }
            }
        }

        info!("Resume signal channel closed; listener exiting");
    })
}
