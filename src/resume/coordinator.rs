//! Foreground-resume coordination.
//!
//! Feature modules register named handlers; when the app regains foreground
//! focus the coordinator runs them once per accepted resume event, in
//! priority tiers, with a global debounce and staggered background timers so
//! a resume doesn't turn into a thundering herd of refresh calls.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout, Instant};
use tokio_util::sync::CancellationToken;

use super::handler::{Platform, ResumeHandler, ResumePriority};
use super::settings::ResumeSettings;
use super::state::ResumeState;

/// Staggered defaults for well-known background handlers, so the refresh
/// calls they make don't all land at once.
fn default_background_delay(id: &str) -> Option<Duration> {
    let ms = match id {
        "session" => 0,
        "view_restore" => 100,
        "subscription" => 3_000,
        "boost" => 4_000,
        "wearable" => 5_000,
        "session_activity" => 6_000,
        _ => return None,
    };
    Some(Duration::from_millis(ms))
}

pub struct ResumeCoordinator {
    state: Arc<Mutex<ResumeState>>,
    settings: ResumeSettings,
    platform: Platform,
}

impl ResumeCoordinator {
    pub fn new(platform: Platform) -> Self {
        Self::with_settings(platform, ResumeSettings::default())
    }

    pub fn with_settings(platform: Platform, settings: ResumeSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(ResumeState::new())),
            settings,
            platform,
        }
    }

    pub fn settings(&self) -> &ResumeSettings {
        &self.settings
    }

    /// Insert or replace the handler registered under `handler.id`.
    pub async fn register_handler(&self, handler: ResumeHandler) {
        let id = handler.id.clone();
        let mut state = self.state.lock().await;
        if state.handlers.insert(id.clone(), handler).is_some() {
            debug!("Replaced resume handler '{id}'");
        }
    }

    /// Remove a handler. Removing an unknown id is a no-op.
    pub async fn unregister_handler(&self, id: &str) {
        self.state.lock().await.handlers.remove(id);
    }

    /// Run all applicable handlers for one resume event.
    ///
    /// Signals arriving while a cycle's immediate/fast phase (plus settle
    /// window) is running, or within the debounce window of the last accepted
    /// event, are dropped entirely.
    pub async fn handle_resume(&self) {
        let (synchronous, background, cancel) = {
            let mut state = self.state.lock().await;
            if state.is_handling_resume {
                debug!("Resume signal dropped: cycle already in progress");
                return;
            }
            let now = Instant::now();
            if let Some(last) = state.last_resume_time {
                if now.duration_since(last) < self.settings.debounce_window() {
                    debug!(
                        "Resume signal dropped: within {}ms debounce window",
                        self.settings.debounce_window_ms
                    );
                    return;
                }
            }
            state.is_handling_resume = true;
            state.last_resume_time = Some(now);

            // A new cycle supersedes background work still waiting from the
            // previous one; superseded runs are dropped, not rescheduled.
            let previous =
                std::mem::replace(&mut state.background_cancel, CancellationToken::new());
            previous.cancel();

            let mut applicable: Vec<ResumeHandler> = state
                .handlers
                .values()
                .filter(|h| h.applies_to(self.platform))
                .cloned()
                .collect();
            applicable.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));
            let split = applicable
                .iter()
                .position(|h| h.priority == ResumePriority::Background)
                .unwrap_or(applicable.len());
            let background = applicable.split_off(split);

            (applicable, background, state.background_cancel.clone())
        };

        info!(
            "Handling resume: {} immediate/fast handlers, {} background handlers",
            synchronous.len(),
            background.len()
        );

        // Immediate then fast, strictly sequential: one handler's await (and
        // pre-delay) completes before the next begins.
        for handler in &synchronous {
            let delay = self.effective_delay(handler);
            if !delay.is_zero() {
                sleep(delay).await;
            }
            run_handler(handler, self.settings.handler_timeout()).await;
        }

        // Background handlers get independent timers; they outlive the
        // re-entrancy guard and may overlap a later cycle's synchronous phase.
        for handler in background {
            let delay = self.effective_delay(&handler);
            let cancel = cancel.clone();
            let handler_timeout = self.settings.handler_timeout();
            tokio::spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(
                            "Background resume handler '{}' superseded before firing",
                            handler.id
                        );
                    }
                    _ = sleep(delay) => {
                        run_handler(&handler, handler_timeout).await;
                    }
                }
            });
        }

        // Keep the guard up briefly so a near-simultaneous duplicate signal
        // (visibility + focus for the same physical resume) collapses into
        // this cycle.
        sleep(self.settings.settle_delay()).await;
        self.state.lock().await.is_handling_resume = false;
    }

    fn effective_delay(&self, handler: &ResumeHandler) -> Duration {
        if let Some(delay) = handler.delay {
            return delay;
        }
        match handler.priority {
            ResumePriority::Immediate => Duration::ZERO,
            ResumePriority::Fast => self.settings.fast_delay(),
            ResumePriority::Background => default_background_delay(&handler.id)
                .unwrap_or_else(|| self.settings.background_default_delay()),
        }
    }
}

/// Invoke one handler, absorbing failures and runaway awaits. A failed or
/// timed-out handler waits for the next accepted resume; there is no retry
/// within the cycle.
async fn run_handler(handler: &ResumeHandler, handler_timeout: Duration) {
    match timeout(handler_timeout, (handler.task)()).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => error!("Resume handler '{}' failed: {err:#}", handler.id),
        Err(_) => error!(
            "Resume handler '{}' timed out after {}ms",
            handler.id,
            handler_timeout.as_millis()
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    use anyhow::anyhow;
    use tokio::sync::Notify;
    use tokio::time::advance;

    use super::*;

    /// Route handler logs through env_logger when RUST_LOG is set.
    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn counting(id: &str, priority: ResumePriority, hits: Arc<AtomicUsize>) -> ResumeHandler {
        ResumeHandler::new(id, priority, move || {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
    }

    fn recording(
        id: &str,
        priority: ResumePriority,
        order: Arc<StdMutex<Vec<&'static str>>>,
        tag: &'static str,
    ) -> ResumeHandler {
        ResumeHandler::new(id, priority, move || {
            let order = order.clone();
            async move {
                order.lock().unwrap().push(tag);
                Ok(())
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn second_signal_within_debounce_window_is_dropped() {
        init_logs();
        let coordinator = ResumeCoordinator::new(Platform::Web);
        let hits = Arc::new(AtomicUsize::new(0));
        coordinator
            .register_handler(counting("refresh", ResumePriority::Immediate, hits.clone()))
            .await;

        coordinator.handle_resume().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Only ~100ms (settle) has elapsed; well inside the 2s window.
        coordinator.handle_resume().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        advance(Duration::from_millis(2_000)).await;
        coordinator.handle_resume().await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn reentrant_signal_is_a_no_op() {
        init_logs();
        let coordinator = Arc::new(ResumeCoordinator::new(Platform::Web));
        let hits = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let gate_in = gate.clone();
        let hits_in = hits.clone();
        coordinator
            .register_handler(ResumeHandler::new(
                "slow",
                ResumePriority::Immediate,
                move || {
                    let gate = gate_in.clone();
                    let hits = hits_in.clone();
                    async move {
                        gate.notified().await;
                        hits.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }
                },
            ))
            .await;

        let first = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.handle_resume().await }
        });
        tokio::task::yield_now().await;

        // The first cycle is parked inside its handler; this one must bounce
        // off the guard without invoking anything.
        coordinator.handle_resume().await;
        gate.notify_one();
        first.await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn tiers_run_immediate_then_fast_then_background() {
        init_logs();
        let coordinator = ResumeCoordinator::new(Platform::Web);
        let order = Arc::new(StdMutex::new(Vec::new()));

        // Registration order deliberately reversed from execution order.
        coordinator
            .register_handler(
                recording("bg", ResumePriority::Background, order.clone(), "background")
                    .with_delay(Duration::from_millis(3_000)),
            )
            .await;
        coordinator
            .register_handler(recording(
                "first",
                ResumePriority::Immediate,
                order.clone(),
                "immediate",
            ))
            .await;
        coordinator
            .register_handler(recording("second", ResumePriority::Fast, order.clone(), "fast"))
            .await;

        coordinator.handle_resume().await;
        assert_eq!(*order.lock().unwrap(), vec!["immediate", "fast"]);

        sleep(Duration::from_millis(3_500)).await;
        assert_eq!(
            *order.lock().unwrap(),
            vec!["immediate", "fast", "background"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn intra_tier_order_is_ascending_id() {
        init_logs();
        let coordinator = ResumeCoordinator::new(Platform::Web);
        let order = Arc::new(StdMutex::new(Vec::new()));

        coordinator
            .register_handler(recording("b", ResumePriority::Immediate, order.clone(), "b"))
            .await;
        coordinator
            .register_handler(recording("a", ResumePriority::Immediate, order.clone(), "a"))
            .await;

        coordinator.handle_resume().await;
        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn platform_gated_handlers_are_filtered() {
        init_logs();
        let coordinator = ResumeCoordinator::new(Platform::Native);
        let web_hits = Arc::new(AtomicUsize::new(0));
        let native_hits = Arc::new(AtomicUsize::new(0));

        coordinator
            .register_handler(
                counting("web_refresh", ResumePriority::Immediate, web_hits.clone()).web_only(),
            )
            .await;
        coordinator
            .register_handler(
                counting("native_refresh", ResumePriority::Immediate, native_hits.clone())
                    .native_only(),
            )
            .await;

        coordinator.handle_resume().await;
        assert_eq!(web_hits.load(Ordering::SeqCst), 0);
        assert_eq!(native_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_handler_does_not_stop_the_tier() {
        init_logs();
        let coordinator = ResumeCoordinator::new(Platform::Web);
        let hits = Arc::new(AtomicUsize::new(0));

        coordinator
            .register_handler(ResumeHandler::new(
                "a_broken",
                ResumePriority::Immediate,
                || async { Err(anyhow!("network down")) },
            ))
            .await;
        coordinator
            .register_handler(counting("b_next", ResumePriority::Immediate, hits.clone()))
            .await;

        coordinator.handle_resume().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_handler_times_out_and_the_tier_continues() {
        init_logs();
        let settings = ResumeSettings {
            handler_timeout_ms: 1_000,
            ..ResumeSettings::default()
        };
        let coordinator = ResumeCoordinator::with_settings(Platform::Web, settings);
        let order = Arc::new(StdMutex::new(Vec::new()));

        let order_in = order.clone();
        coordinator
            .register_handler(ResumeHandler::new(
                "a_hung",
                ResumePriority::Immediate,
                move || {
                    let order = order_in.clone();
                    async move {
                        sleep(Duration::from_millis(60_000)).await;
                        order.lock().unwrap().push("hung");
                        Ok(())
                    }
                },
            ))
            .await;
        coordinator
            .register_handler(recording("b_next", ResumePriority::Immediate, order.clone(), "next"))
            .await;

        coordinator.handle_resume().await;
        assert_eq!(*order.lock().unwrap(), vec!["next"]);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_runs_synchronously_and_background_after_its_delay() {
        init_logs();
        let coordinator = ResumeCoordinator::new(Platform::Web);
        let a_hits = Arc::new(AtomicUsize::new(0));
        let b_hits = Arc::new(AtomicUsize::new(0));

        coordinator
            .register_handler(counting("a", ResumePriority::Immediate, a_hits.clone()))
            .await;
        coordinator
            .register_handler(
                counting("b", ResumePriority::Background, b_hits.clone())
                    .with_delay(Duration::from_millis(500)),
            )
            .await;

        coordinator.handle_resume().await;
        assert_eq!(a_hits.load(Ordering::SeqCst), 1);
        assert_eq!(b_hits.load(Ordering::SeqCst), 0);

        // Duplicate signal inside the debounce window: nothing runs again.
        coordinator.handle_resume().await;

        sleep(Duration::from_millis(600)).await;
        assert_eq!(a_hits.load(Ordering::SeqCst), 1);
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn background_timer_is_not_gated_by_the_reentrancy_guard() {
        init_logs();
        let coordinator = ResumeCoordinator::new(Platform::Web);
        let hits = Arc::new(AtomicUsize::new(0));

        // Delay shorter than the 100ms settle window, so the timer fires
        // while `is_handling_resume` is still up.
        coordinator
            .register_handler(
                counting("refresh", ResumePriority::Background, hits.clone())
                    .with_delay(Duration::from_millis(10)),
            )
            .await;

        coordinator.handle_resume().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn new_cycle_cancels_pending_background_timers() {
        init_logs();
        let coordinator = ResumeCoordinator::new(Platform::Web);
        let hits = Arc::new(AtomicUsize::new(0));

        coordinator
            .register_handler(
                counting("refresh", ResumePriority::Background, hits.clone())
                    .with_delay(Duration::from_millis(3_000)),
            )
            .await;

        coordinator.handle_resume().await;
        advance(Duration::from_millis(2_000)).await;
        // Past the debounce window, so this cycle is accepted and supersedes
        // the first cycle's still-waiting timer.
        coordinator.handle_resume().await;

        sleep(Duration::from_millis(4_000)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reregistering_an_id_replaces_the_handler() {
        init_logs();
        let coordinator = ResumeCoordinator::new(Platform::Web);
        let old_hits = Arc::new(AtomicUsize::new(0));
        let new_hits = Arc::new(AtomicUsize::new(0));

        coordinator
            .register_handler(counting("refresh", ResumePriority::Immediate, old_hits.clone()))
            .await;
        coordinator
            .register_handler(counting("refresh", ResumePriority::Immediate, new_hits.clone()))
            .await;

        coordinator.handle_resume().await;
        assert_eq!(old_hits.load(Ordering::SeqCst), 0);
        assert_eq!(new_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unregister_is_idempotent() {
        init_logs();
        let coordinator = ResumeCoordinator::new(Platform::Web);
        let hits = Arc::new(AtomicUsize::new(0));

        coordinator
            .register_handler(counting("refresh", ResumePriority::Immediate, hits.clone()))
            .await;
        coordinator.unregister_handler("refresh").await;
        coordinator.unregister_handler("refresh").await;
        coordinator.unregister_handler("never_registered").await;

        coordinator.handle_resume().await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn background_stagger_table_covers_known_ids() {
        assert_eq!(default_background_delay("session"), Some(Duration::ZERO));
        assert_eq!(
            default_background_delay("wearable"),
            Some(Duration::from_millis(5_000))
        );
        assert_eq!(default_background_delay("unknown"), None);
    }
}
