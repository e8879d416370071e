use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::{Duration, Instant};

use crate::focus::capability::{MuteCapability, PauseCapability};
use crate::settings::{FocusSettings, SettingsStore};

/// How often the periodic tick re-checks an outstanding pause request.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Snapshot of the controller's transition state, for the frontend.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ControllerStatus {
    pub paused_by_us: bool,
    pub wants_to_pause: bool,
    pub tracking_window: bool,
}

struct DeadlineHandle {
    generation: u64,
    task: tauri::async_runtime::JoinHandle<()>,
}

#[derive(Default)]
struct EpisodeState {
    /// True only if this controller issued a pause that it may later reverse.
    paused_by_us: bool,
    /// The host was already paused when focus was lost; such a pause is
    /// never ours to undo.
    already_paused_at_focus_loss: bool,
    /// A pause request is outstanding and not yet confirmed applied.
    wants_to_pause: bool,
    /// The auto-unpause deadline timer is armed.
    tracking_window: bool,
    focus_lost_at: Option<Instant>,
    deadline: Option<DeadlineHandle>,
    /// Monotonically increasing timer generation. A deadline task that was
    /// aborted mid-fire carries a stale generation and is ignored.
    generation: u64,
}

/// Reacts to window focus transitions by pausing and muting the host.
///
/// One focus-lost/focus-gained episode at a time: focus-lost records the host
/// state, asks for a pause, and arms the auto-unpause deadline; focus-gained
/// decides whether the pause should be reversed and closes the episode out.
/// The periodic tick re-issues a pause request the host could not take yet.
///
/// The focus handler, the tick, and the deadline callback all funnel through
/// one mutex, so transitions never interleave.
pub struct FocusReactionController {
    settings: Arc<SettingsStore>,
    pause: Arc<dyn PauseCapability>,
    mute: Arc<dyn MuteCapability>,
    inner: Mutex<EpisodeState>,
    weak_self: Weak<FocusReactionController>,
}

impl FocusReactionController {
    pub fn new(
        settings: Arc<SettingsStore>,
        pause: Arc<dyn PauseCapability>,
        mute: Arc<dyn MuteCapability>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            settings,
            pause,
            mute,
            inner: Mutex::new(EpisodeState::default()),
            weak_self: weak.clone(),
        })
    }

    pub fn handle_focus_change(&self, has_focus: bool) {
        self.focus_changed_at(has_focus, Instant::now());
    }

    pub(crate) fn focus_changed_at(&self, has_focus: bool, now: Instant) {
        // Always read the latest snapshot; settings may have been replaced
        // since the previous signal.
        let settings = self.settings.current();
        log::debug!("Focus changed: has_focus={} {:?}", has_focus, settings);

        if has_focus {
            self.on_focus_gained(&settings, now);
        } else {
            self.on_focus_lost(&settings, now);
        }

        if settings.auto_mute {
            self.mute.set_muted(!has_focus);
        }
    }

    fn on_focus_lost(&self, settings: &FocusSettings, now: Instant) {
        let mut state = self.lock_state();
        state.focus_lost_at = Some(now);

        if settings.auto_pause {
            state.wants_to_pause = true;
            state.already_paused_at_focus_loss = self.pause.is_paused();
            if state.already_paused_at_focus_loss {
                log::debug!("Host already paused at focus loss; not claiming ownership");
            } else {
                let outcome = self.pause.request_pause();
                if outcome.accepted() {
                    state.paused_by_us = true;
                    log::info!("Pause requested on focus loss ({:?})", outcome);
                } else {
                    log::debug!("Pause capability unavailable; will retry on tick");
                }
            }
        }

        if settings.auto_unpause && settings.unpause_window_secs > 0.0 {
            self.arm_deadline(
                &mut state,
                Duration::from_secs_f32(settings.unpause_window_secs),
            );
        }
    }

    fn on_focus_gained(&self, settings: &FocusSettings, now: Instant) {
        let mut state = self.lock_state();
        state.wants_to_pause = false;
        if let Some(deadline) = state.deadline.take() {
            deadline.task.abort();
        }

        if settings.auto_unpause && state.paused_by_us {
            let should_unpause = if settings.unpause_window_secs > 0.0 {
                state.tracking_window
                    && state.focus_lost_at.is_some_and(|lost| {
                        now.duration_since(lost).as_secs_f32() <= settings.unpause_window_secs
                    })
            } else {
                // A window of 0 means "always unpause on refocus"; there is
                // no elapsed-time check to fail.
                true
            };

            if should_unpause {
                self.attempt_unpause();
            } else {
                log::info!("Refocus outside the auto-unpause window; leaving host paused");
            }
        }

        // Every focus-gained event fully closes out the prior focus-lost
        // episode, whether or not an unpause happened.
        state.paused_by_us = false;
        state.already_paused_at_focus_loss = false;
        state.tracking_window = false;
    }

    /// Reverses only a pause we created, and only while the host still
    /// reports being paused.
    fn attempt_unpause(&self) {
        if self.pause.is_paused() {
            let outcome = self.pause.request_unpause();
            log::info!("Unpause requested on refocus ({:?})", outcome);
        } else {
            log::debug!("Host no longer paused; skipping unpause");
        }
    }

    /// Periodic retry for a pause request the host could not take when focus
    /// was lost (its control object may not exist yet at startup). No-op
    /// while the host reports paused, and stops the instant a focus-gained
    /// event clears the pending request.
    pub fn tick(&self) {
        let mut state = self.lock_state();
        if !state.wants_to_pause || self.pause.is_paused() {
            return;
        }

        let outcome = self.pause.request_pause();
        if outcome.accepted() {
            state.paused_by_us = true;
            log::info!("Deferred pause request accepted ({:?})", outcome);
        }
    }

    fn arm_deadline(&self, state: &mut EpisodeState, window: Duration) {
        if let Some(previous) = state.deadline.take() {
            previous.task.abort();
        }
        state.generation += 1;
        state.tracking_window = true;

        let generation = state.generation;
        let weak = self.weak_self.clone();
        let task = tauri::async_runtime::spawn(async move {
            tokio::time::sleep(window).await;
            if let Some(controller) = weak.upgrade() {
                controller.deadline_elapsed(generation);
            }
        });
        state.deadline = Some(DeadlineHandle { generation, task });
        log::debug!(
            "Auto-unpause window armed for {:.1}s (generation {})",
            window.as_secs_f32(),
            generation
        );
    }

    /// Deadline callback: the auto-unpause privilege expires after the
    /// window elapses without refocus. The pause itself stays in place until
    /// focus returns.
    pub(crate) fn deadline_elapsed(&self, generation: u64) {
        let mut state = self.lock_state();
        let armed = state.deadline.as_ref().map(|d| d.generation);
        if armed == Some(generation) {
            state.deadline = None;
            state.tracking_window = false;
            log::debug!("Auto-unpause window elapsed; refocus will no longer auto-resume");
        }
    }

    pub fn status(&self) -> ControllerStatus {
        let state = self.lock_state();
        ControllerStatus {
            paused_by_us: state.paused_by_us,
            wants_to_pause: state.wants_to_pause,
            tracking_window: state.tracking_window,
        }
    }

    /// Cancel any pending timer and reset the episode. Called on app exit.
    pub fn shutdown(&self) {
        let mut state = self.lock_state();
        if let Some(deadline) = state.deadline.take() {
            deadline.task.abort();
        }
        let generation = state.generation;
        *state = EpisodeState {
            generation,
            ..EpisodeState::default()
        };
        log::debug!("Focus reaction controller shut down");
    }

    fn lock_state(&self) -> MutexGuard<'_, EpisodeState> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Recovering from poisoned focus state lock");
                poisoned.into_inner()
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn deadline_generation(&self) -> Option<u64> {
        self.lock_state().deadline.as_ref().map(|d| d.generation)
    }
}
