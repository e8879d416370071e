use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use thiserror::Error;

/// Smallest accepted auto-unpause window, in seconds.
pub const MIN_UNPAUSE_WINDOW_SECS: f32 = 0.0;
/// Largest accepted auto-unpause window, in seconds.
pub const MAX_UNPAUSE_WINDOW_SECS: f32 = 30.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings store unavailable: {0}")]
    Store(String),
    #[error("failed to persist settings: {0}")]
    Persist(String),
}

/// Focus reaction settings, replaced as a whole unit on every update.
///
/// A window of 0 means "always unpause when focus returns"; a positive window
/// only honors refocus within that many seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusSettings {
    pub auto_pause: bool,
    pub auto_unpause: bool,
    pub unpause_window_secs: f32,
    pub auto_mute: bool,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            auto_pause: true,
            auto_unpause: true,
            unpause_window_secs: 3.0,
            auto_mute: true,
        }
    }
}

impl FocusSettings {
    /// Clamp the window into its accepted range. Non-finite input (a corrupt
    /// store entry, or a hand-edited file) falls back to the default.
    pub fn clamped(mut self) -> Self {
        if self.unpause_window_secs.is_finite() {
            self.unpause_window_secs = self
                .unpause_window_secs
                .clamp(MIN_UNPAUSE_WINDOW_SECS, MAX_UNPAUSE_WINDOW_SECS);
        } else {
            log::warn!(
                "Ignoring non-finite auto-unpause window {:?}; using default",
                self.unpause_window_secs
            );
            self.unpause_window_secs = Self::default().unpause_window_secs;
        }
        self
    }
}

/// Holds the live settings snapshot for the controller.
///
/// The controller reads `current()` on every signal and never caches values
/// across signals; `replace()` swaps the whole snapshot so readers always see
/// a fully-formed value.
pub struct SettingsStore {
    inner: RwLock<FocusSettings>,
}

impl SettingsStore {
    pub fn new(initial: FocusSettings) -> Self {
        Self {
            inner: RwLock::new(initial.clamped()),
        }
    }

    pub fn current(&self) -> FocusSettings {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn replace(&self, next: FocusSettings) {
        let next = next.clamped();
        match self.inner.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => {
                log::warn!("Recovering from poisoned settings lock");
                *poisoned.into_inner() = next;
            }
        }
        log::debug!("Focus settings replaced: {:?}", next);
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(FocusSettings::default())
    }
}
