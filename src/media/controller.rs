//! Cross-platform system media pause adapter.
//!
//! Default binding for the pause capability: drives the system's now-playing
//! session. Every probing failure degrades to "not paused" / unavailable.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::focus::{PauseCapability, PauseOutcome};

/// Pause capability backed by the platform media transport controls.
pub struct MediaPauseController {
    /// Last state we believe we drove the player into. Only consulted on
    /// platforms that cannot query playback state (see the Windows notes).
    assumed_paused: AtomicBool,
}

impl Default for MediaPauseController {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaPauseController {
    pub fn new() -> Self {
        Self {
            assumed_paused: AtomicBool::new(false),
        }
    }
}

impl PauseCapability for MediaPauseController {
    fn is_paused(&self) -> bool {
        #[cfg(target_os = "macos")]
        {
            self.query_paused_macos()
        }

        #[cfg(not(target_os = "macos"))]
        {
            // No reliable query on these platforms; answer from our own
            // bookkeeping (never set where requests are unavailable).
            self.assumed_paused.load(Ordering::SeqCst)
        }
    }

    fn request_pause(&self) -> PauseOutcome {
        #[cfg(target_os = "macos")]
        {
            self.pause_macos()
        }

        #[cfg(target_os = "windows")]
        {
            self.pause_windows()
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            log::debug!("Media pause not supported on this platform");
            PauseOutcome::Unavailable
        }
    }

    fn request_unpause(&self) -> PauseOutcome {
        #[cfg(target_os = "macos")]
        {
            self.unpause_macos()
        }

        #[cfg(target_os = "windows")]
        {
            self.unpause_windows()
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            log::debug!("Media unpause not supported on this platform");
            PauseOutcome::Unavailable
        }
    }
}

// ============================================
// macOS Implementation (media-remote crate)
// ============================================
#[cfg(target_os = "macos")]
impl MediaPauseController {
    fn query_paused_macos(&self) -> bool {
        use media_remote::{Controller, NowPlayingPerl};

        let now_playing = NowPlayingPerl::new();
        let guard = now_playing.get_info();
        match guard.as_ref() {
            // Paused only when a session exists and reports not playing;
            // unknown state is treated as not paused.
            Some(info) => info.is_playing == Some(false),
            None => false,
        }
    }

    fn pause_macos(&self) -> PauseOutcome {
        use media_remote::{Controller, NowPlayingPerl};

        let now_playing = NowPlayingPerl::new();
        if now_playing.pause() {
            log::info!("🎵 Media paused");
            self.assumed_paused.store(true, Ordering::SeqCst);
            PauseOutcome::Applied
        } else {
            log::warn!("⚠️ Failed to pause media");
            PauseOutcome::Unavailable
        }
    }

    fn unpause_macos(&self) -> PauseOutcome {
        use media_remote::{Controller, NowPlayingPerl};

        let now_playing = NowPlayingPerl::new();
        if now_playing.play() {
            log::info!("🎵 Media resumed");
            self.assumed_paused.store(false, Ordering::SeqCst);
            PauseOutcome::Applied
        } else {
            log::warn!("⚠️ Failed to resume media");
            PauseOutcome::Unavailable
        }
    }
}

// ============================================
// Windows Implementation (Media Key Simulation)
// ============================================
// Note: Windows uses key simulation (VK_MEDIA_PLAY_PAUSE) which toggles
// playback, and playback state cannot be queried without complex WinRT APIs.
// The adapter tracks the state it believes it produced and answers
// `is_paused` from that. This is a known limitation.
#[cfg(target_os = "windows")]
impl MediaPauseController {
    fn pause_windows(&self) -> PauseOutcome {
        log::info!("🎵 Sending media pause key (Windows)...");

        if self.send_media_play_pause_key() {
            self.assumed_paused.store(true, Ordering::SeqCst);
            PauseOutcome::Applied
        } else {
            log::warn!("⚠️ Failed to send media key");
            PauseOutcome::Unavailable
        }
    }

    fn unpause_windows(&self) -> PauseOutcome {
        log::info!("🎵 Sending media play key (Windows)...");

        if self.send_media_play_pause_key() {
            self.assumed_paused.store(false, Ordering::SeqCst);
            PauseOutcome::Applied
        } else {
            log::warn!("⚠️ Failed to send media key");
            PauseOutcome::Unavailable
        }
    }

    fn send_media_play_pause_key(&self) -> bool {
        use windows::Win32::UI::Input::KeyboardAndMouse::{
            SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
            KEYEVENTF_KEYUP, VIRTUAL_KEY,
        };

        const VK_MEDIA_PLAY_PAUSE: u16 = 0xB3;

        let mut inputs = [
            // Key down
            INPUT {
                r#type: INPUT_KEYBOARD,
                Anonymous: INPUT_0 {
                    ki: KEYBDINPUT {
                        wVk: VIRTUAL_KEY(VK_MEDIA_PLAY_PAUSE),
                        wScan: 0,
                        dwFlags: KEYBD_EVENT_FLAGS(0),
                        time: 0,
                        dwExtraInfo: 0,
                    },
                },
            },
            // Key up
            INPUT {
                r#type: INPUT_KEYBOARD,
                Anonymous: INPUT_0 {
                    ki: KEYBDINPUT {
                        wVk: VIRTUAL_KEY(VK_MEDIA_PLAY_PAUSE),
                        wScan: 0,
                        dwFlags: KEYEVENTF_KEYUP,
                        time: 0,
                        dwExtraInfo: 0,
                    },
                },
            },
        ];

        let sent = unsafe { SendInput(&mut inputs, std::mem::size_of::<INPUT>() as i32) };

        sent == 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_starts_unpaused() {
        let controller = MediaPauseController::new();
        assert!(!controller.assumed_paused.load(Ordering::SeqCst));
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    #[test]
    fn test_unsupported_platform_degrades_to_unavailable() {
        let controller = MediaPauseController::new();
        assert!(!controller.is_paused());
        assert_eq!(controller.request_pause(), PauseOutcome::Unavailable);
        assert_eq!(controller.request_unpause(), PauseOutcome::Unavailable);
        // A failed request must not claim the paused state.
        assert!(!controller.is_paused());
    }
}
