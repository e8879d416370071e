use tauri::{AppHandle, Emitter};

use crate::focus::MuteCapability;

/// Event carrying the desired mute state to every webview. The frontend
/// applies it to its `<audio>`/`<video>` elements.
pub const MUTE_EVENT: &str = "audio-mute-changed";

/// Mute capability that asks the frontend to mute its media elements.
pub struct WebviewMuteController {
    app_handle: AppHandle,
}

impl WebviewMuteController {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl MuteCapability for WebviewMuteController {
    fn set_muted(&self, muted: bool) {
        log::debug!("Setting webview mute: {}", muted);
        if let Err(e) = self.app_handle.emit(MUTE_EVENT, muted) {
            log::warn!("Failed to emit '{}' event: {}", MUTE_EVENT, e);
        }
    }
}
