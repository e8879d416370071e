//! Default host bindings for the focus reaction capabilities.
//!
//! Uses platform-specific APIs:
//! - macOS: `media-remote` crate (MediaRemote.framework via Perl adapter)
//! - Windows: `windows` crate (media key injection)
//! - mute: Tauri event emission to the app's webviews

mod controller;
mod mute;

pub use controller::MediaPauseController;
pub use mute::{WebviewMuteController, MUTE_EVENT};
