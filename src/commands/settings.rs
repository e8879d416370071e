use serde_json::json;
use tauri::{AppHandle, Manager};
use tauri_plugin_store::StoreExt;

use crate::settings::{FocusSettings, SettingsError};
use crate::state::AppState;

/// Store file holding the persisted focus settings.
pub const SETTINGS_STORE: &str = "settings";

const KEY_AUTO_PAUSE: &str = "enable_auto_pause";
const KEY_AUTO_UNPAUSE: &str = "enable_auto_unpause";
const KEY_UNPAUSE_WINDOW: &str = "auto_unpause_window";
const KEY_AUTO_MUTE: &str = "enable_auto_mute";

/// Read the persisted settings, falling back to defaults for missing or
/// malformed keys. Out-of-range windows are clamped on the way in.
pub fn read_focus_settings(app: &AppHandle) -> Result<FocusSettings, SettingsError> {
    let store = app
        .store(SETTINGS_STORE)
        .map_err(|e| SettingsError::Store(e.to_string()))?;
    let defaults = FocusSettings::default();

    let settings = FocusSettings {
        auto_pause: store
            .get(KEY_AUTO_PAUSE)
            .and_then(|v| v.as_bool())
            .unwrap_or(defaults.auto_pause),
        auto_unpause: store
            .get(KEY_AUTO_UNPAUSE)
            .and_then(|v| v.as_bool())
            .unwrap_or(defaults.auto_unpause),
        unpause_window_secs: store
            .get(KEY_UNPAUSE_WINDOW)
            .and_then(|v| v.as_f64())
            .map(|n| n as f32)
            .unwrap_or(defaults.unpause_window_secs),
        auto_mute: store
            .get(KEY_AUTO_MUTE)
            .and_then(|v| v.as_bool())
            .unwrap_or(defaults.auto_mute),
    };

    Ok(settings.clamped())
}

#[tauri::command]
pub async fn get_focus_settings(app: AppHandle) -> Result<FocusSettings, String> {
    read_focus_settings(&app).map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn save_focus_settings(app: AppHandle, settings: FocusSettings) -> Result<(), String> {
    let settings = settings.clamped();
    let previous = read_focus_settings(&app).unwrap_or_default();

    let store = app
        .store(SETTINGS_STORE)
        .map_err(|e| SettingsError::Store(e.to_string()).to_string())?;

    store.set(KEY_AUTO_PAUSE, json!(settings.auto_pause));
    store.set(KEY_AUTO_UNPAUSE, json!(settings.auto_unpause));
    store.set(KEY_UNPAUSE_WINDOW, json!(settings.unpause_window_secs));
    store.set(KEY_AUTO_MUTE, json!(settings.auto_mute));
    store
        .save()
        .map_err(|e| SettingsError::Persist(e.to_string()).to_string())?;

    log_changed_keys(&previous, &settings);

    // Push the new snapshot to the running controller; it reads the latest
    // value on the next signal.
    let state = app.state::<AppState>();
    state.settings.replace(settings);

    Ok(())
}

fn log_changed_keys(previous: &FocusSettings, next: &FocusSettings) {
    if previous.auto_pause != next.auto_pause {
        log::info!("Setting changed: {} -> {}", KEY_AUTO_PAUSE, next.auto_pause);
    }
    if previous.auto_unpause != next.auto_unpause {
        log::info!(
            "Setting changed: {} -> {}",
            KEY_AUTO_UNPAUSE,
            next.auto_unpause
        );
    }
    if previous.unpause_window_secs != next.unpause_window_secs {
        log::info!(
            "Setting changed: {} -> {}",
            KEY_UNPAUSE_WINDOW,
            next.unpause_window_secs
        );
    }
    if previous.auto_mute != next.auto_mute {
        log::info!("Setting changed: {} -> {}", KEY_AUTO_MUTE, next.auto_mute);
    }
}
