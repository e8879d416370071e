use std::sync::{Arc, Mutex};

use crate::focus::{FocusReactionController, HostCapabilities, MuteCapability, PauseCapability};
use crate::settings::{FocusSettings, SettingsStore};

/// Application state - managed by Tauri (runtime state only)
pub struct AppState {
    pub settings: Arc<SettingsStore>,
    pub capabilities: Arc<HostCapabilities>,
    pub controller: Arc<FocusReactionController>,
    pub tick_task: Mutex<Option<tauri::async_runtime::JoinHandle<()>>>,
}

impl AppState {
    pub fn new(initial: FocusSettings) -> Self {
        let settings = Arc::new(SettingsStore::new(initial));
        let capabilities = Arc::new(HostCapabilities::new());
        let controller = FocusReactionController::new(
            Arc::clone(&settings),
            Arc::clone(&capabilities) as Arc<dyn PauseCapability>,
            Arc::clone(&capabilities) as Arc<dyn MuteCapability>,
        );

        Self {
            settings,
            capabilities,
            controller,
            tick_task: Mutex::new(None),
        }
    }

    pub fn set_tick_task(&self, task: tauri::async_runtime::JoinHandle<()>) {
        match self.tick_task.lock() {
            Ok(mut guard) => {
                if let Some(old_task) = guard.take() {
                    old_task.abort();
                    log::debug!("Aborted previous tick task");
                }
                *guard = Some(task);
            }
            Err(_) => log::error!("Failed to acquire tick task lock"),
        }
    }

    /// Stop the tick loop and tear the controller down. Called on app exit.
    pub fn shutdown(&self) {
        if let Ok(mut guard) = self.tick_task.lock() {
            if let Some(task) = guard.take() {
                task.abort();
            }
        }
        self.controller.shutdown();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FocusSettings::default())
    }
}
