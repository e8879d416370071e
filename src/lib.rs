use std::sync::Arc;

use tauri::Manager;

mod commands;
mod focus;
mod media;
mod settings;
mod state;

#[cfg(test)]
mod tests;

use commands::{focus::*, settings::*};
use media::{MediaPauseController, WebviewMuteController};
use state::AppState;

/// Label of the window whose focus transitions drive the controller.
const MAIN_WINDOW: &str = "main";

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .plugin(
            tauri_plugin_log::Builder::new()
                .level(log::LevelFilter::Info)
                .build(),
        )
        .setup(|app| {
            let handle = app.handle();

            let initial = match commands::settings::read_focus_settings(handle) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Falling back to default focus settings: {}", e);
                    settings::FocusSettings::default()
                }
            };
            log::info!("Loaded focus settings: {:?}", initial);

            let app_state = AppState::new(initial);

            // Default host bindings. An embedder with its own playback engine
            // rebinds these through `HostCapabilities`.
            app_state
                .capabilities
                .bind_pause(Arc::new(MediaPauseController::new()));
            app_state
                .capabilities
                .bind_mute(Arc::new(WebviewMuteController::new(handle.clone())));

            // The pause request is retried here until the host takes it or a
            // refocus cancels it.
            let controller = Arc::clone(&app_state.controller);
            let tick_task = tauri::async_runtime::spawn(async move {
                let mut interval = tokio::time::interval(focus::controller::TICK_INTERVAL);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                loop {
                    interval.tick().await;
                    controller.tick();
                }
            });
            app_state.set_tick_task(tick_task);

            app.manage(app_state);
            log::info!("Focus reaction controller running");

            Ok(())
        })
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Focused(focused) = event {
                if window.label() != MAIN_WINDOW {
                    return;
                }
                match window.app_handle().try_state::<AppState>() {
                    Some(app_state) => app_state.controller.handle_focus_change(*focused),
                    None => log::debug!("Focus event before app state is ready; ignoring"),
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            get_focus_settings,
            save_focus_settings,
            focus_status,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app, event| {
            if let tauri::RunEvent::Exit = event {
                app.state::<AppState>().shutdown();
            }
        });
}
