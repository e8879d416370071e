use tauri::{AppHandle, Manager};

use crate::focus::ControllerStatus;
use crate::state::AppState;

#[tauri::command]
pub async fn focus_status(app: AppHandle) -> Result<ControllerStatus, String> {
    Ok(app.state::<AppState>().controller.status())
}
