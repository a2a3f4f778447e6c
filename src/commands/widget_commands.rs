use tokio::sync::oneshot;

use crate::app::{AppEvent, EventBus, WidgetSnapshot};

fn dispatch(bus: &EventBus, event: AppEvent) -> Result<(), String> {
    if bus.send(event) {
        Ok(())
    } else {
        Err("event loop is not running".to_string())
    }
}

/// Clicking the fish shows or hides the counters below it.
#[tauri::command]
pub fn toggle_info(bus: tauri::State<'_, EventBus>) -> Result<(), String> {
    dispatch(&bus, AppEvent::ToggleInfo)
}

#[tauri::command]
pub fn toggle_fullscreen(bus: tauri::State<'_, EventBus>) -> Result<(), String> {
    dispatch(&bus, AppEvent::ToggleFullscreen)
}

#[tauri::command]
pub fn hide_to_tray(bus: tauri::State<'_, EventBus>) -> Result<(), String> {
    dispatch(&bus, AppEvent::HideToTray)
}

/// Current frame, visibility and counters, for the page's first paint.
#[tauri::command]
pub async fn widget_snapshot(bus: tauri::State<'_, EventBus>) -> Result<WidgetSnapshot, String> {
    let (tx, rx) = oneshot::channel();
    dispatch(&bus, AppEvent::Snapshot(tx))?;
    rx.await
        .map_err(|_| "event loop dropped the snapshot request".to_string())
}
