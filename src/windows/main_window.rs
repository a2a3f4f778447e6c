use tauri::{Emitter, Manager};

use crate::error::MuyuError;
use crate::host::{Frame, InfoPanel, WindowHost};
use crate::services::screen_layout::{ScreenRect, WindowGeometry};

pub const MAIN_WINDOW_LABEL: &str = "main";

pub const EVT_FRAME: &str = "muyu://frame";
pub const EVT_INFO: &str = "muyu://info";

/// The widget window: the fish image, two buttons and the info panel.
pub struct MainWindow {
    window: tauri::WebviewWindow,
}

impl MainWindow {
    pub fn from_app(app: &tauri::AppHandle) -> Result<Self, MuyuError> {
        app.get_webview_window(MAIN_WINDOW_LABEL)
            .map(|window| Self { window })
            .ok_or_else(|| MuyuError::internal("main window missing"))
    }

    /// Borderless, topmost, out of the taskbar. Unsupported flags degrade silently.
    pub fn apply_widget_chrome(&self) {
        if let Err(err) = self.window.set_decorations(false) {
            log::warn!("cannot remove decorations: {err}");
        }
        if let Err(err) = self.window.set_always_on_top(true) {
            log::warn!("cannot keep widget on top: {err}");
        }
        if let Err(err) = self.window.set_skip_taskbar(true) {
            log::warn!("cannot hide widget from taskbar: {err}");
        }
    }
}

impl WindowHost for MainWindow {
    fn geometry(&self) -> Result<WindowGeometry, MuyuError> {
        let pos = self.window.outer_position()?;
        let size = self.window.inner_size()?;
        Ok(WindowGeometry {
            x: pos.x,
            y: pos.y,
            width: size.width,
            height: size.height,
        })
    }

    fn set_geometry(&self, geometry: WindowGeometry) -> Result<(), MuyuError> {
        self.window
            .set_position(tauri::Position::Physical(tauri::PhysicalPosition {
                x: geometry.x,
                y: geometry.y,
            }))?;
        self.window
            .set_size(tauri::Size::Physical(tauri::PhysicalSize {
                width: geometry.width,
                height: geometry.height,
            }))?;
        Ok(())
    }

    fn is_decorated(&self) -> Result<bool, MuyuError> {
        Ok(self.window.is_decorated()?)
    }

    fn set_decorated(&self, decorated: bool) -> Result<(), MuyuError> {
        Ok(self.window.set_decorations(decorated)?)
    }

    fn monitors(&self) -> Result<Vec<ScreenRect>, MuyuError> {
        let monitors = self.window.available_monitors()?;
        Ok(monitors
            .iter()
            .map(|m| ScreenRect {
                x: m.position().x,
                y: m.position().y,
                width: m.size().width,
                height: m.size().height,
            })
            .collect())
    }

    fn hide(&self) -> Result<(), MuyuError> {
        if let Err(err) = self.window.set_skip_taskbar(true) {
            log::warn!("cannot hide widget from taskbar: {err}");
        }
        Ok(self.window.hide()?)
    }

    fn show(&self) -> Result<(), MuyuError> {
        self.window.show()?;
        if let Err(err) = self.window.set_always_on_top(true) {
            log::warn!("cannot keep widget on top: {err}");
        }
        if let Err(err) = self.window.set_focus() {
            log::warn!("cannot focus widget: {err}");
        }
        Ok(())
    }

    fn show_frame(&self, frame: Frame) -> Result<(), MuyuError> {
        Ok(self.window.emit(EVT_FRAME, frame)?)
    }

    fn show_info(&self, info: &InfoPanel) -> Result<(), MuyuError> {
        Ok(self.window.emit(EVT_INFO, info)?)
    }
}
