//! Seams to the platform: the main window and the system tray.
//!
//! The Tauri implementations live in `windows::main_window` and `tray`; the event
//! loop only ever talks to these traits.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::MuyuError;
use crate::services::screen_layout::{ScreenRect, WindowGeometry};
use crate::services::tray_icon::TrayIconImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frame {
    Idle,
    Hit,
}

/// Content of the info panel below the fish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoPanel {
    pub visible: bool,
    pub hits: u64,
    pub elapsed_secs: u64,
    pub hits_text: String,
    pub elapsed_text: String,
}

pub trait WindowHost: Send + Sync + 'static {
    fn geometry(&self) -> Result<WindowGeometry, MuyuError>;
    fn set_geometry(&self, geometry: WindowGeometry) -> Result<(), MuyuError>;
    fn is_decorated(&self) -> Result<bool, MuyuError>;
    fn set_decorated(&self, decorated: bool) -> Result<(), MuyuError>;
    fn monitors(&self) -> Result<Vec<ScreenRect>, MuyuError>;
    /// Hide from screen and taskbar.
    fn hide(&self) -> Result<(), MuyuError>;
    /// Show, raise and focus.
    fn show(&self) -> Result<(), MuyuError>;
    fn show_frame(&self, frame: Frame) -> Result<(), MuyuError>;
    fn show_info(&self, info: &InfoPanel) -> Result<(), MuyuError>;
}

pub trait TrayHost: Send + Sync + 'static {
    fn set_icon(&self, icon: &TrayIconImage) -> Result<(), MuyuError>;
    fn set_tooltip(&self, text: &str) -> Result<(), MuyuError>;
    fn remove(&self) -> Result<(), MuyuError>;
}

pub trait TrayFactory: Send + Sync + 'static {
    fn create(
        &self,
        icon: &TrayIconImage,
        tooltip: &str,
    ) -> Result<Arc<dyn TrayHost>, MuyuError>;
}
