use std::sync::Arc;

use tauri::{
    menu::{Menu, MenuItem},
    tray::{MouseButton, TrayIcon, TrayIconBuilder, TrayIconEvent},
    AppHandle,
};

use crate::app::{AppEvent, EventBus};
use crate::error::MuyuError;
use crate::host::{TrayFactory, TrayHost};
use crate::services::config::Labels;
use crate::services::tray_icon::TrayIconImage;

const TRAY_ID: &str = "muyu";
const MENU_SHOW: &str = "show";
const MENU_QUIT: &str = "quit";

/// Builds the tray shown while the widget is hidden. Menu clicks and
/// double-clicks only post events to the loop.
pub(crate) struct TauriTrayFactory {
    app: AppHandle,
    bus: EventBus,
    labels: Labels,
}

impl TauriTrayFactory {
    pub(crate) fn new(app: AppHandle, bus: EventBus, labels: Labels) -> Self {
        Self { app, bus, labels }
    }

    fn build(&self, icon: &TrayIconImage, tooltip: &str) -> tauri::Result<TrayIcon> {
        let show_i = MenuItem::with_id(
            &self.app,
            MENU_SHOW,
            &self.labels.menu_show,
            true,
            None::<&str>,
        )?;
        let quit_i = MenuItem::with_id(
            &self.app,
            MENU_QUIT,
            &self.labels.menu_exit,
            true,
            None::<&str>,
        )?;
        let menu = Menu::with_items(&self.app, &[&show_i, &quit_i])?;

        let menu_bus = self.bus.clone();
        let click_bus = self.bus.clone();

        TrayIconBuilder::with_id(TRAY_ID)
            .icon(icon.to_tauri())
            .tooltip(tooltip)
            .menu(&menu)
            .show_menu_on_left_click(false)
            .on_menu_event(move |_app, event| match event.id().as_ref() {
                MENU_SHOW => {
                    menu_bus.send(AppEvent::ShowFromTray);
                }
                MENU_QUIT => {
                    menu_bus.send(AppEvent::Exit);
                }
                _ => {}
            })
            .on_tray_icon_event(move |_tray, event| {
                if let TrayIconEvent::DoubleClick {
                    button: MouseButton::Left,
                    ..
                } = event
                {
                    click_bus.send(AppEvent::ShowFromTray);
                }
            })
            .build(&self.app)
    }
}

impl TrayFactory for TauriTrayFactory {
    fn create(
        &self,
        icon: &TrayIconImage,
        tooltip: &str,
    ) -> Result<Arc<dyn TrayHost>, MuyuError> {
        let tray = self
            .build(icon, tooltip)
            .map_err(|err| MuyuError::tray(format!("tray creation failed: {err}")))?;
        Ok(Arc::new(TauriTray {
            app: self.app.clone(),
            tray,
        }))
    }
}

// Tauri tray handles marshal every call onto the main thread, so the tooltip
// updater may use them directly.
struct TauriTray {
    app: AppHandle,
    tray: TrayIcon,
}

impl TrayHost for TauriTray {
    fn set_icon(&self, icon: &TrayIconImage) -> Result<(), MuyuError> {
        self.tray
            .set_icon(Some(icon.to_tauri()))
            .map_err(|err| MuyuError::tray(err.to_string()))
    }

    fn set_tooltip(&self, text: &str) -> Result<(), MuyuError> {
        self.tray
            .set_tooltip(Some(text))
            .map_err(|err| MuyuError::tray(err.to_string()))
    }

    fn remove(&self) -> Result<(), MuyuError> {
        let hidden = self
            .tray
            .set_visible(false)
            .map_err(|err| MuyuError::tray(err.to_string()));
        let _ = self.app.remove_tray_by_id(TRAY_ID);
        hidden
    }
}
