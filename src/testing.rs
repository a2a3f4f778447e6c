//! Recording doubles for the platform seams.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard,
};

use crate::error::MuyuError;
use crate::host::{Frame, InfoPanel, TrayFactory, TrayHost, WindowHost};
use crate::services::screen_layout::{ScreenRect, WindowGeometry};
use crate::services::tray_icon::{TrayIconImage, TrayIcons};

pub(crate) fn geometry(x: i32, y: i32, width: u32, height: u32) -> WindowGeometry {
    WindowGeometry {
        x,
        y,
        width,
        height,
    }
}

pub(crate) fn screen(x: i32, y: i32, width: u32, height: u32) -> ScreenRect {
    ScreenRect {
        x,
        y,
        width,
        height,
    }
}

pub(crate) fn solid_icon(value: u8) -> TrayIconImage {
    TrayIconImage {
        rgba: vec![value, value, value, 255],
        width: 1,
        height: 1,
    }
}

pub(crate) fn test_icons() -> TrayIcons {
    TrayIcons {
        idle: solid_icon(10),
        hit: solid_icon(200),
    }
}

#[derive(Debug)]
pub(crate) struct WindowLog {
    pub geometry: WindowGeometry,
    pub decorated: bool,
    pub visible: bool,
    pub monitors: Vec<ScreenRect>,
    pub frames: Vec<Frame>,
    pub infos: Vec<InfoPanel>,
    pub geometry_writes: usize,
    pub fail_hide: bool,
    pub fail_show: bool,
}

#[derive(Clone)]
pub(crate) struct SpyWindow(Arc<Mutex<WindowLog>>);

impl SpyWindow {
    pub(crate) fn new(geometry: WindowGeometry, monitors: Vec<ScreenRect>) -> Self {
        Self(Arc::new(Mutex::new(WindowLog {
            geometry,
            decorated: false,
            visible: true,
            monitors,
            frames: Vec::new(),
            infos: Vec::new(),
            geometry_writes: 0,
            fail_hide: false,
            fail_show: false,
        })))
    }

    pub(crate) fn single_screen() -> Self {
        Self::new(geometry(100, 100, 240, 240), vec![screen(0, 0, 1920, 1080)])
    }

    pub(crate) fn log(&self) -> MutexGuard<'_, WindowLog> {
        self.0.lock().unwrap()
    }

    pub(crate) fn last_frame(&self) -> Option<Frame> {
        self.log().frames.last().copied()
    }
}

impl WindowHost for SpyWindow {
    fn geometry(&self) -> Result<WindowGeometry, MuyuError> {
        Ok(self.log().geometry)
    }

    fn set_geometry(&self, geometry: WindowGeometry) -> Result<(), MuyuError> {
        let mut log = self.log();
        log.geometry = geometry;
        log.geometry_writes += 1;
        Ok(())
    }

    fn is_decorated(&self) -> Result<bool, MuyuError> {
        Ok(self.log().decorated)
    }

    fn set_decorated(&self, decorated: bool) -> Result<(), MuyuError> {
        self.log().decorated = decorated;
        Ok(())
    }

    fn monitors(&self) -> Result<Vec<ScreenRect>, MuyuError> {
        Ok(self.log().monitors.clone())
    }

    fn hide(&self) -> Result<(), MuyuError> {
        let mut log = self.log();
        if log.fail_hide {
            return Err(MuyuError::platform("hide rejected"));
        }
        log.visible = false;
        Ok(())
    }

    fn show(&self) -> Result<(), MuyuError> {
        let mut log = self.log();
        if log.fail_show {
            return Err(MuyuError::platform("show rejected"));
        }
        log.visible = true;
        Ok(())
    }

    fn show_frame(&self, frame: Frame) -> Result<(), MuyuError> {
        self.log().frames.push(frame);
        Ok(())
    }

    fn show_info(&self, info: &InfoPanel) -> Result<(), MuyuError> {
        self.log().infos.push(info.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct SpyTray {
    pub icons: Mutex<Vec<TrayIconImage>>,
    pub tooltips: Mutex<Vec<String>>,
    pub removed: AtomicBool,
    pub fail_icons: AtomicBool,
    pub writes_after_remove: AtomicUsize,
}

impl SpyTray {
    pub(crate) fn tooltip_count(&self) -> usize {
        self.tooltips.lock().unwrap().len()
    }

    pub(crate) fn last_icon(&self) -> Option<TrayIconImage> {
        self.icons.lock().unwrap().last().cloned()
    }

    fn note_write(&self) {
        if self.removed.load(Ordering::SeqCst) {
            self.writes_after_remove.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl TrayHost for SpyTray {
    fn set_icon(&self, icon: &TrayIconImage) -> Result<(), MuyuError> {
        self.note_write();
        if self.fail_icons.load(Ordering::SeqCst) {
            return Err(MuyuError::tray("icon rejected"));
        }
        self.icons.lock().unwrap().push(icon.clone());
        Ok(())
    }

    fn set_tooltip(&self, text: &str) -> Result<(), MuyuError> {
        self.note_write();
        self.tooltips.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), MuyuError> {
        self.removed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct SpyTrayFactory {
    pub created: Arc<Mutex<Vec<Arc<SpyTray>>>>,
    pub fail_create: Arc<AtomicBool>,
    pub fail_icons: Arc<AtomicBool>,
}

impl SpyTrayFactory {
    pub(crate) fn latest(&self) -> Option<Arc<SpyTray>> {
        self.created.lock().unwrap().last().cloned()
    }
}

impl TrayFactory for SpyTrayFactory {
    fn create(
        &self,
        icon: &TrayIconImage,
        tooltip: &str,
    ) -> Result<Arc<dyn TrayHost>, MuyuError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(MuyuError::tray("no tray host"));
        }
        let tray = Arc::new(SpyTray::default());
        tray.fail_icons
            .store(self.fail_icons.load(Ordering::SeqCst), Ordering::SeqCst);
        tray.icons.lock().unwrap().push(icon.clone());
        tray.tooltips.lock().unwrap().push(tooltip.to_string());
        self.created.lock().unwrap().push(tray.clone());
        Ok(tray)
    }
}
