use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::MuyuError;
use crate::host::{InfoPanel, TrayFactory, TrayHost, WindowHost};
use crate::services::config::render_label;
use crate::services::screen_layout::{monitor_for_window, WindowGeometry};
use crate::services::tray_icon::TrayIconImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityState {
    Normal,
    Fullscreen,
    Hidden,
}

/// What the tooltip updater reads. Hits arrive through a watch channel so the
/// updater never touches loop-owned state.
#[derive(Clone)]
pub struct TooltipFeed {
    pub hits: watch::Receiver<u64>,
    pub started: Instant,
    pub template: String,
    pub interval: Duration,
}

impl TooltipFeed {
    pub fn render(&self) -> String {
        let hits = *self.hits.borrow();
        render_label(&self.template, hits, self.started.elapsed().as_secs())
    }
}

/// A live tray plus the task refreshing its tooltip. Both end together.
struct TraySession {
    host: Arc<dyn TrayHost>,
    cancel: CancellationToken,
    updater: JoinHandle<()>,
}

impl TraySession {
    fn start(host: Arc<dyn TrayHost>, feed: TooltipFeed) -> Self {
        let cancel = CancellationToken::new();
        let updater = tokio::spawn(tooltip_loop(host.clone(), feed, cancel.clone()));
        Self {
            host,
            cancel,
            updater,
        }
    }

    async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.updater.await {
            log::warn!("tray tooltip updater failed to join: {err}");
        }
        if let Err(err) = self.host.remove() {
            log::warn!("tray removal failed: {err}");
        }
    }
}

async fn tooltip_loop(host: Arc<dyn TrayHost>, feed: TooltipFeed, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval_at(Instant::now() + feed.interval, feed.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if cancel.is_cancelled() {
                    break;
                }
                if let Err(err) = host.set_tooltip(&feed.render()) {
                    log::warn!("tray tooltip update failed: {err}");
                }
            }
        }
    }
    log::debug!("tray tooltip updater stopped");
}

pub struct VisibilityController {
    state: VisibilityState,
    last_geometry: Option<WindowGeometry>,
    restore_decorated: bool,
    info_visible: bool,
    tray: Option<TraySession>,
}

impl Default for VisibilityController {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityController {
    pub fn new() -> Self {
        Self {
            state: VisibilityState::Normal,
            last_geometry: None,
            restore_decorated: false,
            info_visible: false,
            tray: None,
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn info_visible(&self) -> bool {
        self.info_visible
    }

    pub fn last_geometry(&self) -> Option<WindowGeometry> {
        self.last_geometry
    }

    pub fn tray(&self) -> Option<&dyn TrayHost> {
        self.tray.as_ref().map(|session| session.host.as_ref())
    }

    pub fn toggle_fullscreen<W: WindowHost>(&mut self, window: &W) -> Result<(), MuyuError> {
        match self.state {
            VisibilityState::Normal => self.enter_fullscreen(window),
            VisibilityState::Fullscreen => self.leave_fullscreen(window),
            VisibilityState::Hidden => {
                log::debug!("fullscreen toggle ignored while hidden");
                Ok(())
            }
        }
    }

    fn enter_fullscreen<W: WindowHost>(&mut self, window: &W) -> Result<(), MuyuError> {
        let geometry = window.geometry()?;
        let monitors = window.monitors()?;
        let target = monitor_for_window(geometry, &monitors)
            .ok_or_else(|| MuyuError::platform("no monitors available"))?;

        let decorated = window.is_decorated().unwrap_or_else(|err| {
            log::warn!("cannot read window decorations: {err}");
            false
        });
        if decorated {
            platform_call("remove decorations", window.set_decorated(false));
        }

        if let Err(err) = window.set_geometry(target.as_geometry()) {
            if decorated {
                platform_call("restore decorations", window.set_decorated(true));
            }
            return Err(err);
        }

        self.last_geometry = Some(geometry);
        self.restore_decorated = decorated;
        self.state = VisibilityState::Fullscreen;
        log::info!(
            "fullscreen on monitor at ({}, {}) {}x{}",
            target.x,
            target.y,
            target.width,
            target.height
        );
        Ok(())
    }

    fn leave_fullscreen<W: WindowHost>(&mut self, window: &W) -> Result<(), MuyuError> {
        if self.restore_decorated {
            platform_call("restore decorations", window.set_decorated(true));
        }
        self.state = VisibilityState::Normal;

        match self.last_geometry {
            Some(geometry) => window.set_geometry(geometry),
            None => Ok(()),
        }
    }

    /// Normal/Fullscreen → Hidden. On tray failure the window is shown again and
    /// the controller stays out of `Hidden`.
    pub fn hide_to_tray<W: WindowHost, F: TrayFactory>(
        &mut self,
        window: &W,
        trays: &F,
        icon: &TrayIconImage,
        feed: TooltipFeed,
    ) -> Result<(), MuyuError> {
        match self.state {
            VisibilityState::Hidden => {
                log::debug!("already hidden to tray");
                return Ok(());
            }
            VisibilityState::Fullscreen => {
                if let Err(err) = self.leave_fullscreen(window) {
                    log::warn!("leaving fullscreen before hiding failed: {err}");
                }
            }
            VisibilityState::Normal => {}
        }

        window.hide()?;

        match trays.create(icon, &feed.render()) {
            Ok(host) => {
                self.tray = Some(TraySession::start(host, feed));
                self.state = VisibilityState::Hidden;
                log::info!("hidden to tray");
                Ok(())
            }
            Err(err) => {
                platform_call("show window after tray failure", window.show());
                Err(err)
            }
        }
    }

    /// Hidden → Normal. The tooltip updater is joined before this returns.
    /// If the window cannot be shown the tray stays, so the user can retry or exit.
    pub async fn show_from_tray<W: WindowHost>(&mut self, window: &W) -> Result<(), MuyuError> {
        if self.state != VisibilityState::Hidden {
            log::debug!("show requested while {:?}", self.state);
            return Ok(());
        }

        window.show()?;
        if let Some(session) = self.tray.take() {
            session.shutdown().await;
        }
        self.state = VisibilityState::Normal;
        log::info!("restored from tray");
        Ok(())
    }

    /// Tear down the tray for process exit.
    pub async fn shutdown(&mut self) {
        if let Some(session) = self.tray.take() {
            session.shutdown().await;
        }
    }

    /// Flip the info panel and re-apply the window's geometry, which content
    /// changes would otherwise resize.
    pub fn toggle_info<W: WindowHost>(
        &mut self,
        window: &W,
        panel: impl FnOnce(bool) -> InfoPanel,
    ) -> Result<(), MuyuError> {
        let geometry = window.geometry()?;
        // A fullscreen snapshot here would make leaving fullscreen a no-op.
        if self.state == VisibilityState::Normal {
            self.last_geometry = Some(geometry);
        }

        self.info_visible = !self.info_visible;
        let shown = window.show_info(&panel(self.info_visible));
        window.set_geometry(geometry)?;
        shown
    }
}

fn platform_call(what: &str, result: Result<(), MuyuError>) {
    if let Err(err) = result {
        log::warn!("{what} failed: {err}");
    }
}
