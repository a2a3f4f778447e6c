//! The event loop and the state it owns.
//!
//! Every mutation happens in `ApplicationState::handle`, one event at a time.
//! Timers, the key listener, Tauri commands and tray callbacks only send
//! `AppEvent`s through the `EventBus`.

mod events;

pub use events::{AppEvent, EventBus};

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::animation::AnimationSync;
use crate::host::{Frame, InfoPanel, TrayFactory, WindowHost};
use crate::merit_store::{MeritStore, PersistedRecord};
use crate::services::config::{render_label, AppConfig, Labels};
use crate::services::tray_icon::TrayIcons;
use crate::session::Session;
use crate::visibility::{TooltipFeed, VisibilityController, VisibilityState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSnapshot {
    pub frame: Frame,
    pub visibility: VisibilityState,
    pub info: InfoPanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

fn info_panel(labels: &Labels, session: &Session, visible: bool) -> InfoPanel {
    let hits = session.hits.total();
    let elapsed_secs = session.clock.elapsed_secs();
    InfoPanel {
        visible,
        hits,
        elapsed_secs,
        hits_text: render_label(&labels.info_hits, hits, elapsed_secs),
        elapsed_text: render_label(&labels.info_elapsed, hits, elapsed_secs),
    }
}

pub struct ApplicationState<W: WindowHost, F: TrayFactory> {
    config: AppConfig,
    store: MeritStore,
    session: Session,
    visibility: VisibilityController,
    animation: AnimationSync,
    window: W,
    trays: F,
    hits_tx: watch::Sender<u64>,
    bus: EventBus,
    timers: CancellationToken,
    final_record: Option<PersistedRecord>,
}

impl<W: WindowHost, F: TrayFactory> ApplicationState<W, F> {
    pub fn new(
        config: AppConfig,
        store: MeritStore,
        record: PersistedRecord,
        window: W,
        trays: F,
        icons: TrayIcons,
        bus: EventBus,
    ) -> Self {
        let session = Session::resume(record);
        let (hits_tx, _) = watch::channel(session.hits.total());
        let animation = AnimationSync::new(icons, config.flash_duration());

        Self {
            config,
            store,
            session,
            visibility: VisibilityController::new(),
            animation,
            window,
            trays,
            hits_tx,
            bus,
            timers: CancellationToken::new(),
            final_record: None,
        }
    }

    /// Autosave and info refresh. Both stop when the loop exits.
    pub fn start_timers(&self) {
        self.bus.send_every(
            self.config.autosave_interval(),
            self.timers.child_token(),
            || AppEvent::Autosave,
        );
        self.bus.send_every(
            self.config.info_refresh_interval(),
            self.timers.child_token(),
            || AppEvent::InfoTick,
        );
    }

    pub async fn handle(&mut self, event: AppEvent) -> LoopControl {
        match event {
            AppEvent::KeyPressed => self.on_key_press(),
            AppEvent::ToggleInfo => {
                let labels = &self.config.labels;
                let session = &self.session;
                if let Err(err) = self
                    .visibility
                    .toggle_info(&self.window, |visible| info_panel(labels, session, visible))
                {
                    log::warn!("info panel toggle failed: {err}");
                }
            }
            AppEvent::ToggleFullscreen => {
                if let Err(err) = self.visibility.toggle_fullscreen(&self.window) {
                    log::warn!("fullscreen toggle failed: {err}");
                }
            }
            AppEvent::HideToTray => self.hide_to_tray(),
            AppEvent::ShowFromTray => {
                if let Err(err) = self.visibility.show_from_tray(&self.window).await {
                    log::warn!("showing window failed: {err}");
                }
            }
            AppEvent::CloseRequested => {
                self.save();
                self.hide_to_tray();
            }
            AppEvent::Exit => {
                self.exit().await;
                return LoopControl::Exit;
            }
            AppEvent::FlashRevert(generation) => {
                self.animation
                    .revert(generation, &self.window, self.visibility.tray());
            }
            AppEvent::Autosave => {
                self.save();
            }
            AppEvent::InfoTick => {
                if self.visibility.info_visible() {
                    self.refresh_info();
                }
            }
            AppEvent::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }
        LoopControl::Continue
    }

    fn on_key_press(&mut self) {
        let total = self.session.hits.increment();
        self.hits_tx.send_replace(total);

        let ticket = self.animation.flash(&self.window, self.visibility.tray());
        self.bus
            .send_after(ticket.revert_after, AppEvent::FlashRevert(ticket.generation));

        if self.visibility.info_visible() {
            self.refresh_info();
        }
    }

    fn hide_to_tray(&mut self) {
        let feed = TooltipFeed {
            hits: self.hits_tx.subscribe(),
            started: self.session.clock.started_at(),
            template: self.config.labels.tooltip.clone(),
            interval: self.config.tooltip_interval(),
        };
        if let Err(err) = self.visibility.hide_to_tray(
            &self.window,
            &self.trays,
            self.animation.tray_icon(),
            feed,
        ) {
            log::error!("hiding to tray failed: {err}");
        }
    }

    fn refresh_info(&self) {
        let panel = info_panel(&self.config.labels, &self.session, true);
        if let Err(err) = self.window.show_info(&panel) {
            log::warn!("info panel refresh failed: {err}");
        }
    }

    fn save(&self) -> PersistedRecord {
        let record = self.session.record();
        match self.store.save(&record) {
            Ok(()) => log::info!(
                "merit saved: hits={}, duration={:.0}s",
                record.total_hits,
                record.total_duration
            ),
            Err(err) => match self.store.path() {
                Some(path) => log::error!("saving merit to {} failed: {err}", path.display()),
                None => log::error!("saving merit failed: {err}"),
            },
        }
        record
    }

    async fn exit(&mut self) {
        let record = self.save();
        self.visibility.shutdown().await;
        self.timers.cancel();
        log::info!("exiting with {} merit", record.total_hits);
        self.final_record = Some(record);
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            frame: self.animation.frame(),
            visibility: self.visibility.state(),
            info: info_panel(
                &self.config.labels,
                &self.session,
                self.visibility.info_visible(),
            ),
        }
    }
}

/// Drive `state` until an `Exit` event; returns the record handed to the store
/// on exit.
pub async fn run_event_loop<W: WindowHost, F: TrayFactory>(
    mut state: ApplicationState<W, F>,
    mut events: mpsc::UnboundedReceiver<AppEvent>,
) -> PersistedRecord {
    state.start_timers();

    while let Some(event) = events.recv().await {
        if state.handle(event).await == LoopControl::Exit {
            break;
        }
    }

    state.timers.cancel();
    match state.final_record.take() {
        Some(record) => record,
        None => state.save(),
    }
}
