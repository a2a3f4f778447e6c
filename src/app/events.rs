use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::WidgetSnapshot;

/// Everything that can change application state. Consumed in order by the
/// event loop; producers on other threads only ever send.
#[derive(Debug)]
pub enum AppEvent {
    KeyPressed,
    ToggleInfo,
    ToggleFullscreen,
    HideToTray,
    ShowFromTray,
    CloseRequested,
    Exit,
    FlashRevert(u64),
    Autosave,
    InfoTick,
    Snapshot(oneshot::Sender<WidgetSnapshot>),
}

/// Cloneable sending half of the event loop. Managed as Tauri state.
#[derive(Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventBus {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns false once the loop has exited.
    pub fn send(&self, event: AppEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("event loop closed, dropped {:?}", err.0);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// One-shot timer: deliver `event` after `delay`.
    pub fn send_after(&self, delay: Duration, event: AppEvent) {
        let bus = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            bus.send(event);
        });
    }

    /// Repeating timer: deliver an event every `period` (first one after a full
    /// period) until `cancel` fires.
    pub fn send_every(
        &self,
        period: Duration,
        cancel: CancellationToken,
        make_event: fn() -> AppEvent,
    ) -> tokio::task::JoinHandle<()> {
        let bus = self.clone();
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if !bus.send(make_event()) {
                            break;
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_send_every_fires_after_each_full_period() {
        let (bus, mut rx) = EventBus::channel();
        let cancel = CancellationToken::new();
        let started = tokio::time::Instant::now();
        bus.send_every(Duration::from_secs(600), cancel.clone(), || AppEvent::Autosave);

        assert!(matches!(rx.recv().await, Some(AppEvent::Autosave)));
        assert_eq!(started.elapsed(), Duration::from_secs(600));
        assert!(matches!(rx.recv().await, Some(AppEvent::Autosave)));
        assert_eq!(started.elapsed(), Duration::from_secs(1_200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_every_stops_on_cancel() {
        let (bus, mut rx) = EventBus::channel();
        let cancel = CancellationToken::new();
        let handle = bus.send_every(Duration::from_secs(1), cancel.clone(), || AppEvent::InfoTick);

        cancel.cancel();
        handle.await.unwrap();
        drop(bus);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_after_delivers_once() {
        let (bus, mut rx) = EventBus::channel();
        let started = tokio::time::Instant::now();
        bus.send_after(Duration::from_millis(150), AppEvent::FlashRevert(4));

        assert!(matches!(rx.recv().await, Some(AppEvent::FlashRevert(4))));
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn test_send_reports_closed_loop() {
        let (bus, rx) = EventBus::channel();
        drop(rx);
        assert!(!bus.send(AppEvent::KeyPressed));
    }
}
