use rdev::{listen, EventType};
use std::thread;

use crate::app::{AppEvent, EventBus};
use crate::services::retry::RetryConfig;

/// Global key hook. Every key press, whichever key, becomes one `KeyPressed`
/// on the event loop; nothing here touches application state.
pub(crate) fn spawn_key_listener(bus: EventBus) {
    let spawned = thread::Builder::new()
        .name("muyu-key-listener".into())
        .spawn(move || {
            let retry = RetryConfig::default();
            let mut attempt = 0usize;

            while !bus.is_closed() {
                let key_bus = bus.clone();
                let result = listen(move |event| {
                    if let EventType::KeyPress(_) = event.event_type {
                        key_bus.send(AppEvent::KeyPressed);
                    }
                });

                attempt += 1;
                let delay = retry.backoff(attempt);
                match result {
                    Ok(()) => log::warn!(
                        "key listener exited unexpectedly, restarting in {:?}",
                        delay
                    ),
                    Err(e) => log::warn!("key listener failed: {:?}, retrying in {:?}", e, delay),
                }
                thread::sleep(delay);
            }
        });

    if let Err(err) = spawned {
        log::error!("cannot start key listener thread: {err}");
    }
}
