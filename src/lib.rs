use tauri::Manager;
use tauri_plugin_log::{Target, TargetKind};

mod animation;
pub mod app;
mod commands;
pub mod error;
pub mod host;
mod input;
pub mod merit_store;
pub mod services;
pub mod session;
mod tray;
pub mod visibility;
mod windows;

#[cfg(test)]
mod testing;

use app::{run_event_loop, AppEvent, ApplicationState, EventBus};
use error::MuyuError;
use merit_store::MeritStore;
use services::config::AppConfig;
use services::paths;
use services::tray_icon::TrayIcons;
use windows::main_window::{MainWindow, MAIN_WINDOW_LABEL};

pub fn run() {
    let log_level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .targets([
                    Target::new(TargetKind::Stdout),
                    Target::new(TargetKind::LogDir { file_name: None }),
                ])
                .level(log_level)
                .build(),
        )
        .invoke_handler(tauri::generate_handler![
            commands::widget_commands::toggle_info,
            commands::widget_commands::toggle_fullscreen,
            commands::widget_commands::hide_to_tray,
            commands::widget_commands::widget_snapshot,
        ])
        .on_window_event(|window, event| {
            // Closing the widget only hides it; exit goes through the tray menu.
            if let tauri::WindowEvent::CloseRequested { api, .. } = event {
                if window.label() != MAIN_WINDOW_LABEL {
                    return;
                }
                if let Some(bus) = window.try_state::<EventBus>() {
                    if bus.send(AppEvent::CloseRequested) {
                        api.prevent_close();
                    }
                }
            }
        })
        .setup(|app| {
            setup_widget(app)?;
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

fn setup_widget(app: &tauri::App) -> Result<(), MuyuError> {
    let fallback = app.path().app_data_dir().ok();
    let (config, store) = match paths::init_data_dir(fallback) {
        Some(dir) => (
            AppConfig::load(&paths::config_file(&dir)),
            MeritStore::new(paths::cache_file(&dir)),
        ),
        None => {
            log::error!("no writable data directory, merit will not be saved");
            (AppConfig::default(), MeritStore::detached())
        }
    };
    let record = store.load();
    log::info!(
        "resuming with {} hits, {:.1}s accumulated",
        record.total_hits,
        record.total_duration
    );

    let icons = TrayIcons::from_embedded(config.tray_icon_size)?;
    let window = MainWindow::from_app(app.handle())?;
    window.apply_widget_chrome();

    let (bus, events) = EventBus::channel();
    app.manage(bus.clone());

    let trays = tray::TauriTrayFactory::new(app.handle().clone(), bus.clone(), config.labels.clone());
    let state = ApplicationState::new(config, store, record, window, trays, icons, bus.clone());

    input::spawn_key_listener(bus);

    let handle = app.handle().clone();
    tauri::async_runtime::spawn(async move {
        let record = run_event_loop(state, events).await;
        log::info!(
            "exiting with {} hits, {:.1}s accumulated",
            record.total_hits,
            record.total_duration
        );
        handle.exit(0);
    });

    Ok(())
}
