pub mod config;
pub(crate) mod paths;
pub mod retry;
pub mod screen_layout;
pub mod tray_icon;
