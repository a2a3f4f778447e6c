//! Widget configuration.
//!
//! Everything has a default; `<data_dir>/config.json` may override any subset of
//! fields. A missing or unreadable file never prevents startup.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const MIN_INTERVAL_MS: u64 = 50;
const MIN_ICON_SIZE: u32 = 16;
const MAX_ICON_SIZE: u32 = 256;

/// User-facing strings. `{hits}` and `{elapsed}` are substituted at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub tooltip: String,
    pub info_hits: String,
    pub info_elapsed: String,
    pub menu_show: String,
    pub menu_exit: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            tooltip: "功德：{hits} 次\n运行时间：{elapsed} 秒".to_string(),
            info_hits: "已经积攒了{hits}功德".to_string(),
            info_elapsed: "当前运行时间：{elapsed} 秒".to_string(),
            menu_show: "显示窗口".to_string(),
            menu_exit: "退出".to_string(),
        }
    }
}

/// Fill a label template with the live counters.
pub fn render_label(template: &str, hits: u64, elapsed_secs: u64) -> String {
    template
        .replace("{hits}", &hits.to_string())
        .replace("{elapsed}", &elapsed_secs.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub autosave_interval_secs: u64,
    pub flash_ms: u64,
    pub tooltip_interval_ms: u64,
    pub info_refresh_ms: u64,
    pub tray_icon_size: u32,
    pub labels: Labels,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: 600,
            flash_ms: 150,
            tooltip_interval_ms: 1_000,
            info_refresh_ms: 1_000,
            tray_icon_size: 64,
            labels: Labels::default(),
        }
    }
}

impl AppConfig {
    /// Load `path`, falling back to defaults when absent or malformed.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                log::warn!("config {} unreadable, using defaults: {err}", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str::<AppConfig>(&contents) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                log::warn!("config {} malformed, using defaults: {err}", path.display());
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        self.autosave_interval_secs = self.autosave_interval_secs.max(1);
        self.flash_ms = self.flash_ms.max(1);
        self.tooltip_interval_ms = self.tooltip_interval_ms.max(MIN_INTERVAL_MS);
        self.info_refresh_ms = self.info_refresh_ms.max(MIN_INTERVAL_MS);
        self.tray_icon_size = self.tray_icon_size.clamp(MIN_ICON_SIZE, MAX_ICON_SIZE);
        self
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }

    pub fn tooltip_interval(&self) -> Duration {
        Duration::from_millis(self.tooltip_interval_ms)
    }

    pub fn info_refresh_interval(&self) -> Duration {
        Duration::from_millis(self.info_refresh_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_widget_timings() {
        let config = AppConfig::default();
        assert_eq!(config.autosave_interval(), Duration::from_secs(600));
        assert_eq!(config.flash_duration(), Duration::from_millis(150));
        assert_eq!(config.tooltip_interval(), Duration::from_secs(1));
        assert_eq!(config.tray_icon_size, 64);
    }

    #[test]
    fn test_render_label() {
        let labels = Labels::default();
        assert_eq!(
            render_label(&labels.tooltip, 8, 42),
            "功德：8 次\n运行时间：42 秒"
        );
        assert_eq!(render_label(&labels.info_hits, 3, 0), "已经积攒了3功德");
        assert_eq!(render_label(&labels.info_elapsed, 3, 7), "当前运行时间：7 秒");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.json"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "flash_ms": 300, "labels": { "menu_exit": "Quit" } }"#).unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.flash_ms, 300);
        assert_eq!(config.autosave_interval_secs, 600);
        assert_eq!(config.labels.menu_exit, "Quit");
        assert_eq!(config.labels.menu_show, "显示窗口");
    }

    #[test]
    fn test_load_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppConfig::load(&path), AppConfig::default());
    }

    #[test]
    fn test_zero_intervals_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "autosave_interval_secs": 0, "tooltip_interval_ms": 0, "tray_icon_size": 4 }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.autosave_interval_secs, 1);
        assert_eq!(config.tooltip_interval_ms, MIN_INTERVAL_MS);
        assert_eq!(config.tray_icon_size, MIN_ICON_SIZE);
    }
}
