use std::path::PathBuf;
use std::sync::OnceLock;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

const SAVEDATA_DIR_NAME: &str = "savedata";
pub(crate) const CACHE_FILE_NAME: &str = "muyu_cache.json";
pub(crate) const CONFIG_FILE_NAME: &str = "config.json";

fn exe_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|p| p.to_path_buf())
}

/// Resolve and create the application's data directory.
///
/// Tried in order:
/// - `<exe_dir>/savedata`
/// - `fallback` (the platform app-data dir)
///
/// `None` when neither can be created; the widget then runs without persistence.
pub(crate) fn init_data_dir(fallback: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(dir) = DATA_DIR.get() {
        return Some(dir.clone());
    }

    let primary = exe_dir().map(|dir| dir.join(SAVEDATA_DIR_NAME));
    let dir = first_usable_dir(primary.into_iter().chain(fallback))?;
    let _ = DATA_DIR.set(dir.clone());
    Some(dir)
}

fn first_usable_dir(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    for dir in candidates {
        match std::fs::create_dir_all(&dir) {
            Ok(()) => return Some(dir),
            Err(err) => log::warn!("data directory {} unusable: {err}", dir.display()),
        }
    }
    None
}

pub(crate) fn cache_file(dir: &std::path::Path) -> PathBuf {
    dir.join(CACHE_FILE_NAME)
}

pub(crate) fn config_file(dir: &std::path::Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}
