use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MuyuError {
    StorageUnavailable { message: String },
    TrayHost { message: String },
    Platform { message: String },
    Internal { message: String },
}

impl MuyuError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    pub fn tray(message: impl Into<String>) -> Self {
        Self::TrayHost {
            message: message.into(),
        }
    }

    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::StorageUnavailable { message }
            | Self::TrayHost { message }
            | Self::Platform { message }
            | Self::Internal { message } => message,
        }
    }
}

impl From<std::io::Error> for MuyuError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<serde_json::Error> for MuyuError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<image::ImageError> for MuyuError {
    fn from(err: image::ImageError) -> Self {
        Self::tray(format!("icon image: {err}"))
    }
}

// Tauri errors surface from window and tray calls alike; callers that know which
// one failed remap through `tray()` / `platform()`.
impl From<tauri::Error> for MuyuError {
    fn from(err: tauri::Error) -> Self {
        Self::platform(err.to_string())
    }
}

impl std::fmt::Display for MuyuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable { message } => write!(f, "StorageUnavailable: {}", message),
            Self::TrayHost { message } => write!(f, "TrayHost: {}", message),
            Self::Platform { message } => write!(f, "Platform: {}", message),
            Self::Internal { message } => write!(f, "Internal: {}", message),
        }
    }
}

impl std::error::Error for MuyuError {}
