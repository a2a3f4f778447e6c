use image::{imageops::FilterType, RgbaImage};

use crate::error::MuyuError;

const IDLE_PNG: &[u8] = include_bytes!("../../ui/muyu_idle.png");
const HIT_PNG: &[u8] = include_bytes!("../../ui/muyu_hit.png");

/// Straight RGBA pixels ready for the tray host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayIconImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TrayIconImage {
    pub fn to_tauri(&self) -> tauri::image::Image<'static> {
        tauri::image::Image::new_owned(self.rgba.clone(), self.width, self.height)
    }
}

/// Idle and hit variants, prepared once.
#[derive(Debug, Clone)]
pub struct TrayIcons {
    pub idle: TrayIconImage,
    pub hit: TrayIconImage,
}

impl TrayIcons {
    pub fn from_embedded(size: u32) -> Result<Self, MuyuError> {
        Ok(Self {
            idle: prepare_tray_icon(IDLE_PNG, size)?,
            hit: prepare_tray_icon(HIT_PNG, size)?,
        })
    }
}

/// Decode, resize to `size`×`size` and binarize alpha.
pub fn prepare_tray_icon(png: &[u8], size: u32) -> Result<TrayIconImage, MuyuError> {
    let decoded = image::load_from_memory(png)?.to_rgba8();
    let mut resized = image::imageops::resize(&decoded, size, size, FilterType::Lanczos3);
    binarize_alpha(&mut resized);

    Ok(TrayIconImage {
        width: resized.width(),
        height: resized.height(),
        rgba: resized.into_raw(),
    })
}

/// Tray hosts mis-render partial alpha masks: any coverage becomes opaque.
pub fn binarize_alpha(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        pixel.0[3] = if pixel.0[3] > 0 { 255 } else { 0 };
    }
}
