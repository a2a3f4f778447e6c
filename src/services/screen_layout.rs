use serde::{Deserialize, Serialize};

/// Outer position plus inner size, in physical pixels (virtual desktop coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    pub fn center(&self) -> (i64, i64) {
        (
            self.x as i64 + self.width as i64 / 2,
            self.y as i64 + self.height as i64 / 2,
        )
    }
}

/// One monitor's bounds, physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Edges are inclusive on both sides; a point on a shared edge belongs to
    /// whichever monitor is enumerated first.
    pub fn contains(&self, (px, py): (i64, i64)) -> bool {
        self.x as i64 <= px && px <= self.right() && self.y as i64 <= py && py <= self.bottom()
    }

    pub fn as_geometry(&self) -> WindowGeometry {
        WindowGeometry {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Pick the monitor that holds the window's center, else the first one enumerated.
pub fn monitor_for_window(window: WindowGeometry, monitors: &[ScreenRect]) -> Option<ScreenRect> {
    let center = window.center();
    monitors
        .iter()
        .find(|m| m.contains(center))
        .or_else(|| monitors.first())
        .copied()
}
