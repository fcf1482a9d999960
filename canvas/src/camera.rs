#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{MAX_ZOOM, MIN_ZOOM, MIN_ZOOM_FACTOR, ZOOM_SPEED};

pub use frames::Point;

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are the screen-space translation in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom) and is always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Translate the view by a screen-space pointer delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Zoom by a vertical wheel delta, keeping the world point under `screen` fixed.
    ///
    /// Positive `dy` (scrolling down) zooms out.
    pub fn zoom_at(&mut self, screen: Point, dy: f64) {
        let before = self.screen_to_world(screen);

        let factor = (1.0 - dy * ZOOM_SPEED).max(MIN_ZOOM_FACTOR);
        let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if !zoom.is_finite() {
            return;
        }
        self.zoom = zoom;

        // Offset is unchanged here, so `after` is where the anchor drifted to.
        let after = self.screen_to_world(screen);
        self.pan_x += (after.x - before.x) * self.zoom;
        self.pan_y += (after.y - before.y) * self.zoom;
    }
}
