//! Rendering: draws the full canvas scene to a 2D surface.
//!
//! Every frame is a full repaint: reset the transform, clear, apply the
//! camera, paint the background over the visible world area, then stroke each
//! committed shape in store order and the local draft preview last. Nothing
//! here mutates application state.
//!
//! Drawing goes through the [`Surface`] trait so the scene logic can be
//! exercised without a browser. [`web_sys::CanvasRenderingContext2d`] is the
//! only production implementation, and fallible `Canvas2D` calls propagate
//! their `JsValue` error to the caller ([`crate::engine::Engine::render`]).

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::TAU;

use frames::Shape;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::{Camera, Point};
use crate::consts::{BACKGROUND, STROKE};
use crate::doc::ShapeStore;

/// The drawing operations the scene needs from a 2D context.
pub trait Surface {
    type Error;

    /// Replace the current transform with a uniform scale plus translation.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the transform cannot be applied.
    fn set_transform(&self, scale: f64, offset_x: f64, offset_y: f64) -> Result<(), Self::Error>;

    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64);

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str);

    fn stroke_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str);

    /// Outline a full circle. `radius` is never negative.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the arc cannot be built.
    fn stroke_circle(&self, center_x: f64, center_y: f64, radius: f64, color: &str) -> Result<(), Self::Error>;

    /// Connect `points` with straight segments. Called with at least two points.
    fn stroke_polyline(&self, points: &[Point], color: &str);
}

impl Surface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn set_transform(&self, scale: f64, offset_x: f64, offset_y: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::set_transform(self, scale, 0.0, 0.0, scale, offset_x, offset_y)
    }

    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::clear_rect(self, x, y, width, height);
    }

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.set_fill_style_str(color);
        CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
    }

    fn stroke_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.set_stroke_style_str(color);
        CanvasRenderingContext2d::stroke_rect(self, x, y, width, height);
    }

    fn stroke_circle(&self, center_x: f64, center_y: f64, radius: f64, color: &str) -> Result<(), JsValue> {
        self.set_stroke_style_str(color);
        self.begin_path();
        self.arc(center_x, center_y, radius, 0.0, TAU)?;
        self.close_path();
        self.stroke();
        Ok(())
    }

    fn stroke_polyline(&self, points: &[Point], color: &str) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.set_stroke_style_str(color);
        self.begin_path();
        self.move_to(first.x, first.y);
        for p in rest {
            self.line_to(p.x, p.y);
        }
        self.stroke();
    }
}

/// Draw the full scene.
///
/// `viewport_w` and `viewport_h` are the visible area in CSS pixels.
///
/// # Errors
///
/// Returns `Err` if any surface call fails (e.g. invalid context state).
pub fn draw<S: Surface>(
    surface: &S,
    store: &ShapeStore,
    camera: &Camera,
    preview: Option<&Shape>,
    viewport_w: f64,
    viewport_h: f64,
) -> Result<(), S::Error> {
    // Layer 1: clear in screen space, then enter world space.
    surface.set_transform(1.0, 0.0, 0.0)?;
    surface.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    surface.set_transform(camera.zoom, camera.pan_x, camera.pan_y)?;

    // Layer 2: background over exactly the visible world rectangle.
    let top_left = camera.screen_to_world(Point::new(0.0, 0.0));
    surface.fill_rect(top_left.x, top_left.y, viewport_w / camera.zoom, viewport_h / camera.zoom, BACKGROUND);

    // Layer 3: committed shapes, oldest first.
    for shape in store.iter() {
        draw_shape(surface, shape)?;
    }

    // Layer 4: the local draft.
    if let Some(shape) = preview {
        draw_shape(surface, shape)?;
    }

    Ok(())
}

fn draw_shape<S: Surface>(surface: &S, shape: &Shape) -> Result<(), S::Error> {
    match shape {
        Shape::Rect { x, y, width, height } => surface.stroke_rect(*x, *y, *width, *height, STROKE),
        Shape::Circle { center_x, center_y, radius } => {
            surface.stroke_circle(*center_x, *center_y, radius.abs(), STROKE)?;
        }
        Shape::Pencil { points } => {
            if points.len() >= 2 {
                surface.stroke_polyline(points, STROKE);
            }
        }
    }
    Ok(())
}
