//! Shared numeric and style constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Scale change per wheel pixel: factor = `1 - dy * ZOOM_SPEED`.
pub const ZOOM_SPEED: f64 = 0.001;

/// Floor for a single wheel step's zoom factor, so one large delta can never
/// flip or collapse the scale.
pub const MIN_ZOOM_FACTOR: f64 = 0.1;

/// Smallest camera scale.
pub const MIN_ZOOM: f64 = 0.01;

/// Largest camera scale.
pub const MAX_ZOOM: f64 = 100.0;

// ── Style ───────────────────────────────────────────────────────

/// Scene background fill.
pub const BACKGROUND: &str = "rgba(0,0,0,1)";

/// Outline color for every shape.
pub const STROKE: &str = "white";
