//! Zoom level and viewport dimensions.
//!
//! The host measures its container and hands the numbers in; nothing here
//! touches a windowing system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User controlled zoom, an integer percentage in `[10, 100]`.
///
/// Lower values zoom out (a larger visible range), higher values zoom in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    /// Most zoomed out
    pub const MIN: u8 = 10;
    /// Most zoomed in
    pub const MAX: u8 = 100;
    /// Increment used by the zoom buttons
    pub const STEP: u8 = 10;
    /// Starting zoom
    pub const DEFAULT: u8 = 50;

    /// Creates a zoom level, clamping into `[MIN, MAX]`.
    pub fn new(level: u8) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    /// Gets the raw level.
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Sets the level, clamped into `[MIN, MAX]`.
    pub fn set(&mut self, level: u8) {
        *self = Self::new(level);
    }

    /// Zooms in by one step.
    pub fn zoom_in(&mut self) {
        self.set(self.0.saturating_add(Self::STEP));
    }

    /// Zooms out by one step.
    pub fn zoom_out(&mut self) {
        self.set(self.0.saturating_sub(Self::STEP));
    }

    /// Whether another zoom-in step is possible.
    pub fn can_zoom_in(&self) -> bool {
        self.0 < Self::MAX
    }

    /// Whether another zoom-out step is possible.
    pub fn can_zoom_out(&self) -> bool {
        self.0 > Self::MIN
    }

    /// Resets to the default level.
    pub fn reset(&mut self) {
        self.0 = Self::DEFAULT;
    }

    /// Range multiplier: `(110 - level) / 50`.
    ///
    /// 0.2 at level 100 and 2.0 at level 10, strictly decreasing in between.
    pub fn factor(&self) -> f64 {
        (110.0 - f64::from(self.0)) / 50.0
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<u8> for ZoomLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

impl From<ZoomLevel> for u8 {
    fn from(zoom: ZoomLevel) -> Self {
        zoom.0
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Pixel size of the hosting container
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportSize {
    /// Drawable height in pixels
    pub container_height_px: f64,
    /// Width available to the entity row in pixels
    pub available_width_px: f64,
}

impl ViewportSize {
    /// Creates a viewport size.
    pub fn new(available_width_px: f64, container_height_px: f64) -> Self {
        Self {
            container_height_px,
            available_width_px,
        }
    }

    /// True when either dimension leaves nothing to draw on.
    pub fn is_degenerate(&self) -> bool {
        !(self.container_height_px.is_finite()
            && self.available_width_px.is_finite()
            && self.container_height_px > 0.0
            && self.available_width_px > 0.0)
    }
}

impl fmt::Display for ViewportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0}x{:.0}px",
            self.available_width_px, self.container_height_px
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_clamps() {
        assert_eq!(ZoomLevel::new(0).get(), 10);
        assert_eq!(ZoomLevel::new(250).get(), 100);
        assert_eq!(ZoomLevel::new(42).get(), 42);
    }

    #[test]
    fn test_zoom_steps_stay_in_bounds() {
        let mut zoom = ZoomLevel::new(95);
        zoom.zoom_in();
        assert_eq!(zoom.get(), 100);
        assert!(!zoom.can_zoom_in());

        let mut zoom = ZoomLevel::new(15);
        zoom.zoom_out();
        assert_eq!(zoom.get(), 10);
        assert!(!zoom.can_zoom_out());

        zoom.zoom_in();
        assert_eq!(zoom.get(), 20);
        zoom.reset();
        assert_eq!(zoom, ZoomLevel::default());
    }

    #[test]
    fn test_zoom_factor_endpoints() {
        assert!((ZoomLevel::new(100).factor() - 0.2).abs() < 1e-12);
        assert!((ZoomLevel::new(10).factor() - 2.0).abs() < 1e-12);
        assert!((ZoomLevel::new(50).factor() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_serde_clamps() {
        let zoom: ZoomLevel = serde_json::from_str("5").unwrap();
        assert_eq!(zoom.get(), 10);
        assert_eq!(serde_json::to_string(&ZoomLevel::new(70)).unwrap(), "70");
    }

    #[test]
    fn test_viewport_degenerate() {
        assert!(ViewportSize::new(0.0, 800.0).is_degenerate());
        assert!(ViewportSize::new(400.0, 0.0).is_degenerate());
        assert!(ViewportSize::new(400.0, f64::NAN).is_degenerate());
        assert!(!ViewportSize::new(400.0, 800.0).is_degenerate());
    }
}
