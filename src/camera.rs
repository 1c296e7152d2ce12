//! Camera and view calculations for 2D rendering
//!
//! The camera belongs to the host: it maps screen pixels to world units for
//! pointer input and yields the visible world region handed to the renderer.
//! Pure calculation logic, no surface dependencies.

use crate::events::ViewDelta;
use crate::geometry::{Point, Rect};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;

/// Zoom step applied by [`Camera::zoom_in`]
pub const ZOOM_IN_FACTOR: f32 = 1.2;

/// Zoom step applied by [`Camera::zoom_out`]
pub const ZOOM_OUT_FACTOR: f32 = 0.8;

/// World-unit margin kept around content when fitting
pub const FIT_MARGIN: f32 = 50.0;

/// Share of the viewport fitted content may occupy
pub const FIT_FILL: f32 = 0.9;

/// Camera state for 2D view transformations
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
    /// World point shown at the viewport center
    pub center: Point,
    /// Zoom level (1.0 = 100%)
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            center: Point::new(0.0, 0.0),
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Create a new camera with given viewport dimensions
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.center.x) * self.zoom + self.width / 2.0,
            (p.y - self.center.y) * self.zoom + self.height / 2.0,
        )
    }

    pub fn screen_to_world(&self, s: Point) -> Point {
        Point::new(
            (s.x - self.width / 2.0) / self.zoom + self.center.x,
            (s.y - self.height / 2.0) / self.zoom + self.center.y,
        )
    }

    /// World rectangle currently covered by the viewport
    pub fn visible_region(&self) -> Rect {
        Rect::centered(self.center, self.width / self.zoom, self.height / self.zoom)
    }

    /// Move the content by `dx, dy` world units
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.center.x -= dx;
        self.center.y -= dy;
    }

    /// Move the content by `dx, dy` screen pixels
    pub fn pan_pixels(&mut self, dx: f32, dy: f32) {
        self.pan(dx / self.zoom, dy / self.zoom);
    }

    /// Apply a view change reported by the interaction controller
    pub fn apply(&mut self, delta: ViewDelta) {
        match delta {
            ViewDelta::Pan { dx, dy } => self.pan(dx, dy),
        }
    }

    /// Zoom the view by factor, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`]
    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(ZOOM_OUT_FACTOR);
    }

    /// Reset view to default
    pub fn reset(&mut self) {
        self.center = Point::new(0.0, 0.0);
        self.zoom = 1.0;
    }

    /// Center `bounds` and zoom so it fills most of the viewport
    ///
    /// `None` (no content) leaves the camera unchanged.
    pub fn fit_to_content(&mut self, bounds: Option<Rect>) {
        let Some(bounds) = bounds else {
            return;
        };
        let padded = bounds.expanded(FIT_MARGIN);

        let scale_x = self.width / padded.width;
        let scale_y = self.height / padded.height;
        self.zoom = (scale_x.min(scale_y) * FIT_FILL).clamp(MIN_ZOOM, MAX_ZOOM);
        self.center = padded.center();
    }

    /// Resize the viewport dimensions
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}
