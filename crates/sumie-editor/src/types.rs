//! Shared types for the sumie canvas editing core.

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference the decoded
/// source image without depending on `image` directly.
pub use image::RgbaImage;

/// A 2D point, either in viewport coordinates (raw pointer position) or
/// in stage-local coordinates (after undoing pan/zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Stage or raster dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Which compositing rule a stroke uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Adds mask coverage (`source-over` compositing).
    #[default]
    Paint,
    /// Removes coverage from everything rendered below it within the
    /// mask layer (`destination-out` compositing).
    Erase,
}

/// One continuous freehand gesture: an ordered point sequence in
/// stage-local space, tagged with the tool mode and width active when
/// the gesture started.
///
/// Points are appended only while the originating gesture is active;
/// once the gesture ends the stroke is committed to the mask layer and
/// never mutated again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Compositing rule for this stroke.
    pub tool: ToolMode,
    /// Stroke width in stage-local pixels.
    pub width: f64,
    /// Ordered stage-local points. The first point is duplicated at
    /// creation so a tap still renders a dot.
    pub points: Vec<Point>,
}

impl Stroke {
    /// Returns the number of recorded points (including the seed
    /// duplicate).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the stroke has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Errors that can occur during editing and export operations.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Failed to decode the source image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The source image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// An export operation was attempted with no source image loaded.
    #[error("no image loaded")]
    NoImageLoaded,

    /// An export operation was attempted while a drawing gesture was
    /// still active.
    #[error("a drawing gesture is in progress")]
    GestureInProgress,

    /// Pixmap allocation or PNG encoding failed.
    #[error("raster operation failed: {0}")]
    Raster(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Point tests ---

    #[test]
    fn point_new() {
        let p = Point::new(3.0, 4.0);
        assert!((p.x - 3.0).abs() < f64::EPSILON);
        assert!((p.y - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_distance_to_self_is_zero() {
        let p = Point::new(7.0, 11.0);
        assert!(p.distance(p).abs() < f64::EPSILON);
    }

    // --- ToolMode tests ---

    #[test]
    fn tool_mode_defaults_to_paint() {
        assert_eq!(ToolMode::default(), ToolMode::Paint);
    }

    // --- Stroke tests ---

    #[test]
    fn stroke_len_and_empty() {
        let stroke = Stroke {
            tool: ToolMode::Paint,
            width: 30.0,
            points: vec![Point::new(1.0, 1.0), Point::new(1.0, 1.0)],
        };
        assert_eq!(stroke.len(), 2);
        assert!(!stroke.is_empty());
    }

    // --- EditorError display ---

    #[test]
    fn error_no_image_loaded_display() {
        assert_eq!(EditorError::NoImageLoaded.to_string(), "no image loaded");
    }

    #[test]
    fn error_empty_input_display() {
        assert_eq!(
            EditorError::EmptyInput.to_string(),
            "input image data is empty"
        );
    }

    #[test]
    fn error_gesture_in_progress_display() {
        assert_eq!(
            EditorError::GestureInProgress.to_string(),
            "a drawing gesture is in progress"
        );
    }

    // --- Serde round trips ---

    #[test]
    #[allow(clippy::unwrap_used)]
    fn point_serde_round_trip() {
        let p = Point::new(3.25, -2.5);
        let json = serde_json::to_string(&p).unwrap();
        let deserialized: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(p, deserialized);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn tool_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ToolMode::Paint).unwrap(), "\"paint\"");
        assert_eq!(serde_json::to_string(&ToolMode::Erase).unwrap(), "\"erase\"");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn stroke_serde_round_trip() {
        let stroke = Stroke {
            tool: ToolMode::Erase,
            width: 12.5,
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 0.0),
                Point::new(4.5, 9.25),
            ],
        };
        let json = serde_json::to_string(&stroke).unwrap();
        let deserialized: Stroke = serde_json::from_str(&json).unwrap();
        assert_eq!(stroke, deserialized);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn dimensions_serde_round_trip() {
        let d = Dimensions {
            width: 640,
            height: 480,
        };
        let json = serde_json::to_string(&d).unwrap();
        let deserialized: Dimensions = serde_json::from_str(&json).unwrap();
        assert_eq!(d, deserialized);
    }
}
