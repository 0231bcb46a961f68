//! Pan/zoom state and the viewport-to-stage coordinate transform.
//!
//! The viewport applies one uniform transform to both layers:
//! `viewport = stage * scale + offset`. Pointer positions arrive in
//! viewport coordinates and are mapped back to stage-local space with
//! [`Viewport::to_stage`] before being recorded into strokes, so stored
//! stroke geometry is independent of whatever pan/zoom was active while
//! drawing.

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, Point};

/// Multiplicative zoom step per wheel tick.
pub const SCALE_STEP: f64 = 1.1;

/// Lower scale bound. Prevents degenerate or inverted transforms from
/// unbounded zoom-out.
pub const MIN_SCALE: f64 = 0.1;

/// Upper scale bound.
pub const MAX_SCALE: f64 = 32.0;

/// Zoom direction for [`Viewport::zoom_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Scale up by [`SCALE_STEP`].
    In,
    /// Scale down by [`SCALE_STEP`].
    Out,
}

/// Pan offset, uniform scale, and logical size of the editing stage.
///
/// Invariant: `scale` stays within `[MIN_SCALE, MAX_SCALE]` and is
/// therefore always positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    size: Dimensions,
    offset: Point,
    scale: f64,
}

impl Viewport {
    /// Create a viewport at identity transform (no pan, scale 1).
    #[must_use]
    pub const fn new(size: Dimensions) -> Self {
        Self {
            size,
            offset: Point::new(0.0, 0.0),
            scale: 1.0,
        }
    }

    /// Logical stage size in pixels. Export rasters use these
    /// dimensions regardless of the current transform.
    #[must_use]
    pub const fn size(&self) -> Dimensions {
        self.size
    }

    /// Current pan offset in viewport pixels.
    #[must_use]
    pub const fn offset(&self) -> Point {
        self.offset
    }

    /// Current uniform scale factor.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Translate the stage by `delta` viewport pixels. Pan is unbounded.
    pub fn pan(&mut self, delta: Point) {
        self.offset = Point::new(self.offset.x + delta.x, self.offset.y + delta.y);
    }

    /// Zoom toward the pointer: rescale by [`SCALE_STEP`], then
    /// reposition so the stage-local point under `pointer` stays fixed.
    ///
    /// The scale is clamped to `[MIN_SCALE, MAX_SCALE]`; when the clamp
    /// leaves the scale unchanged the offset is left unchanged too.
    pub fn zoom_at(&mut self, pointer: Point, direction: ZoomDirection) {
        let old_scale = self.scale;
        let new_scale = match direction {
            ZoomDirection::In => old_scale * SCALE_STEP,
            ZoomDirection::Out => old_scale / SCALE_STEP,
        }
        .clamp(MIN_SCALE, MAX_SCALE);

        if (new_scale - old_scale).abs() < f64::EPSILON {
            return;
        }

        // Fixed-point repositioning: the stage-local point under the
        // pointer must map to the same viewport position afterwards.
        let stage_point = self.to_stage(pointer);
        self.offset = Point::new(
            stage_point.x.mul_add(-new_scale, pointer.x),
            stage_point.y.mul_add(-new_scale, pointer.y),
        );
        self.scale = new_scale;
    }

    /// Map a viewport-space pointer position to stage-local coordinates
    /// under the active pan/zoom.
    #[must_use]
    pub fn to_stage(&self, pointer: Point) -> Point {
        Point::new(
            (pointer.x - self.offset.x) / self.scale,
            (pointer.y - self.offset.y) / self.scale,
        )
    }

    /// Update the logical stage size (window resize). Pan and zoom are
    /// preserved.
    pub const fn resize(&mut self, size: Dimensions) {
        self.size = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn viewport() -> Viewport {
        Viewport::new(Dimensions {
            width: 800,
            height: 600,
        })
    }

    fn assert_close(a: Point, b: Point) {
        assert!(
            a.distance(b) < TOLERANCE,
            "expected ({}, {}) ~= ({}, {})",
            a.x,
            a.y,
            b.x,
            b.y,
        );
    }

    #[test]
    fn new_viewport_is_identity() {
        let vp = viewport();
        assert!((vp.scale() - 1.0).abs() < f64::EPSILON);
        assert_close(vp.offset(), Point::new(0.0, 0.0));
    }

    #[test]
    fn pan_translates_offset() {
        let mut vp = viewport();
        vp.pan(Point::new(10.0, -5.0));
        vp.pan(Point::new(2.5, 7.0));
        assert_close(vp.offset(), Point::new(12.5, 2.0));
    }

    #[test]
    fn pan_is_unbounded() {
        let mut vp = viewport();
        vp.pan(Point::new(-1e7, 1e7));
        assert_close(vp.offset(), Point::new(-1e7, 1e7));
    }

    #[test]
    fn to_stage_at_identity_is_identity() {
        let vp = viewport();
        assert_close(vp.to_stage(Point::new(42.0, 17.0)), Point::new(42.0, 17.0));
    }

    #[test]
    fn to_stage_undoes_pan_and_zoom() {
        let mut vp = viewport();
        vp.pan(Point::new(100.0, 50.0));
        vp.zoom_at(Point::new(0.0, 0.0), ZoomDirection::In);
        let pointer = Point::new(250.0, 130.0);
        let stage = vp.to_stage(pointer);
        // Round trip: stage * scale + offset == pointer.
        let back = Point::new(
            stage.x.mul_add(vp.scale(), vp.offset().x),
            stage.y.mul_add(vp.scale(), vp.offset().y),
        );
        assert_close(back, pointer);
    }

    #[test]
    fn zoom_in_multiplies_scale_by_step() {
        let mut vp = viewport();
        vp.zoom_at(Point::new(400.0, 300.0), ZoomDirection::In);
        assert!((vp.scale() - SCALE_STEP).abs() < TOLERANCE);
    }

    #[test]
    fn zoom_out_divides_scale_by_step() {
        let mut vp = viewport();
        vp.zoom_at(Point::new(400.0, 300.0), ZoomDirection::Out);
        assert!((vp.scale() - 1.0 / SCALE_STEP).abs() < TOLERANCE);
    }

    #[test]
    fn zoom_keeps_point_under_cursor_fixed() {
        let mut vp = viewport();
        vp.pan(Point::new(-37.0, 12.0));
        let pointer = Point::new(200.0, 150.0);

        for direction in [
            ZoomDirection::In,
            ZoomDirection::In,
            ZoomDirection::Out,
            ZoomDirection::In,
            ZoomDirection::Out,
        ] {
            let before = vp.to_stage(pointer);
            vp.zoom_at(pointer, direction);
            let after = vp.to_stage(pointer);
            assert_close(before, after);
        }
    }

    #[test]
    fn zoom_in_clamps_at_max_scale() {
        let mut vp = viewport();
        // 1.1^n exceeds 32 well before 100 steps.
        for _ in 0..100 {
            vp.zoom_at(Point::new(10.0, 10.0), ZoomDirection::In);
        }
        assert!((vp.scale() - MAX_SCALE).abs() < TOLERANCE);
    }

    #[test]
    fn zoom_out_clamps_at_min_scale() {
        let mut vp = viewport();
        for _ in 0..100 {
            vp.zoom_at(Point::new(10.0, 10.0), ZoomDirection::Out);
        }
        assert!((vp.scale() - MIN_SCALE).abs() < TOLERANCE);
    }

    #[test]
    fn zoom_at_clamp_leaves_offset_unchanged() {
        let mut vp = viewport();
        for _ in 0..100 {
            vp.zoom_at(Point::new(10.0, 10.0), ZoomDirection::In);
        }
        let offset_at_max = vp.offset();
        vp.zoom_at(Point::new(500.0, 500.0), ZoomDirection::In);
        assert_close(vp.offset(), offset_at_max);
    }

    #[test]
    fn resize_preserves_transform() {
        let mut vp = viewport();
        vp.pan(Point::new(30.0, 40.0));
        vp.zoom_at(Point::new(100.0, 100.0), ZoomDirection::In);
        let (offset, scale) = (vp.offset(), vp.scale());

        vp.resize(Dimensions {
            width: 1024,
            height: 768,
        });

        assert_eq!(
            vp.size(),
            Dimensions {
                width: 1024,
                height: 768
            }
        );
        assert_close(vp.offset(), offset);
        assert!((vp.scale() - scale).abs() < f64::EPSILON);
    }
}
