//! Mask layer: ordered strokes with per-stroke compositing.
//!
//! Paint strokes add coverage (`SourceOver`); erase strokes cut
//! coverage out of everything rendered below them within the layer
//! (`DestinationOut`) without deleting the earlier stroke objects.
//! Rendering order is strictly insertion order, so replaying the
//! stroke sequence always reproduces the same coverage.

use tiny_skia::{BlendMode, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

use crate::types::{Dimensions, EditorError, Stroke, ToolMode};

/// Ordered sequence of committed strokes.
#[derive(Debug, Clone, Default)]
pub struct MaskLayer {
    strokes: Vec<Stroke>,
}

impl MaskLayer {
    /// Create an empty mask layer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strokes: Vec::new(),
        }
    }

    /// Append a committed stroke. Later strokes composite over earlier
    /// ones.
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// All committed strokes in insertion order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Returns `true` if no strokes have been committed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Number of committed strokes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Empty the stroke sequence.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Rasterize the stroke sequence onto a transparent pixmap of the
    /// given dimensions.
    ///
    /// Coverage ends up in the alpha channel; `color` tints the painted
    /// regions. Callers flatten the result onto an opaque background
    /// for export or display it directly as a semi-transparent overlay.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Raster`] if the pixmap cannot be
    /// allocated (zero-sized dimensions).
    pub fn rasterize(&self, dims: Dimensions, color: [u8; 3]) -> Result<Pixmap, EditorError> {
        let mut pixmap = Pixmap::new(dims.width, dims.height).ok_or_else(|| {
            EditorError::Raster(format!(
                "cannot allocate {}x{} mask pixmap",
                dims.width, dims.height
            ))
        })?;

        for stroke in &self.strokes {
            render_stroke(&mut pixmap, stroke, color);
        }
        Ok(pixmap)
    }
}

/// Render one stroke with its compositing rule.
#[allow(clippy::cast_possible_truncation)]
fn render_stroke(pixmap: &mut Pixmap, stroke: &Stroke, color: [u8; 3]) {
    let Some(first) = stroke.points.first() else {
        return;
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], 255);
    paint.anti_alias = true;
    paint.blend_mode = match stroke.tool {
        ToolMode::Paint => BlendMode::SourceOver,
        ToolMode::Erase => BlendMode::DestinationOut,
    };

    // Degenerate gesture (a tap): every point coincides. Stroking a
    // zero-length path produces no geometry, so render the dot as a
    // filled circle of the stroke's radius instead.
    let is_dot = stroke.points.iter().all(|p| *p == *first);
    if is_dot {
        let radius = (stroke.width / 2.0) as f32;
        let Some(path) = PathBuilder::from_circle(first.x as f32, first.y as f32, radius) else {
            return;
        };
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in &stroke.points[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let style = tiny_skia::Stroke {
        width: stroke.width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..tiny_skia::Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &style, Transform::identity(), None);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Point;

    const DIMS: Dimensions = Dimensions {
        width: 100,
        height: 100,
    };
    const RED: [u8; 3] = [255, 0, 0];

    /// Horizontal stroke through the stage center.
    fn center_stroke(tool: ToolMode, width: f64) -> Stroke {
        Stroke {
            tool,
            width,
            points: vec![
                Point::new(10.0, 50.0),
                Point::new(10.0, 50.0),
                Point::new(90.0, 50.0),
            ],
        }
    }

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).map_or(0, |p| p.alpha())
    }

    #[test]
    fn empty_mask_rasterizes_transparent() {
        let mask = MaskLayer::new();
        let pixmap = mask.rasterize(DIMS, RED).unwrap();
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn paint_stroke_adds_coverage() {
        let mut mask = MaskLayer::new();
        mask.push(center_stroke(ToolMode::Paint, 20.0));
        let pixmap = mask.rasterize(DIMS, RED).unwrap();
        assert!(alpha_at(&pixmap, 50, 50) > 0, "stroke center must be covered");
        assert_eq!(alpha_at(&pixmap, 50, 5), 0, "far from stroke must stay clear");
    }

    #[test]
    fn paint_then_erase_clears_region() {
        let mut mask = MaskLayer::new();
        mask.push(center_stroke(ToolMode::Paint, 20.0));
        // Wider erase stroke over the same geometry removes all of it.
        mask.push(center_stroke(ToolMode::Erase, 30.0));
        let pixmap = mask.rasterize(DIMS, RED).unwrap();
        assert_eq!(alpha_at(&pixmap, 50, 50), 0);
        assert_eq!(alpha_at(&pixmap, 20, 50), 0);
    }

    #[test]
    fn erase_then_paint_keeps_full_coverage() {
        // Compositing is order-dependent, not commutative: the same two
        // strokes in the opposite order leave the region fully painted.
        let mut mask = MaskLayer::new();
        mask.push(center_stroke(ToolMode::Erase, 30.0));
        mask.push(center_stroke(ToolMode::Paint, 20.0));
        let pixmap = mask.rasterize(DIMS, RED).unwrap();
        assert!(alpha_at(&pixmap, 50, 50) > 0);
    }

    #[test]
    fn erase_does_not_delete_stroke_objects() {
        let mut mask = MaskLayer::new();
        mask.push(center_stroke(ToolMode::Paint, 20.0));
        mask.push(center_stroke(ToolMode::Erase, 30.0));
        assert_eq!(mask.len(), 2, "erase subtracts coverage, not strokes");
    }

    #[test]
    fn replay_reproduces_identical_coverage() {
        let mut mask = MaskLayer::new();
        mask.push(center_stroke(ToolMode::Paint, 20.0));
        mask.push(Stroke {
            tool: ToolMode::Erase,
            width: 8.0,
            points: vec![Point::new(40.0, 40.0), Point::new(60.0, 60.0)],
        });
        mask.push(center_stroke(ToolMode::Paint, 4.0));

        let first = mask.rasterize(DIMS, RED).unwrap();
        let second = mask.rasterize(DIMS, RED).unwrap();
        assert_eq!(first.data(), second.data());
    }

    #[test]
    fn tap_stroke_renders_a_dot() {
        let mut mask = MaskLayer::new();
        mask.push(Stroke {
            tool: ToolMode::Paint,
            width: 10.0,
            points: vec![Point::new(50.0, 50.0), Point::new(50.0, 50.0)],
        });
        let pixmap = mask.rasterize(DIMS, RED).unwrap();
        assert!(alpha_at(&pixmap, 50, 50) > 0, "a tap must still render a dot");
        assert_eq!(alpha_at(&pixmap, 80, 80), 0);
    }

    #[test]
    fn erase_on_empty_mask_stays_transparent() {
        let mut mask = MaskLayer::new();
        mask.push(center_stroke(ToolMode::Erase, 30.0));
        let pixmap = mask.rasterize(DIMS, RED).unwrap();
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_empties_stroke_sequence() {
        let mut mask = MaskLayer::new();
        mask.push(center_stroke(ToolMode::Paint, 20.0));
        assert!(!mask.is_empty());
        mask.clear();
        assert!(mask.is_empty());
        let pixmap = mask.rasterize(DIMS, RED).unwrap();
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_sized_stage_is_a_raster_error() {
        let mask = MaskLayer::new();
        let result = mask.rasterize(
            Dimensions {
                width: 0,
                height: 100,
            },
            RED,
        );
        assert!(matches!(result, Err(EditorError::Raster(_))));
    }

    #[test]
    fn stroke_color_tints_painted_region() {
        let mut mask = MaskLayer::new();
        mask.push(center_stroke(ToolMode::Paint, 20.0));
        let pixmap = mask.rasterize(DIMS, [255, 255, 255]).unwrap();
        let px = pixmap.pixel(50, 50).unwrap();
        assert_eq!(px.red(), px.alpha());
        assert_eq!(px.green(), px.alpha());
        assert_eq!(px.blue(), px.alpha());
    }
}
