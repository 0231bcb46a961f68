//! The editing session: one stage owning its layers, viewport, and
//! tool state.
//!
//! [`EditorSession`] replaces the original design's module-scoped
//! singletons with an explicit per-canvas object, so multiple editors
//! can coexist and nothing reaches for hidden globals. All operations
//! run synchronously inside their triggering event handler; the only
//! guarded interaction is that export refuses to run while a gesture
//! is active.

use tiny_skia::Pixmap;

use crate::export::{
    DEFAULT_PIXEL_RATIO, ExportResult, OVERLAY_COLOR, encode_png, render_image_raster,
    render_mask_raster,
};
use crate::image_layer::ImageLayer;
use crate::mask::MaskLayer;
use crate::stroke::StrokeRecorder;
use crate::types::{Dimensions, EditorError, Point, ToolMode};
use crate::viewport::{Viewport, ZoomDirection};

/// Default brush width in stage-local pixels.
pub const DEFAULT_BRUSH_SIZE: f64 = 30.0;

/// Lower brush width bound.
pub const MIN_BRUSH_SIZE: f64 = 1.0;

/// Upper brush width bound.
pub const MAX_BRUSH_SIZE: f64 = 500.0;

/// One interactive editing session: viewport transform, image layer,
/// mask layer, stroke recorder, and tool configuration.
///
/// The session exclusively owns its layers; strokes are exclusively
/// owned by the mask layer.
#[derive(Debug)]
pub struct EditorSession {
    viewport: Viewport,
    image: Option<ImageLayer>,
    mask: MaskLayer,
    recorder: StrokeRecorder,
    tool: ToolMode,
    brush_size: f64,
}

impl EditorSession {
    /// Create an empty session for a stage of the given logical size.
    #[must_use]
    pub const fn new(size: Dimensions) -> Self {
        Self {
            viewport: Viewport::new(size),
            image: None,
            mask: MaskLayer::new(),
            recorder: StrokeRecorder::new(),
            tool: ToolMode::Paint,
            brush_size: DEFAULT_BRUSH_SIZE,
        }
    }

    // --- State accessors ---

    /// Current viewport (pan/zoom/size) state.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Returns `true` once a source image has been loaded.
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// The loaded image layer, if any.
    #[must_use]
    pub const fn image_layer(&self) -> Option<&ImageLayer> {
        self.image.as_ref()
    }

    /// The mask layer's committed strokes.
    #[must_use]
    pub const fn mask(&self) -> &MaskLayer {
        &self.mask
    }

    /// Currently selected tool.
    #[must_use]
    pub const fn tool(&self) -> ToolMode {
        self.tool
    }

    /// Currently selected brush width.
    #[must_use]
    pub const fn brush_size(&self) -> f64 {
        self.brush_size
    }

    /// Returns `true` while a drawing gesture is active.
    #[must_use]
    pub const fn is_drawing(&self) -> bool {
        self.recorder.is_drawing()
    }

    // --- Image lifecycle ---

    /// Decode and load a source image, fitted and centered to the
    /// stage. Replaces any previously loaded image; the viewport
    /// transform and existing mask strokes are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::EmptyInput`] or
    /// [`EditorError::ImageDecode`]; on error the session keeps its
    /// previous image, if any.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), EditorError> {
        let layer = ImageLayer::from_bytes(bytes, self.viewport.size())?;
        self.image = Some(layer);
        Ok(())
    }

    // --- Viewport control ---

    /// Pan the stage by `delta` viewport pixels.
    pub fn pan(&mut self, delta: Point) {
        self.viewport.pan(delta);
    }

    /// Zoom toward the pointer position.
    pub fn zoom_at(&mut self, pointer: Point, direction: ZoomDirection) {
        self.viewport.zoom_at(pointer, direction);
    }

    /// Update the stage's logical size (window resize) and re-center
    /// the image layer. An in-progress stroke is not disturbed.
    pub fn resize(&mut self, size: Dimensions) {
        self.viewport.resize(size);
        if let Some(layer) = self.image.as_mut() {
            layer.refit(size);
        }
    }

    // --- Tool configuration ---

    /// Select the compositing tool for subsequent strokes. The active
    /// stroke, if any, keeps the tool it started with.
    pub const fn set_tool(&mut self, tool: ToolMode) {
        self.tool = tool;
    }

    /// Set the brush width for subsequent strokes, clamped to
    /// `[MIN_BRUSH_SIZE, MAX_BRUSH_SIZE]`.
    pub fn set_brush_size(&mut self, px: f64) {
        self.brush_size = px.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    // --- Gesture capture ---

    /// Gesture-start at a viewport-space pointer position.
    ///
    /// A no-op (returns `false`) while no image is loaded — drawing on
    /// an empty canvas is not an error by design.
    pub fn pointer_down(&mut self, pointer: Point) -> bool {
        if self.image.is_none() {
            return false;
        }
        let at = self.viewport.to_stage(pointer);
        self.recorder.begin(self.tool, self.brush_size, at);
        self.recorder.is_drawing()
    }

    /// Gesture-move: append a point to the active stroke. Returns
    /// `true` when the mask overlay needs a redraw (the image layer
    /// does not).
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let at = self.viewport.to_stage(pointer);
        self.recorder.extend(at)
    }

    /// Gesture-end: commit the active stroke to the mask layer.
    /// Returns `true` if a stroke was committed.
    pub fn pointer_up(&mut self) -> bool {
        match self.recorder.finish() {
            Some(stroke) => {
                self.mask.push(stroke);
                true
            }
            None => false,
        }
    }

    // --- Clearing ---

    /// Empty the mask layer's stroke sequence.
    pub fn clear_mask(&mut self) {
        self.mask.clear();
    }

    /// Empty the mask layer and release the source image.
    pub fn clear_all(&mut self) {
        self.mask.clear();
        self.image = None;
    }

    // --- Rendering & export ---

    /// Rasterize the mask overlay for display: red strokes with
    /// coverage in the alpha channel, on a transparent background. The
    /// UI layers this over the image at reduced opacity.
    ///
    /// The in-progress stroke, if any, is included so drawing gives
    /// live feedback.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Raster`] if rasterization fails.
    pub fn render_overlay(&self) -> Result<Pixmap, EditorError> {
        let dims = self.viewport.size();
        // Include the active stroke by rendering a temporary copy of
        // the layer with it appended.
        self.recorder.preview().map_or_else(
            || self.mask.rasterize(dims, OVERLAY_COLOR),
            |active| {
                let mut layered = self.mask.clone();
                layered.push(active.clone());
                layered.rasterize(dims, OVERLAY_COLOR)
            },
        )
    }

    /// Flatten both layers into a PNG image/mask pair for the
    /// edit-request collaborator.
    ///
    /// Both rasters have the stage's logical dimensions regardless of
    /// the live pan/zoom, and the viewport is bit-identical before and
    /// after the call — rendering is transform-independent, so there
    /// is no transform state to save or restore, on success or error.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::GestureInProgress`] while a gesture is
    /// active, [`EditorError::NoImageLoaded`] when no source image
    /// exists, and [`EditorError::Raster`] on rasterization or
    /// encoding failure. No session state changes on any error path.
    pub fn export_for_edit(&self) -> Result<ExportResult, EditorError> {
        if self.recorder.is_drawing() {
            return Err(EditorError::GestureInProgress);
        }
        let layer = self.image.as_ref().ok_or(EditorError::NoImageLoaded)?;
        let dims = self.viewport.size();

        let image = encode_png(&render_image_raster(layer, dims, 1.0)?)?;
        let mask = encode_png(&render_mask_raster(&self.mask, dims)?)?;
        Ok(ExportResult {
            image,
            mask,
            dimensions: dims,
        })
    }

    /// Export only the clean source image at a higher pixel-density
    /// multiplier for final output (see
    /// [`crate::export::DEFAULT_PIXEL_RATIO`]).
    ///
    /// # Errors
    ///
    /// Same failure modes and state discipline as
    /// [`export_for_edit`](Self::export_for_edit).
    pub fn export_image_only(&self, pixel_ratio: f64) -> Result<Vec<u8>, EditorError> {
        if self.recorder.is_drawing() {
            return Err(EditorError::GestureInProgress);
        }
        let layer = self.image.as_ref().ok_or(EditorError::NoImageLoaded)?;
        encode_png(&render_image_raster(layer, self.viewport.size(), pixel_ratio)?)
    }

    /// Export the source image at the default pixel ratio.
    ///
    /// # Errors
    ///
    /// See [`export_image_only`](Self::export_image_only).
    pub fn export_image_default(&self) -> Result<Vec<u8>, EditorError> {
        self.export_image_only(DEFAULT_PIXEL_RATIO)
    }
}
