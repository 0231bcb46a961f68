//! sumie-editor: Pure canvas editing core (sans-IO).
//!
//! Models a mask-based image editing session: viewport pan/zoom,
//! freehand stroke capture, ordered paint/erase compositing, and
//! flattening to PNG image/mask pairs.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and pointer coordinates and returns structured data.
//! All browser/network interaction lives in `sumie-io`.

pub mod export;
pub mod image_layer;
pub mod mask;
pub mod session;
pub mod stroke;
pub mod types;
pub mod viewport;

pub use export::{DEFAULT_PIXEL_RATIO, ExportResult};
pub use session::{DEFAULT_BRUSH_SIZE, EditorSession, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
pub use types::{Dimensions, EditorError, Point, Stroke, ToolMode};
pub use viewport::{MAX_SCALE, MIN_SCALE, SCALE_STEP, Viewport, ZoomDirection};
