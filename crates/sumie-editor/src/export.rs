//! Flattening layered strokes and the source image into raster PNGs.
//!
//! Exports are rendered directly from the stroke list and image layer
//! at the stage's logical dimensions, so they are independent of
//! whatever pan/zoom is active at export time and never touch viewport
//! state.

use image::{ImageEncoder, Rgba, RgbaImage};
use tiny_skia::{FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

use crate::image_layer::ImageLayer;
use crate::mask::MaskLayer;
use crate::types::{Dimensions, EditorError};

/// Stroke color for the exported mask raster.
pub const MASK_FOREGROUND: [u8; 3] = [255, 255, 255];

/// Opaque background fill for unpainted mask regions. Black beneath
/// white strokes gives the downstream model a binary-contrast
/// selection mask rather than a semi-transparent overlay.
pub const MASK_BACKGROUND: [u8; 3] = [0, 0, 0];

/// Stroke color for the editing-time overlay (displayed at reduced
/// opacity by the UI).
pub const OVERLAY_COLOR: [u8; 3] = [255, 0, 0];

/// Default pixel-density multiplier for image-only export.
pub const DEFAULT_PIXEL_RATIO: f64 = 2.0;

/// A flattened image/mask pair ready for network transmission.
///
/// Both rasters are PNG-encoded and share the stage's logical pixel
/// dimensions at scale 1 / offset 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Clean copy of the source image (no mask contamination).
    pub image: Vec<u8>,
    /// Composited mask: white strokes on an opaque black background.
    pub mask: Vec<u8>,
    /// Pixel dimensions shared by both rasters.
    pub dimensions: Dimensions,
}

/// Render the mask layer at full opacity over an opaque background.
///
/// # Errors
///
/// Returns [`EditorError::Raster`] if pixmap allocation fails.
pub fn render_mask_raster(mask: &MaskLayer, dims: Dimensions) -> Result<Pixmap, EditorError> {
    let coverage = mask.rasterize(dims, MASK_FOREGROUND)?;

    let mut flattened = Pixmap::new(dims.width, dims.height).ok_or_else(|| {
        EditorError::Raster(format!(
            "cannot allocate {}x{} export pixmap",
            dims.width, dims.height
        ))
    })?;
    flattened.fill(tiny_skia::Color::from_rgba8(
        MASK_BACKGROUND[0],
        MASK_BACKGROUND[1],
        MASK_BACKGROUND[2],
        255,
    ));
    flattened.draw_pixmap(
        0,
        0,
        coverage.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    Ok(flattened)
}

/// Render the image layer alone at `pixel_ratio` times the logical
/// stage dimensions, with fit-scale and centering applied.
///
/// # Errors
///
/// Returns [`EditorError::Raster`] if pixmap allocation fails or the
/// pixel ratio is not positive.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_image_raster(
    layer: &ImageLayer,
    dims: Dimensions,
    pixel_ratio: f64,
) -> Result<Pixmap, EditorError> {
    if pixel_ratio <= 0.0 {
        return Err(EditorError::Raster(format!(
            "pixel ratio must be positive, got {pixel_ratio}"
        )));
    }

    let out_w = ((f64::from(dims.width) * pixel_ratio).round() as u32).max(1);
    let out_h = ((f64::from(dims.height) * pixel_ratio).round() as u32).max(1);
    let mut pixmap = Pixmap::new(out_w, out_h).ok_or_else(|| {
        EditorError::Raster(format!("cannot allocate {out_w}x{out_h} export pixmap"))
    })?;

    let source = image_to_pixmap(layer.image())?;
    let scale = (layer.fit_scale() * pixel_ratio) as f32;
    let offset = layer.offset();
    let transform = Transform::from_scale(scale, scale).post_translate(
        (offset.x * pixel_ratio) as f32,
        (offset.y * pixel_ratio) as f32,
    );

    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    Ok(pixmap)
}

/// Convert a straight-alpha `RgbaImage` to a premultiplied tiny-skia
/// pixmap.
fn image_to_pixmap(image: &RgbaImage) -> Result<Pixmap, EditorError> {
    let (width, height) = image.dimensions();
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| EditorError::Raster(format!("invalid image size {width}x{height}")))?;

    let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        // Premultiply: channel * alpha / 255.
        let premul = |c: u8| -> u8 {
            #[allow(clippy::cast_possible_truncation)]
            let v = (u16::from(c) * u16::from(a) / 255) as u8;
            v
        };
        data.extend_from_slice(&[premul(r), premul(g), premul(b), a]);
    }

    Pixmap::from_vec(data, size)
        .ok_or_else(|| EditorError::Raster("pixmap construction failed".into()))
}

/// Encode a pixmap as PNG bytes.
///
/// The pixmap's premultiplied channels are converted back to straight
/// alpha before encoding.
///
/// # Errors
///
/// Returns [`EditorError::Raster`] if PNG encoding fails.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, EditorError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let data = pixmap.data();
    let mut img = RgbaImage::new(width, height);
    for (i, pixel) in img.pixels_mut().enumerate() {
        let off = i * 4;
        let a = data[off + 3];
        if a == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
        } else {
            // Un-premultiply: channel = premultiplied * 255 / alpha.
            #[allow(clippy::cast_possible_truncation)]
            let unpremul = |c: u8| (u16::from(c) * 255 / u16::from(a)) as u8;
            *pixel = Rgba([
                unpremul(data[off]),
                unpremul(data[off + 1]),
                unpremul(data[off + 2]),
                a,
            ]);
        }
    }

    let mut png = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png);
    encoder
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| EditorError::Raster(format!("PNG encoding failed: {e}")))?;
    Ok(png)
}
