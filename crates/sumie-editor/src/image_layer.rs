//! Source image decoding and fit-to-stage placement.

use image::RgbaImage;

use crate::types::{Dimensions, EditorError, Point};

/// Fraction of the stage the fitted image may occupy, leaving a small
/// margin around it.
pub const FIT_PADDING: f64 = 0.95;

/// Holds the single decoded source image together with the scale and
/// centering offset that fit it to the stage.
///
/// Created on image load, replaced when a new image loads, dropped on
/// explicit clear.
#[derive(Debug, Clone)]
pub struct ImageLayer {
    image: RgbaImage,
    fit_scale: f64,
    offset: Point,
}

impl ImageLayer {
    /// Decode `bytes` (PNG, JPEG, BMP, WebP) and fit the result to the
    /// stage.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::EmptyInput`] if `bytes` is empty and
    /// [`EditorError::ImageDecode`] if the image format is
    /// unrecognized or corrupt. A decode failure is surfaced rather
    /// than silently ignored so callers can tell the user.
    pub fn from_bytes(bytes: &[u8], stage: Dimensions) -> Result<Self, EditorError> {
        if bytes.is_empty() {
            return Err(EditorError::EmptyInput);
        }
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let mut layer = Self {
            image,
            fit_scale: 1.0,
            offset: Point::new(0.0, 0.0),
        };
        layer.refit(stage);
        Ok(layer)
    }

    /// Recompute fit-scale and centering for a new stage size, keeping
    /// the aspect ratio and the [`FIT_PADDING`] margin.
    pub fn refit(&mut self, stage: Dimensions) {
        let (img_w, img_h) = self.image.dimensions();
        let scale = (f64::from(stage.width) / f64::from(img_w))
            .min(f64::from(stage.height) / f64::from(img_h))
            * FIT_PADDING;

        let fitted_w = f64::from(img_w) * scale;
        let fitted_h = f64::from(img_h) * scale;
        self.fit_scale = scale;
        self.offset = Point::new(
            (f64::from(stage.width) - fitted_w) / 2.0,
            (f64::from(stage.height) - fitted_h) / 2.0,
        );
    }

    /// The decoded source image.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Intrinsic pixel dimensions of the source image.
    #[must_use]
    pub fn intrinsic_dimensions(&self) -> Dimensions {
        let (width, height) = self.image.dimensions();
        Dimensions { width, height }
    }

    /// Scale applied to fit the image within the stage.
    #[must_use]
    pub const fn fit_scale(&self) -> f64 {
        self.fit_scale
    }

    /// Stage-local offset that centers the fitted image.
    #[must_use]
    pub const fn offset(&self) -> Point {
        self.offset
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STAGE: Dimensions = Dimensions {
        width: 800,
        height: 600,
    };

    /// Encode a solid-color RGBA test image as PNG bytes.
    fn solid_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 80, 120, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn empty_bytes_error() {
        let result = ImageLayer::from_bytes(&[], STAGE);
        assert!(matches!(result, Err(EditorError::EmptyInput)));
    }

    #[test]
    fn corrupt_bytes_surface_decode_error() {
        let result = ImageLayer::from_bytes(&[0xFF, 0x00, 0x13], STAGE);
        assert!(matches!(result, Err(EditorError::ImageDecode(_))));
    }

    #[test]
    fn wide_image_is_fitted_by_width() {
        // 1600x600 into 800x600: width is the binding constraint.
        let layer = ImageLayer::from_bytes(&solid_png(1600, 600), STAGE).unwrap();
        let expected = 800.0 / 1600.0 * FIT_PADDING;
        assert!((layer.fit_scale() - expected).abs() < 1e-9);
    }

    #[test]
    fn tall_image_is_fitted_by_height() {
        let layer = ImageLayer::from_bytes(&solid_png(100, 1200), STAGE).unwrap();
        let expected = 600.0 / 1200.0 * FIT_PADDING;
        assert!((layer.fit_scale() - expected).abs() < 1e-9);
    }

    #[test]
    fn fitted_image_is_centered() {
        let layer = ImageLayer::from_bytes(&solid_png(400, 300), STAGE).unwrap();
        let scale = layer.fit_scale();
        let offset = layer.offset();
        assert!((offset.x - (800.0 - 400.0 * scale) / 2.0).abs() < 1e-9);
        assert!((offset.y - (600.0 - 300.0 * scale) / 2.0).abs() < 1e-9);
        // The padding margin keeps the image strictly inside the stage.
        assert!(offset.x > 0.0);
        assert!(offset.y > 0.0);
    }

    #[test]
    fn refit_recenters_for_new_stage() {
        let mut layer = ImageLayer::from_bytes(&solid_png(400, 300), STAGE).unwrap();
        layer.refit(Dimensions {
            width: 400,
            height: 400,
        });
        let scale = layer.fit_scale();
        let expected = (400.0_f64 / 400.0).min(400.0 / 300.0) * FIT_PADDING;
        assert!((scale - expected).abs() < 1e-9);
        assert!((layer.offset().x - (400.0 - 400.0 * scale) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn intrinsic_dimensions_match_source() {
        let layer = ImageLayer::from_bytes(&solid_png(123, 45), STAGE).unwrap();
        assert_eq!(
            layer.intrinsic_dimensions(),
            Dimensions {
                width: 123,
                height: 45
            }
        );
    }
}
