//! Raster encoding for browser display and network transfer.
//!
//! Converts pixmaps and PNG byte buffers into Blob URLs (for
//! `<img src>` display) and base64 data URLs (for JSON request
//! payloads).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sumie_editor::EditorError;
use tiny_skia::Pixmap;
use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur while preparing rasters for the browser.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),

    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for RasterError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

impl From<EditorError> for RasterError {
    fn from(err: EditorError) -> Self {
        Self::PngEncode(err.to_string())
    }
}

/// Create a PNG Blob URL from already-encoded PNG bytes for use as an
/// `<img src>`.
///
/// The returned URL must be revoked via [`revoke_blob_url`] when no
/// longer needed to avoid memory leaks.
///
/// # Errors
///
/// Returns [`RasterError::JsError`] if Blob or URL creation fails.
pub fn png_to_blob_url(png_bytes: &[u8]) -> Result<String, RasterError> {
    let uint8_array = js_sys::Uint8Array::from(png_bytes);
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    opts.set_type("image/png");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    Ok(url)
}

/// Encode a decoded RGBA image as a PNG Blob URL.
///
/// Used for the source image layer, re-encoded only when a new image
/// loads. The returned URL must be revoked via [`revoke_blob_url`].
///
/// # Errors
///
/// Returns [`RasterError::PngEncode`] if PNG encoding fails and
/// [`RasterError::JsError`] if Blob or URL creation fails.
pub fn rgba_to_blob_url(image: &sumie_editor::types::RgbaImage) -> Result<String, RasterError> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    image::ImageEncoder::write_image(
        encoder,
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )
    .map_err(|e| RasterError::PngEncode(e.to_string()))?;
    png_to_blob_url(&png_bytes)
}

/// Encode a pixmap as a PNG Blob URL.
///
/// Used for the live mask overlay, which is re-encoded on every mask
/// change. The returned URL must be revoked via [`revoke_blob_url`].
///
/// # Errors
///
/// Returns [`RasterError::PngEncode`] if PNG encoding fails and
/// [`RasterError::JsError`] if Blob or URL creation fails.
pub fn pixmap_to_blob_url(pixmap: &Pixmap) -> Result<String, RasterError> {
    let png_bytes = sumie_editor::export::encode_png(pixmap)?;
    png_to_blob_url(&png_bytes)
}

/// Encode PNG bytes as a `data:image/png;base64,` URL.
///
/// Data URLs embed the raster directly in the string, which is what
/// the edit API's JSON payload expects.
#[must_use]
pub fn png_to_data_url(png_bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_bytes))
}

/// Decode a `data:image/<fmt>;base64,` URL back into raw image bytes.
///
/// The edit API returns the edited image in this form.
///
/// # Errors
///
/// Returns [`RasterError::PngEncode`] if the string is not a base64
/// image data URL.
pub fn data_url_to_bytes(data_url: &str) -> Result<Vec<u8>, RasterError> {
    let payload = data_url
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, b64)| b64)
        .ok_or_else(|| RasterError::PngEncode(format!("not an image data URL: {data_url:.32}")))?;
    STANDARD
        .decode(payload)
        .map_err(|e| RasterError::PngEncode(format!("invalid base64 payload: {e}")))
}

/// Revoke a Blob URL previously created by [`png_to_blob_url`] or
/// [`pixmap_to_blob_url`].
///
/// Best-effort: failures are silently ignored since the URL may have
/// already been revoked or garbage collected.
pub fn revoke_blob_url(url: &str) {
    let _ = web_sys::Url::revoke_object_url(url);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn data_url_round_trip() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let url = png_to_data_url(&bytes);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(data_url_to_bytes(&url).unwrap(), bytes);
    }

    #[test]
    fn data_url_accepts_other_image_formats() {
        let url = format!("data:image/jpeg;base64,{}", STANDARD.encode([1, 2, 3]));
        assert_eq!(data_url_to_bytes(&url).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn non_data_url_is_rejected() {
        assert!(data_url_to_bytes("https://example.com/a.png").is_err());
        assert!(data_url_to_bytes("data:text/plain;base64,aGk=").is_err());
    }

    #[test]
    fn malformed_base64_is_rejected() {
        assert!(data_url_to_bytes("data:image/png;base64,!!!").is_err());
    }
}
