//! File download via Blob URLs.
//!
//! Dioxus has no built-in file download API.  This module triggers
//! downloads by creating a `Blob`, generating an object URL, and
//! programmatically clicking a temporary `<a>` element.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur when triggering a file download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Trigger a binary file download in the browser.
///
/// Creates a `Blob` from `data`, generates an object URL, and
/// programmatically clicks a temporary `<a download="filename">`
/// element. The object URL is revoked after the click.
///
/// # Errors
///
/// Returns [`DownloadError::JsError`] if any browser API call fails
/// (e.g., `Blob` creation, `URL.createObjectURL`, element creation).
pub fn trigger_download(data: &[u8], filename: &str, mime_type: &str) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;

    let uint8_array = js_sys::Uint8Array::from(data);
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    opts.set_type(mime_type);

    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| DownloadError::JsError("element is not an anchor".into()))?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    web_sys::Url::revoke_object_url(&url)?;
    Ok(())
}
