//! Edit-request client for the backend image editing API.
//!
//! Sends the prompt plus flattened image/mask data URLs to
//! `POST /api/image-edit` and returns the edited image the model
//! produced. The request body mirrors the Gemini-style
//! `contents.parts` structure the backend proxies upstream.

use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// Backend endpoint for edit requests.
const API_ENDPOINT: &str = "/api/image-edit";

/// Errors that can occur during an edit request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request serialization failed.
    #[error("failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),

    /// The server answered with a non-success status.
    #[error("server error (status {status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Server-provided error message, or the status text.
        message: String,
    },

    /// The server answered 200 but without an edited image.
    #[error("response contained no image data")]
    NoImage,
}

impl From<JsValue> for ApiError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// One part of the request content: either the text prompt or an
/// embedded image.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        #[serde(rename = "type")]
        kind: &'static str,
        text: String,
    },
    Image {
        #[serde(rename = "type")]
        kind: &'static str,
        image_url: ImageUrl,
    },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct Contents {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct EditRequest {
    contents: Contents,
}

/// Success and error response bodies share one shape: `data` carries
/// the edited image data URL, `message` carries an error description.
#[derive(Debug, Deserialize)]
struct EditResponse {
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Send an edit request: the prompt, the flattened source image, and
/// optionally the flattened mask, all as data URLs.
///
/// Returns the edited image as a `data:image/...` URL.
///
/// # Errors
///
/// Returns [`ApiError::Server`] for non-success HTTP statuses (with
/// the server's `message` when it sent one), [`ApiError::NoImage`]
/// when a success response carries no image, and [`ApiError::JsError`]
/// for fetch-level failures.
pub async fn send_edit_request(
    prompt: &str,
    image_data_url: Option<&str>,
    mask_data_url: Option<&str>,
) -> Result<String, ApiError> {
    let mut parts = vec![Part::Text {
        kind: "text",
        text: prompt.to_owned(),
    }];
    for url in [image_data_url, mask_data_url].into_iter().flatten() {
        parts.push(Part::Image {
            kind: "image_url",
            image_url: ImageUrl {
                url: url.to_owned(),
            },
        });
    }

    let body = serde_json::to_string(&EditRequest {
        contents: Contents { parts },
    })?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(&body));
    let request = Request::new_with_str_and_init(API_ENDPOINT, &opts)?;
    request.headers().set("Content-Type", "application/json")?;

    let window = web_sys::window().ok_or_else(|| ApiError::JsError("no global window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()
        .map_err(|_| ApiError::JsError("fetch did not return a Response".into()))?;

    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| ApiError::JsError("response body is not text".into()))?;

    // Error bodies are JSON too; fall back to the status text when the
    // body does not parse.
    let parsed: Option<EditResponse> = serde_json::from_str(&text).ok();

    if !response.ok() {
        let message = parsed
            .and_then(|r| r.message)
            .unwrap_or_else(|| response.status_text());
        return Err(ApiError::Server {
            status: response.status(),
            message,
        });
    }

    parsed.and_then(|r| r.data).ok_or(ApiError::NoImage)
}
