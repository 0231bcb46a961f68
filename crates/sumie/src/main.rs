use dioxus::prelude::*;
use sumie_editor::{Dimensions, EditorSession};
use sumie_io::{EditPanel, EditorCanvas, FileUpload, Toolbar, raster};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

/// Stage size used before the browser window has been measured.
const FALLBACK_STAGE: Dimensions = Dimensions {
    width: 960,
    height: 640,
};

/// Margin reserved around the stage for the toolbar and sidebar.
const STAGE_MARGIN_X: f64 = 400.0;
const STAGE_MARGIN_Y: f64 = 220.0;

fn main() {
    dioxus::launch(app);
}

/// Root application component.
///
/// Owns the editing session and wires the canvas, toolbar, prompt
/// panel, and upload zone together. Layer data lives in the session;
/// the revision signals exist only to tell the UI when to re-encode
/// rasters.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let mut session = use_signal(|| EditorSession::new(FALLBACK_STAGE));
    let mut mask_revision = use_signal(|| 0u64);
    let mut image_revision = use_signal(|| 0u64);
    let mut filename = use_signal(|| String::from("edited"));
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    // Size the stage to the measured window at startup and again on
    // every window resize; resizing re-centers the image layer and
    // re-rasterizes the overlay at the new stage dimensions.
    use_effect(move || {
        let mut apply_stage_size = move || {
            if let Some(size) = measured_stage_size() {
                session.write().resize(size);
                mask_revision += 1;
            }
        };
        apply_stage_size();

        if let Some(window) = web_sys::window() {
            let onresize = Closure::<dyn FnMut()>::new(move || apply_stage_size());
            window.set_onresize(Some(onresize.as_ref().unchecked_ref()));
            // The listener lives for the whole app lifetime.
            onresize.forget();
        }
    });

    // Subscribe to image changes only, not to every session write.
    let has_image = {
        let _ = image_revision();
        session.peek().has_image()
    };

    // --- File upload handler ---
    let on_upload = move |(bytes, name): (Vec<u8>, String)| {
        let base_name = name
            .rsplit_once('.')
            .map_or(name.as_str(), |(base, _)| base)
            .to_owned();
        let load_result = session.write().load_image(&bytes);
        match load_result {
            Ok(()) => {
                filename.set(base_name);
                error.set(None);
                // Strokes drawn for the previous image do not carry over.
                session.write().clear_mask();
                image_revision += 1;
                mask_revision += 1;
            }
            Err(e) => {
                error.set(Some(format!("{e}")));
            }
        }
    };

    // --- Edit submission handler ---
    // Flattens the layers, posts them with the prompt, and replaces
    // the source image with whatever the model sends back.
    let on_submit = move |prompt: String| {
        busy.set(true);
        error.set(None);

        spawn(async move {
            // Yield so the browser paints the busy state before the
            // synchronous flattening work.
            gloo_timers::future::TimeoutFuture::new(0).await;

            let exported = match session.peek().export_for_edit() {
                Ok(exported) => exported,
                Err(e) => {
                    error.set(Some(format!("{e}")));
                    busy.set(false);
                    return;
                }
            };

            let image_url = raster::png_to_data_url(&exported.image);
            let mask_url = raster::png_to_data_url(&exported.mask);

            let outcome =
                sumie_io::send_edit_request(&prompt, Some(&image_url), Some(&mask_url)).await;

            match outcome.and_then(|data_url| {
                raster::data_url_to_bytes(&data_url)
                    .map_err(|e| sumie_io::ApiError::JsError(e.to_string()))
            }) {
                Ok(bytes) => {
                    let result = session.write().load_image(&bytes);
                    match result {
                        Ok(()) => {
                            session.write().clear_mask();
                            image_revision += 1;
                            mask_revision += 1;
                        }
                        Err(e) => {
                            error.set(Some(format!("edited image: {e}")));
                        }
                    }
                }
                Err(e) => {
                    error.set(Some(format!("{e}")));
                }
            }

            busy.set(false);
        });
    };

    // --- Download handler ---
    let on_download = move |()| match session.peek().export_image_default() {
        Ok(bytes) => {
            let name = format!("{}.png", filename.peek());
            if let Err(e) = sumie_io::download::trigger_download(&bytes, &name, "image/png") {
                error.set(Some(format!("Download failed: {e}")));
            }
        }
        Err(e) => {
            error.set(Some(format!("{e}")));
        }
    };

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/app.css") }

        div { class: "app",
            header { class: "app-header",
                h1 { class: "app-title", "sumie" }
                p { class: "app-tagline", "Paint a mask, describe the edit, let the model repaint it" }
            }

            div { class: "app-body",
                div { class: "app-canvas",
                    if has_image {
                        EditorCanvas {
                            session: session,
                            mask_revision: mask_revision,
                            image_revision: image_revision,
                        }
                    } else {
                        div { class: "app-placeholder",
                            p { "Upload an image to get started" }
                        }
                    }

                    if let Some(ref err) = error() {
                        div { class: "app-error",
                            p { "{err}" }
                        }
                    }
                }

                div { class: "app-sidebar",
                    Toolbar {
                        session: session,
                        mask_revision: mask_revision,
                        image_revision: image_revision,
                        on_download: on_download,
                    }
                    EditPanel {
                        has_image: has_image,
                        busy: busy(),
                        on_submit: on_submit,
                    }
                }
            }

            div { class: "app-footer",
                FileUpload {
                    on_upload: on_upload,
                }
            }
        }
    }
}

/// Stage size derived from the browser window, leaving room for the
/// surrounding chrome.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn measured_stage_size() -> Option<Dimensions> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Dimensions {
        width: ((width - STAGE_MARGIN_X).max(320.0)) as u32,
        height: ((height - STAGE_MARGIN_Y).max(240.0)) as u32,
    })
}
