//! The editing stage: transformed image + mask overlay with unified
//! pointer gestures.
//!
//! One set of pointer handlers covers mouse, touch, and pen input:
//! primary-button drags draw, middle/right-button drags pan, and the
//! wheel zooms toward the cursor. The pan/zoom transform is applied
//! with CSS on a wrapper element, so layers only re-rasterize when the
//! mask actually changes, never while navigating.

use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use sumie_editor::{EditorSession, Point, ZoomDirection};

use crate::raster::{self, pixmap_to_blob_url, rgba_to_blob_url};

/// Wheel lines/pages to pixel conversion factors.
const LINE_HEIGHT_PX: f64 = 16.0;
const PAGE_HEIGHT_PX: f64 = 800.0;

/// Props for the [`EditorCanvas`] component.
#[derive(Props, Clone, PartialEq)]
pub struct EditorCanvasProps {
    /// Shared editing session.
    session: Signal<EditorSession>,
    /// Bumped whenever the mask layer (or the in-progress stroke)
    /// changes; drives overlay re-rasterization.
    mask_revision: Signal<u64>,
    /// Bumped whenever the source image is replaced or cleared.
    image_revision: Signal<u64>,
}

/// The interactive canvas: renders the image layer and the mask
/// overlay inside a CSS-transformed wrapper and feeds pointer gestures
/// into the session.
#[component]
#[allow(clippy::too_many_lines)]
pub fn EditorCanvas(props: EditorCanvasProps) -> Element {
    let mut session = props.session;
    let mut mask_revision = props.mask_revision;
    let image_revision = props.image_revision;

    let mut image_url = use_signal(|| Option::<String>::None);
    let mut overlay_url = use_signal(|| Option::<String>::None);
    // Last pointer position while a pan drag is active.
    let mut pan_anchor = use_signal(|| Option::<Point>::None);

    // Re-encode the image layer when a new image loads.
    use_effect(move || {
        let _ = image_revision();
        let url = session
            .peek()
            .image_layer()
            .and_then(|layer| rgba_to_blob_url(layer.image()).ok());
        if let Some(old) = image_url.peek().clone() {
            raster::revoke_blob_url(&old);
        }
        image_url.set(url);
    });

    // Re-rasterize the overlay when the mask changes.
    use_effect(move || {
        let _ = mask_revision();
        let url = match session.peek().render_overlay() {
            Ok(pixmap) => pixmap_to_blob_url(&pixmap).ok(),
            Err(e) => {
                web_sys::console::warn_1(&format!("overlay render failed: {e}").into());
                None
            }
        };
        if let Some(old) = overlay_url.peek().clone() {
            raster::revoke_blob_url(&old);
        }
        overlay_url.set(url);
    });

    let on_pointer_down = move |evt: PointerEvent| {
        evt.prevent_default();
        let at = pointer_position(&evt);
        match evt.trigger_button() {
            Some(MouseButton::Primary) => {
                if session.write().pointer_down(at) {
                    mask_revision += 1;
                }
            }
            Some(MouseButton::Auxiliary | MouseButton::Secondary) => {
                pan_anchor.set(Some(at));
            }
            _ => {}
        }
    };

    let on_pointer_move = move |evt: PointerEvent| {
        let at = pointer_position(&evt);
        if let Some(last) = pan_anchor() {
            session
                .write()
                .pan(Point::new(at.x - last.x, at.y - last.y));
            pan_anchor.set(Some(at));
        } else if session.peek().is_drawing() {
            if session.write().pointer_move(at) {
                mask_revision += 1;
            }
        }
    };

    // Shared by pointerup and pointerleave: a gesture that leaves the
    // stage ends there rather than resuming on re-entry.
    let mut end_gesture = move || {
        pan_anchor.set(None);
        if session.write().pointer_up() {
            mask_revision += 1;
        }
    };

    let on_wheel = move |evt: WheelEvent| {
        evt.prevent_default();
        let delta_y = match evt.delta() {
            WheelDelta::Pixels(v) => v.y,
            WheelDelta::Lines(v) => v.y * LINE_HEIGHT_PX,
            WheelDelta::Pages(v) => v.y * PAGE_HEIGHT_PX,
        };
        if delta_y == 0.0 {
            return;
        }
        let direction = if delta_y < 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        };
        let at = Point::new(evt.element_coordinates().x, evt.element_coordinates().y);
        session.write().zoom_at(at, direction);
    };

    // Reading the session subscribes this component, so pan/zoom
    // updates re-render the CSS transform below.
    let current = session.read();
    let viewport = current.viewport();
    let size = viewport.size();
    let offset = viewport.offset();
    let scale = viewport.scale();
    let fitted = current.image_layer().map(|layer| {
        let dims = layer.intrinsic_dimensions();
        (
            layer.offset(),
            f64::from(dims.width) * layer.fit_scale(),
            f64::from(dims.height) * layer.fit_scale(),
        )
    });

    rsx! {
        div {
            class: "editor-stage",
            style: "width: {size.width}px; height: {size.height}px;",
            onpointerdown: on_pointer_down,
            onpointermove: on_pointer_move,
            onpointerup: move |_| end_gesture(),
            onpointerleave: move |_| end_gesture(),
            onwheel: on_wheel,
            oncontextmenu: |evt| evt.prevent_default(),

            div {
                class: "editor-world",
                style: "transform: translate({offset.x}px, {offset.y}px) scale({scale});",

                if let (Some(url), Some((img_offset, w, h))) = (image_url(), fitted) {
                    img {
                        class: "editor-image",
                        src: "{url}",
                        style: "left: {img_offset.x}px; top: {img_offset.y}px; width: {w}px; height: {h}px;",
                        draggable: false,
                    }
                }

                if let Some(url) = overlay_url() {
                    img {
                        class: "editor-overlay",
                        src: "{url}",
                        style: "width: {size.width}px; height: {size.height}px;",
                        draggable: false,
                    }
                }
            }
        }
    }
}

/// Stage-relative pointer position. Child elements are
/// `pointer-events: none`, so the event target is always the stage.
fn pointer_position(evt: &PointerEvent) -> Point {
    let coords = evt.element_coordinates();
    Point::new(coords.x, coords.y)
}
