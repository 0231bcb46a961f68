//! Tool selection, brush size, and canvas housekeeping controls.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdBrush, LdDownload, LdEraser, LdImageOff, LdTrash2};
use sumie_editor::{EditorSession, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE, ToolMode};

/// Props for the [`Toolbar`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ToolbarProps {
    /// Shared editing session.
    session: Signal<EditorSession>,
    /// Bumped when the mask layer changes (clear).
    mask_revision: Signal<u64>,
    /// Bumped when the source image changes (clear all).
    image_revision: Signal<u64>,
    /// Fired when the user requests an image download.
    on_download: EventHandler<()>,
}

/// Paint/erase toggle, brush size slider, zoom readout, and the
/// clear/download actions.
#[component]
pub fn Toolbar(props: ToolbarProps) -> Element {
    let mut session = props.session;
    let mut mask_revision = props.mask_revision;
    let mut image_revision = props.image_revision;

    let (tool, brush_size, has_image, scale) = {
        let s = session.read();
        (s.tool(), s.brush_size(), s.has_image(), s.viewport().scale())
    };
    let zoom_percent = (scale * 100.0).round();

    let tool_class = |t: ToolMode| {
        if t == tool {
            "tool-button tool-button-active"
        } else {
            "tool-button"
        }
    };

    rsx! {
        div { class: "toolbar",
            div { class: "toolbar-group",
                button {
                    class: tool_class(ToolMode::Paint),
                    title: "Paint mask",
                    onclick: move |_| session.write().set_tool(ToolMode::Paint),
                    Icon { width: 16, height: 16, icon: LdBrush }
                }
                button {
                    class: tool_class(ToolMode::Erase),
                    title: "Erase mask",
                    onclick: move |_| session.write().set_tool(ToolMode::Erase),
                    Icon { width: 16, height: 16, icon: LdEraser }
                }
            }

            div { class: "toolbar-group",
                label { class: "toolbar-label", r#for: "brush-size", "Brush" }
                input {
                    id: "brush-size",
                    r#type: "range",
                    min: "{MIN_BRUSH_SIZE}",
                    max: "{MAX_BRUSH_SIZE}",
                    step: "1",
                    value: "{brush_size}",
                    oninput: move |evt| {
                        if let Ok(v) = evt.value().parse::<f64>() {
                            session.write().set_brush_size(v);
                        }
                    },
                }
                span { class: "toolbar-value", "{brush_size:.0}px" }
            }

            div { class: "toolbar-group",
                span { class: "toolbar-value", title: "Zoom (wheel over canvas)",
                    "{zoom_percent:.0}%"
                }
            }

            div { class: "toolbar-group",
                button {
                    class: "tool-button",
                    title: "Clear mask strokes",
                    disabled: !has_image,
                    onclick: move |_| {
                        session.write().clear_mask();
                        mask_revision += 1;
                    },
                    Icon { width: 16, height: 16, icon: LdTrash2 }
                }
                button {
                    class: "tool-button",
                    title: "Remove image and mask",
                    disabled: !has_image,
                    onclick: move |_| {
                        session.write().clear_all();
                        mask_revision += 1;
                        image_revision += 1;
                    },
                    Icon { width: 16, height: 16, icon: LdImageOff }
                }
                button {
                    class: "tool-button",
                    title: "Download image as PNG",
                    disabled: !has_image,
                    onclick: move |_| props.on_download.call(()),
                    Icon { width: 16, height: 16, icon: LdDownload }
                }
            }
        }
    }
}
