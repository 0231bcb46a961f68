//! Prompt entry and edit submission.

use dioxus::prelude::*;

/// Props for the [`EditPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct EditPanelProps {
    /// Whether a source image is loaded (enables submission).
    has_image: bool,
    /// Whether an edit request is currently in flight.
    busy: bool,
    /// Fired with the prompt text when the user submits an edit.
    on_submit: EventHandler<String>,
}

/// Text prompt plus the "Apply edit" button.
///
/// Submission is disabled while no image is loaded, while a request is
/// in flight, or while the prompt is blank.
#[component]
pub fn EditPanel(props: EditPanelProps) -> Element {
    let mut prompt = use_signal(String::new);

    let can_submit = props.has_image && !props.busy && !prompt().trim().is_empty();
    let submit = move |_| {
        let text = prompt().trim().to_owned();
        if !text.is_empty() {
            props.on_submit.call(text);
        }
    };

    rsx! {
        div { class: "edit-panel",
            h3 { class: "edit-panel-heading", "Edit" }

            textarea {
                class: "edit-prompt",
                placeholder: "Describe the edit, e.g. \u{201c}replace the masked area with water\u{201d}",
                rows: 3,
                disabled: props.busy,
                value: "{prompt}",
                oninput: move |evt| prompt.set(evt.value()),
            }

            button {
                class: "edit-submit",
                disabled: !can_submit,
                onclick: submit,
                if props.busy { "Applying\u{2026}" } else { "Apply edit" }
            }

            p { class: "edit-hint",
                "Paint over the region to change. Left-drag paints, "
                "right-drag pans, wheel zooms."
            }
        }
    }
}
