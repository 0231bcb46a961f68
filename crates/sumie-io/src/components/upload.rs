//! File upload component with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;

/// Allowed file extensions for image uploads.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

/// Check whether a filename has an allowed image extension.
fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|a| a.eq_ignore_ascii_case(ext))
    })
}

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Called with the raw file bytes and filename after a successful upload.
    on_upload: EventHandler<(Vec<u8>, String)>,
}

/// A drag-and-drop zone with a file picker button.
///
/// Accepts PNG, JPEG, BMP, and WebP images. When a file is selected
/// (via the picker or drag-and-drop), reads the bytes and fires
/// `on_upload` with `(bytes, filename)`. Decode errors are the
/// session's concern; this component only validates the extension.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    // Validate, read, and forward the first file from a list. Shared
    // by the file-picker and drag-and-drop paths.
    let process_files = move |files: Vec<FileData>| async move {
        if let Some(file) = files.first() {
            let name = file.name();
            if !has_allowed_extension(&name) {
                error.set(Some(format!("Unsupported file type: {name}")));
                return;
            }
            match file.read_bytes().await {
                Ok(bytes) => {
                    error.set(None);
                    props.on_upload.call((bytes.to_vec(), name));
                }
                Err(e) => {
                    error.set(Some(format!("Failed to read file: {e}")));
                }
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let zone_class = if dragging() {
        "upload-zone upload-zone-active"
    } else {
        "upload-zone"
    };

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            if let Some(ref err) = error() {
                p { class: "upload-error", "{err}" }
            }

            p { class: "upload-text", "Drop an image here or " }

            label { class: "upload-button",
                input {
                    r#type: "file",
                    accept: ".png,.jpg,.jpeg,.bmp,.webp",
                    class: "upload-input",
                    onchange: handle_files,
                }
                "Choose File"
            }

            p { class: "upload-formats", "PNG, JPEG, BMP, WebP" }
        }
    }
}
