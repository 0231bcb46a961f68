//! sumie-io: Browser I/O and Dioxus component library.
//!
//! Handles file uploads, Blob URL rendering, data-URL encoding for the
//! edit API, PNG downloads, and provides the UI components for the
//! sumie web application.

pub mod api;
pub mod components;
pub mod download;
pub mod raster;

pub use api::{ApiError, send_edit_request};
pub use components::{EditPanel, EditorCanvas, FileUpload, Toolbar};
