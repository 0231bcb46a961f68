//! Dioxus UI components for sumie.
//!
//! Provides the interactive editing canvas, the tool/brush toolbar,
//! the prompt panel, and the file upload zone.

mod edit_panel;
mod editor_canvas;
mod toolbar;
mod upload;

pub use edit_panel::EditPanel;
pub use editor_canvas::EditorCanvas;
pub use toolbar::Toolbar;
pub use upload::FileUpload;
