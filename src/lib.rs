// ABOUTME: Library module for the slidecraft program.
// ABOUTME: Deck model, edit engine, editing bridge, chart geometry and HTML export.

pub mod bridge;
pub mod charts;
pub mod config;
pub mod debounce;
pub mod edit;
pub mod errors;
pub mod export;
pub mod html;
pub mod markup;
pub mod model;
pub mod render;
pub mod resources;
pub mod session;
pub mod themes;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use bridge::{Bridge, Command, InlineFormat, Response, SurfaceEvent, ViewUpdate};
pub use config::Config;
pub use edit::{Column, FieldPath, TextField};
pub use errors::{Refusal, Result, SlideError};
pub use export::{load_deck, save_deck, suggested_filename, write_document};
pub use html::{render_document, ExportOptions};
pub use model::{Deck, Slide, SlideKind};
pub use resources::{ResourceFile, ResourceMode};
pub use session::EditorSession;
pub use themes::{Theme, ThemeCatalog, ThemeStyle};
pub use watch::{watch_deck, WatchConfig};

#[cfg(test)]
mod tests;
