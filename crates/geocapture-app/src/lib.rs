//! GeoCapture Application
//!
//! Desktop shell around the geometry capture editor: the map canvas, the
//! toolbar, and a form panel that receives every geometry change.

mod app;
mod canvas;
mod file_ops;
mod shortcuts;
mod ui;

pub use app::{AppConfig, GeoCaptureApp};
pub use file_ops::{FileError, read_geometries, write_geometries};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{MapStatus, UiAction, UiState, render_ui};
