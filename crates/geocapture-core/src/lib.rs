//! GeoCapture Core Library
//!
//! Platform-agnostic geometry capture: one point and one polygon over a map,
//! with draw/modify interactions and change notification.

pub mod base_layer;
pub mod config;
pub mod draw;
pub mod editor;
pub mod geometry;
pub mod input;
pub mod map_session;
pub mod overlay;
pub mod projection;
pub mod storage;
pub mod view;

pub use base_layer::{BaseLayer, BaseLayerPreference};
pub use config::{ConfigError, EditorConfig};
pub use draw::{DrawEvent, DrawKind, DrawMode, DrawSession, PointerDrawSession, Sketch, SketchPreview};
pub use editor::{EditorProps, GeometryCallback, GeometryCaptureEditor};
pub use geometry::{GeoPoint, GeoPolygon, GeometryError, GeometryPair, LonLat};
pub use input::{InputState, KeyEvent, MouseButton, PointerEvent};
pub use map_session::MapSession;
pub use overlay::{FeatureId, Overlays, VertexTarget};
pub use storage::{FileStore, MapPreferences, MemoryStore, PreferenceStore, StorageError};
pub use view::MapView;
