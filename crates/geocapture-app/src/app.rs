//! Application state and lifecycle.

use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use geocapture_core::{
    BaseLayer, BaseLayerPreference, EditorConfig, EditorProps, FileStore, GeometryCaptureEditor,
    GeometryPair, KeyEvent, LonLat, MapPreferences, MemoryStore, PreferenceStore,
};
use kurbo::Size;

use crate::canvas::MapCanvas;
use crate::file_ops::{pick_open_path, pick_save_path, read_geometries, write_geometries};
use crate::shortcuts::ShortcutRegistry;
use crate::ui::{MapStatus, UiAction, UiState, render_ui};

/// Environment variable naming an editor config JSON file.
pub const CONFIG_ENV: &str = "GEOCAPTURE_CONFIG";

/// Rotation applied by one rotate shortcut.
const ROTATE_STEP: f64 = PI / 12.0;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub editor: EditorConfig,
    /// Geometries the editor is first mounted with.
    pub initial: EditorProps,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "GeoCapture".to_string(),
            width: 1280.0,
            height: 800.0,
            editor: EditorConfig::default(),
            initial: EditorProps::default(),
        }
    }
}

impl AppConfig {
    /// Build the config from `GEOCAPTURE_CONFIG` and an optional GeoJSON path argument.
    ///
    /// Problems are logged and the defaults kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            match EditorConfig::load(Path::new(&path)) {
                Ok(editor) => {
                    log::info!("Loaded editor config from {}", path);
                    config.editor = editor;
                }
                Err(e) => log::error!("Ignoring editor config {}: {}", path, e),
            }
        }

        if let Some(path) = std::env::args().nth(1) {
            match read_geometries(Path::new(&path)) {
                Ok(pair) => config.initial = pair.into(),
                Err(e) => log::error!("Could not open {}: {}", path, e),
            }
        }

        config
    }
}

fn open_store() -> Box<dyn PreferenceStore> {
    match FileStore::default_location() {
        Ok(store) => {
            log::debug!("Preferences stored in {}", store.base_path().display());
            Box::new(store)
        }
        Err(e) => {
            log::warn!("Preferences will not persist: {}", e);
            Box::new(MemoryStore::new())
        }
    }
}

/// The desktop app. It plays the caller: it owns the form copy of the
/// geometries and only ever receives them through the editor callback.
pub struct GeoCaptureApp {
    editor_config: EditorConfig,
    editor: Option<GeometryCaptureEditor>,
    /// Props for the next mount. The editor mounts lazily once the canvas size is known.
    pending: Option<EditorProps>,
    form: Rc<RefCell<GeometryPair>>,
    change_count: Rc<Cell<usize>>,
    preference: BaseLayerPreference,
    store: Box<dyn PreferenceStore>,
    canvas: MapCanvas,
    ui_state: UiState,
    cursor: Option<LonLat>,
}

impl GeoCaptureApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let store = open_store();
        let preference = BaseLayerPreference::new(store.load_or_default().base_layer);

        Self {
            editor_config: config.editor,
            editor: None,
            pending: Some(config.initial),
            form: Rc::new(RefCell::new(GeometryPair::default())),
            change_count: Rc::new(Cell::new(0)),
            preference,
            store,
            canvas: MapCanvas::new(),
            ui_state: UiState::default(),
            cursor: None,
        }
    }

    fn mount(&mut self, props: EditorProps, viewport: Size) {
        // Unmount first so the old session is disposed before the new one exists
        self.editor = None;

        let form = Rc::clone(&self.form);
        let change_count = Rc::clone(&self.change_count);
        let editor = GeometryCaptureEditor::mount(
            props,
            viewport,
            &self.editor_config,
            self.preference.clone(),
            Box::new(move |point, polygon| {
                *form.borrow_mut() = GeometryPair::new(point, polygon);
                change_count.set(change_count.get() + 1);
            }),
        );

        // Skipped initial geometries never reach the form
        *self.form.borrow_mut() = editor.current_geometries();
        self.editor = Some(editor);
    }

    fn status(&self) -> MapStatus {
        let mut status = MapStatus {
            base_layer: self.preference.get(),
            cursor: self.cursor,
            geometries: self.form.borrow().clone(),
            change_count: self.change_count.get(),
            ..MapStatus::default()
        };
        if let Some(editor) = &self.editor {
            let view = editor.session().view();
            status.mode = editor.mode();
            status.bearing = view.rotation();
            status.zoom = view.zoom();
        }
        status
    }

    fn save_preferences(&self) {
        let prefs = MapPreferences {
            base_layer: self.preference.get(),
        };
        if let Err(e) = self.store.save(&prefs) {
            log::warn!("Failed to save preferences: {}", e);
        }
    }

    fn set_base_layer(&mut self, layer: BaseLayer) {
        if self.preference.get() != layer {
            self.preference.set(layer);
            self.save_preferences();
        }
    }

    fn handle_action(&mut self, action: UiAction) {
        log::debug!("UI action: {:?}", action);
        match action {
            UiAction::ToggleBaseLayer => {
                if let Some(editor) = &mut self.editor {
                    editor.toggle_base_layer();
                    self.save_preferences();
                }
            }
            UiAction::SetBaseLayer(layer) => self.set_base_layer(layer),
            UiAction::OpenGeoJson => self.open_geojson(),
            UiAction::SaveGeoJson => self.save_geojson(),
            action => {
                let Some(editor) = &mut self.editor else {
                    return;
                };
                match action {
                    UiAction::StartPoint => editor.start_point(),
                    UiAction::StartPolygon => editor.start_polygon(),
                    UiAction::ResetRotation => editor.reset_rotation(Instant::now()),
                    UiAction::RotateLeft => editor.rotate_by(-ROTATE_STEP),
                    UiAction::RotateRight => editor.rotate_by(ROTATE_STEP),
                    UiAction::ClearAll => editor.clear(),
                    UiAction::CancelDrawing => {
                        editor.handle_key(&KeyEvent::Pressed("Escape".to_string()))
                    }
                    UiAction::ToggleBaseLayer
                    | UiAction::SetBaseLayer(_)
                    | UiAction::OpenGeoJson
                    | UiAction::SaveGeoJson => {}
                }
            }
        }
    }

    fn open_geojson(&mut self) {
        let Some(path) = pick_open_path() else {
            return;
        };
        match read_geometries(&path) {
            Ok(pair) => {
                self.ui_state.notice = None;
                self.pending = Some(pair.into());
            }
            Err(e) => {
                log::error!("Failed to open {}: {}", path.display(), e);
                self.ui_state.notice = Some(format!("Could not open file: {e}"));
            }
        }
    }

    fn save_geojson(&mut self) {
        let Some(path) = pick_save_path() else {
            return;
        };
        if let Err(e) = write_geometries(&path, &self.form.borrow()) {
            log::error!("Failed to save {}: {}", path.display(), e);
            self.ui_state.notice = Some(format!("Could not save file: {e}"));
        } else {
            self.ui_state.notice = None;
        }
    }
}

impl eframe::App for GeoCaptureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = ShortcutRegistry::collect(ctx);

        let status = self.status();
        if let Some(action) = render_ui(ctx, &mut self.ui_state, &status) {
            actions.push(action);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                if let Some(props) = self.pending.take() {
                    self.mount(props, Size::new(rect.width() as f64, rect.height() as f64));
                }
                if let Some(editor) = &mut self.editor {
                    self.cursor = self.canvas.show(ui, editor);
                }
            });

        for action in actions {
            self.handle_action(action);
        }
    }
}
