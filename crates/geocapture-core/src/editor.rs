//! The geometry capture editor: one point, one polygon, and a change callback.

use std::time::Instant;

use kurbo::Size;
use serde::{Deserialize, Serialize};

use crate::base_layer::{BaseLayer, BaseLayerPreference};
use crate::config::EditorConfig;
use crate::draw::{DrawEvent, DrawKind, DrawMode, Sketch};
use crate::geometry::{GeoPoint, GeoPolygon, GeometryError, GeometryPair};
use crate::input::{KeyEvent, PointerEvent};
use crate::map_session::MapSession;
use crate::overlay::{PointFeature, PolygonFeature};
use crate::projection::to_lon_lat;

/// Receives the full geometry pair after every committed change.
pub type GeometryCallback = Box<dyn FnMut(Option<GeoPoint>, Option<GeoPolygon>)>;

/// Initial geometries supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorProps {
    pub initial_location_point: Option<GeoPoint>,
    pub initial_area_polygon: Option<GeoPolygon>,
}

impl From<GeometryPair> for EditorProps {
    fn from(pair: GeometryPair) -> Self {
        Self {
            initial_location_point: pair.point,
            initial_area_polygon: pair.polygon,
        }
    }
}

/// Interactive editor for at most one point and at most one polygon.
///
/// While a draw is in progress the previous geometry of that kind is withdrawn
/// from the map. It is dropped when the draw completes and put back if the draw
/// is cancelled, so an abandoned attempt never loses committed data.
pub struct GeometryCaptureEditor {
    session: MapSession,
    withdrawn_point: Option<PointFeature>,
    withdrawn_polygon: Option<PolygonFeature>,
    on_geometry_change: GeometryCallback,
}

impl GeometryCaptureEditor {
    /// Mount the editor, rendering any valid initial geometries.
    ///
    /// The view centres on a valid initial point, otherwise fits a valid initial
    /// polygon, otherwise shows the configured default region. Mounting does not
    /// invoke the callback.
    pub fn mount(
        props: EditorProps,
        viewport: Size,
        config: &EditorConfig,
        base_layer: BaseLayerPreference,
        on_geometry_change: GeometryCallback,
    ) -> Self {
        let mut session = MapSession::new(viewport, config, base_layer);

        let point = props.initial_location_point.and_then(|point| {
            point
                .validate()
                .map(|()| point.position())
                .map_err(|e| report_skipped("location point", &e))
                .ok()
        });
        if let Some(position) = point {
            session.set_point(position);
        }

        let polygon = props.initial_area_polygon.and_then(|polygon| {
            if polygon.interior_ring_count() > 0 {
                log::warn!(
                    "Dropping {} interior ring(s) from initial area polygon",
                    polygon.interior_ring_count()
                );
            }
            polygon
                .validate()
                .map_err(|e| report_skipped("area polygon", &e))
                .ok()
        });
        if let Some(vertices) = &polygon {
            session.set_polygon(vertices);
        }

        if let Some(position) = point {
            session.center_on(position, config.point_zoom);
        } else if polygon.is_some() {
            session.fit_to_polygon(config.fit_padding, config.max_fit_zoom);
        }

        log::debug!(
            "Mounted geometry editor (point: {}, polygon: {})",
            point.is_some(),
            polygon.is_some()
        );

        Self {
            session,
            withdrawn_point: None,
            withdrawn_polygon: None,
            on_geometry_change,
        }
    }

    pub fn mode(&self) -> DrawMode {
        DrawMode::from(self.session.active_draw())
    }

    /// Start placing a new point, replacing the current one once placed.
    pub fn start_point(&mut self) {
        self.start(DrawKind::Point);
    }

    /// Start drawing a new boundary, replacing the current one once closed.
    pub fn start_polygon(&mut self) {
        self.start(DrawKind::Polygon);
    }

    fn start(&mut self, kind: DrawKind) {
        self.abandon_draw();
        match kind {
            DrawKind::Point => self.withdrawn_point = self.session.clear_point(),
            DrawKind::Polygon => self.withdrawn_polygon = self.session.clear_polygon(),
        }
        self.session.start_draw(kind);
        log::debug!("Started drawing {kind:?}");
    }

    /// Abandon the draw in progress and put back the geometry it would have replaced.
    pub fn cancel_drawing(&mut self) {
        if self.session.active_draw().is_some() {
            log::debug!("Cancelled drawing");
        }
        self.abandon_draw();
    }

    fn abandon_draw(&mut self) {
        self.session.cancel_draw();
        if let Some(point) = self.withdrawn_point.take() {
            self.session.restore_point(point);
        }
        if let Some(polygon) = self.withdrawn_polygon.take() {
            self.session.restore_polygon(polygon);
        }
    }

    /// Remove both geometries and report the empty pair.
    pub fn clear(&mut self) {
        self.session.cancel_draw();
        self.session.cancel_modify();
        self.session.clear_point();
        self.session.clear_polygon();
        self.withdrawn_point = None;
        self.withdrawn_polygon = None;
        self.emit();
    }

    /// Animate the bearing back to north. Geometries are untouched.
    pub fn reset_rotation(&mut self, now: Instant) {
        self.session.reset_rotation(now);
    }

    pub fn rotate_by(&mut self, radians: f64) {
        self.session.rotate_by(radians);
    }

    pub fn toggle_base_layer(&mut self) -> BaseLayer {
        let layer = self.session.toggle_base_layer();
        log::debug!("Base layer switched to {}", layer.label());
        layer
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        self.handle_pointer_at(event, Instant::now());
    }

    /// Route a pointer event, reporting any committed change.
    pub fn handle_pointer_at(&mut self, event: &PointerEvent, now: Instant) {
        match self.session.handle_pointer_at(event, now) {
            Some(DrawEvent::Completed(Sketch::Point(_))) => {
                self.withdrawn_point = None;
                self.emit();
            }
            Some(DrawEvent::Completed(Sketch::Polygon(_))) => {
                self.withdrawn_polygon = None;
                self.emit();
            }
            Some(DrawEvent::VerticesChanged) => self.emit(),
            None => {}
        }
    }

    /// Escape cancels a draw or a vertex drag.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        self.session.handle_key(event);
        if let KeyEvent::Pressed(key) = event {
            if key == "Escape" {
                self.session.cancel_modify();
                self.cancel_drawing();
            }
        }
    }

    /// Advance animations. Returns true while a repaint is still needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.session.tick(now)
    }

    pub fn resize(&mut self, viewport: Size) {
        self.session.resize(viewport);
    }

    /// The committed geometries, exactly as the callback would report them.
    pub fn current_geometries(&self) -> GeometryPair {
        let mut pair = self.session.geometries();
        if pair.point.is_none() {
            pair.point = self
                .withdrawn_point
                .as_ref()
                .map(|p| GeoPoint::at(to_lon_lat(p.position)));
        }
        if pair.polygon.is_none() {
            pair.polygon = self.withdrawn_polygon.as_ref().map(|p| {
                let ring: Vec<_> = p.vertices().iter().map(|v| to_lon_lat(*v)).collect();
                GeoPolygon::from_ring(&ring)
            });
        }
        pair
    }

    /// Read-only access for rendering.
    pub fn session(&self) -> &MapSession {
        &self.session
    }

    fn emit(&mut self) {
        let pair = self.current_geometries();
        log::info!(
            "Geometry changed (point: {}, polygon: {})",
            pair.point.is_some(),
            pair.polygon.is_some()
        );
        (self.on_geometry_change)(pair.point, pair.polygon);
    }
}

impl Drop for GeometryCaptureEditor {
    fn drop(&mut self) {
        log::debug!("Unmounting geometry editor");
    }
}

fn report_skipped(what: &str, error: &GeometryError) {
    if error.is_coordinate_fault() {
        log::error!("Skipping initial {what} with invalid coordinates: {error}");
    } else {
        log::warn!("Skipping malformed initial {what}: {error}");
    }
}
