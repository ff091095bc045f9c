//! The owned map session: view, overlays, base layer and interactions.
//!
//! Everything passed in or out of the session is lon/lat; projected metres and
//! screen pixels stay inside.

use std::time::Instant;

use kurbo::{Point, Size};

use crate::base_layer::{BaseLayer, BaseLayerPreference};
use crate::config::EditorConfig;
use crate::draw::{
    DrawEvent, DrawKind, DrawSession, Handled, MapGesture, PointerDrawSession, Sketch,
    SketchPreview,
};
use crate::geometry::{GeoPoint, GeoPolygon, GeometryPair, LonLat};
use crate::input::{InputState, KeyEvent, MouseButton, PointerEvent};
use crate::overlay::{Overlays, PointFeature, PolygonFeature};
use crate::projection::{to_lon_lat, to_map};
use crate::view::MapView;

/// A map with one point slot and one polygon slot.
pub struct MapSession {
    view: MapView,
    overlays: Overlays,
    base_layer: BaseLayerPreference,
    input: InputState,
    draw: Box<dyn DrawSession>,
    hit_tolerance_px: f64,
    zoom_step: f64,
    /// The current press started on empty map and drags pan the view.
    panning: bool,
}

impl MapSession {
    /// Create a session using the built-in pointer draw session.
    pub fn new(viewport: Size, config: &EditorConfig, base_layer: BaseLayerPreference) -> Self {
        Self::with_draw_session(
            viewport,
            config,
            base_layer,
            Box::new(PointerDrawSession::new()),
        )
    }

    /// Create a session with a custom draw session implementation.
    pub fn with_draw_session(
        viewport: Size,
        config: &EditorConfig,
        base_layer: BaseLayerPreference,
        draw: Box<dyn DrawSession>,
    ) -> Self {
        let mut view = MapView::new(viewport).with_animation_duration(config.rotation_animation());
        view.min_zoom = config.min_zoom;
        view.max_zoom = config.max_zoom;
        view.resize(viewport);
        view.center_on(to_map(config.default_center), config.default_zoom);
        log::debug!(
            "Created map session ({}x{}, {} base layer)",
            viewport.width,
            viewport.height,
            base_layer.get().label()
        );
        Self {
            view,
            overlays: Overlays::default(),
            base_layer,
            input: InputState::new(),
            draw,
            hit_tolerance_px: config.hit_tolerance_px,
            zoom_step: config.zoom_step,
            panning: false,
        }
    }

    // --- Overlays -----------------------------------------------------------

    /// Add or replace the point overlay.
    pub fn set_point(&mut self, position: LonLat) {
        self.overlays.point = Some(PointFeature::new(to_map(position)));
    }

    /// Remove the point overlay, returning it.
    pub fn clear_point(&mut self) -> Option<PointFeature> {
        self.overlays.point.take()
    }

    /// Add or replace the polygon overlay from open-ring vertices.
    pub fn set_polygon(&mut self, vertices: &[LonLat]) {
        let projected = vertices.iter().map(|v| to_map(*v)).collect();
        self.overlays.polygon = Some(PolygonFeature::new(projected));
    }

    /// Remove the polygon overlay, returning it.
    pub fn clear_polygon(&mut self) -> Option<PolygonFeature> {
        self.overlays.polygon.take()
    }

    /// Put back a previously removed point overlay.
    pub fn restore_point(&mut self, feature: PointFeature) {
        self.overlays.point = Some(feature);
    }

    /// Put back a previously removed polygon overlay.
    pub fn restore_polygon(&mut self, feature: PolygonFeature) {
        self.overlays.polygon = Some(feature);
    }

    /// The point overlay in lon/lat.
    pub fn point(&self) -> Option<GeoPoint> {
        self.overlays
            .point
            .as_ref()
            .map(|p| GeoPoint::at(to_lon_lat(p.position)))
    }

    /// The polygon overlay in lon/lat, with a closed ring.
    pub fn polygon(&self) -> Option<GeoPolygon> {
        self.overlays.polygon.as_ref().map(|p| {
            let ring: Vec<LonLat> = p.vertices().iter().map(|v| to_lon_lat(*v)).collect();
            GeoPolygon::from_ring(&ring)
        })
    }

    pub fn geometries(&self) -> GeometryPair {
        GeometryPair::new(self.point(), self.polygon())
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    // --- Base layer ---------------------------------------------------------

    pub fn base_layer(&self) -> BaseLayer {
        self.base_layer.get()
    }

    pub fn set_base_layer(&mut self, layer: BaseLayer) {
        self.base_layer.set(layer);
    }

    pub fn toggle_base_layer(&mut self) -> BaseLayer {
        self.base_layer.toggle()
    }

    // --- View ---------------------------------------------------------------

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn center_on(&mut self, position: LonLat, zoom: f64) {
        self.view.center_on(to_map(position), zoom);
    }

    /// Fit the view to the polygon overlay. Returns false if there is none.
    pub fn fit_to_polygon(&mut self, padding: f64, max_zoom: f64) -> bool {
        match self.overlays.polygon.as_ref().and_then(PolygonFeature::bounds) {
            Some(extent) => {
                self.view.fit_extent(extent, padding, max_zoom);
                true
            }
            None => false,
        }
    }

    pub fn resize(&mut self, viewport: Size) {
        self.view.resize(viewport);
    }

    pub fn rotate_by(&mut self, radians: f64) {
        self.view.rotate_by(radians);
    }

    /// Animate the bearing back to north-up. Overlays are untouched.
    pub fn reset_rotation(&mut self, now: Instant) {
        self.view.reset_rotation(now);
    }

    /// Advance animations. Returns true while a repaint is still needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.view.tick(now)
    }

    /// Convert a map point to screen pixels, for rendering.
    pub fn to_screen(&self, map_point: Point) -> Point {
        self.view.map_to_screen(map_point)
    }

    /// Convert screen pixels to lon/lat.
    pub fn screen_to_lon_lat(&self, screen_point: Point) -> LonLat {
        to_lon_lat(self.view.screen_to_map(screen_point))
    }

    // --- Interactions -------------------------------------------------------

    pub fn start_draw(&mut self, kind: DrawKind) {
        self.draw.start(kind);
    }

    pub fn cancel_draw(&mut self) {
        self.draw.cancel();
    }

    pub fn active_draw(&self) -> Option<DrawKind> {
        self.draw.active()
    }

    pub fn preview(&self) -> Option<SketchPreview<'_>> {
        self.draw.preview()
    }

    /// Abort a vertex drag in progress, restoring the vertex.
    pub fn cancel_modify(&mut self) {
        self.draw.cancel_modify(&mut self.overlays);
    }

    /// Handle a pointer event stamped with the current time.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<DrawEvent> {
        self.handle_pointer_at(event, Instant::now())
    }

    /// Handle a pointer event that happened at `now`.
    ///
    /// Completed sketches are committed to the overlays before the event is
    /// returned, replacing any geometry of the same kind.
    pub fn handle_pointer_at(&mut self, event: &PointerEvent, now: Instant) -> Option<DrawEvent> {
        let was_pressed = self.input.drag_start.is_some();
        self.input.handle_pointer_event_at(event, now);
        let tolerance = self.hit_tolerance_px * self.view.resolution();
        let at = self.view.screen_to_map(event.position());

        let handled = match *event {
            PointerEvent::Down {
                button: MouseButton::Left,
                ..
            } => {
                let handled = self
                    .draw
                    .handle(MapGesture::Press { at }, &mut self.overlays, tolerance);
                self.panning = handled == Handled::Ignored;
                handled
            }
            PointerEvent::Down { .. } => Handled::Ignored,
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } if was_pressed => {
                let double = self.input.is_double_click();
                let was_click = self.input.finish_press();
                self.panning = false;
                let gesture = if was_click {
                    MapGesture::Click { at, double }
                } else {
                    MapGesture::Release { at }
                };
                let handled = self.draw.handle(gesture, &mut self.overlays, tolerance);
                if was_click && double && handled == Handled::Ignored {
                    self.view.zoom_at(position, 2.0);
                }
                handled
            }
            PointerEvent::Up { .. } => Handled::Ignored,
            PointerEvent::Move { .. } => {
                if !was_pressed {
                    self.draw
                        .handle(MapGesture::Hover { at }, &mut self.overlays, tolerance)
                } else if self.draw.is_modifying() {
                    if self.input.is_dragging() {
                        self.draw
                            .handle(MapGesture::Drag { at }, &mut self.overlays, tolerance)
                    } else {
                        Handled::Consumed
                    }
                } else {
                    if self.panning {
                        self.view.pan_by(self.input.pointer_delta());
                    }
                    Handled::Ignored
                }
            }
            PointerEvent::Scroll { position, delta } => {
                if delta.y != 0.0 {
                    let levels = delta.y.signum() * self.zoom_step;
                    self.view.zoom_at(position, 2f64.powf(levels));
                }
                Handled::Ignored
            }
        };

        match handled {
            Handled::Event(event) => {
                if let DrawEvent::Completed(sketch) = &event {
                    self.commit_sketch(sketch.clone());
                }
                Some(event)
            }
            Handled::Ignored | Handled::Consumed => None,
        }
    }

    /// Track key state.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        self.input.handle_key_event(event);
    }

    fn commit_sketch(&mut self, sketch: Sketch) {
        match sketch {
            Sketch::Point(position) => {
                self.overlays.point = Some(PointFeature::new(position));
            }
            Sketch::Polygon(vertices) => {
                self.overlays.polygon = Some(PolygonFeature::new(vertices));
            }
        }
    }
}

impl Drop for MapSession {
    fn drop(&mut self) {
        log::debug!("Disposing map session");
    }
}
