//! The map canvas: paints the session and feeds it pointer input.

use std::time::Instant;

use egui::{
    Align2, Color32, CursorIcon, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2,
};
use geocapture_core::projection::{MAX_LATITUDE, to_lon_lat, to_map};
use geocapture_core::{
    BaseLayer, DrawKind, DrawMode, GeometryCaptureEditor, LonLat, MapSession, MouseButton,
    PointerEvent,
};
use geocapture_widgets::theme;
use kurbo::{Point, Size};

/// Graticule spacings in degrees, coarsest first.
const GRATICULE_STEPS: [f64; 16] = [
    30.0, 10.0, 5.0, 2.0, 1.0, 0.5, 0.2, 0.1, 0.05, 0.02, 0.01, 0.005, 0.002, 0.001, 0.0005,
    0.0002,
];

/// Pick a graticule spacing giving at least four lines across `span` degrees.
pub fn graticule_step(span: f64) -> f64 {
    GRATICULE_STEPS
        .iter()
        .copied()
        .find(|step| span / step >= 4.0)
        .unwrap_or(GRATICULE_STEPS[GRATICULE_STEPS.len() - 1])
}

fn to_kurbo(pos: Pos2, origin: Pos2) -> Point {
    Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
}

fn to_egui(point: Point, origin: Pos2) -> Pos2 {
    origin + vec2(point.x as f32, point.y as f32)
}

fn map_button(button: egui::PointerButton) -> Option<MouseButton> {
    match button {
        egui::PointerButton::Primary => Some(MouseButton::Left),
        egui::PointerButton::Secondary => Some(MouseButton::Right),
        egui::PointerButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Per-frame bridge between egui and the editor.
#[derive(Debug, Default)]
pub struct MapCanvas {
    /// A button went down over the map and has not been released yet.
    pressed_on_map: bool,
}

impl MapCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route input to the editor and paint it. Returns the pointer position in lon/lat.
    pub fn show(&mut self, ui: &mut Ui, editor: &mut GeometryCaptureEditor) -> Option<LonLat> {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, Sense::click_and_drag());
        editor.resize(Size::new(rect.width() as f64, rect.height() as f64));

        self.forward_input(ui, rect, response.hovered(), editor);

        if editor.tick(Instant::now()) {
            ui.ctx().request_repaint();
        }
        if response.hovered() && editor.mode() != DrawMode::Idle {
            ui.ctx().set_cursor_icon(CursorIcon::Crosshair);
        }

        let painter = ui.painter_at(rect);
        let session = editor.session();
        paint_base_layer(&painter, rect, session);
        paint_overlays(&painter, rect, session);
        paint_sketch(&painter, rect, session);
        paint_attribution(&painter, rect, session.base_layer());

        response
            .hover_pos()
            .map(|pos| session.screen_to_lon_lat(to_kurbo(pos, rect.min)))
    }

    fn forward_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        hovered: bool,
        editor: &mut GeometryCaptureEditor,
    ) {
        let (events, hover_pos) = ui.input(|i| (i.events.clone(), i.pointer.hover_pos()));
        let origin = rect.min;

        for event in events {
            let pointer_event = match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    let Some(button) = map_button(button) else {
                        continue;
                    };
                    let position = to_kurbo(pos, origin);
                    if pressed {
                        if !hovered {
                            continue;
                        }
                        if button == MouseButton::Left {
                            self.pressed_on_map = true;
                        }
                        PointerEvent::Down { position, button }
                    } else {
                        if button == MouseButton::Left {
                            if !self.pressed_on_map {
                                continue;
                            }
                            self.pressed_on_map = false;
                        }
                        PointerEvent::Up { position, button }
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    if !hovered && !self.pressed_on_map {
                        continue;
                    }
                    PointerEvent::Move {
                        position: to_kurbo(pos, origin),
                    }
                }
                egui::Event::MouseWheel { delta, .. } => {
                    let Some(pos) = hover_pos.filter(|_| hovered) else {
                        continue;
                    };
                    if delta.y == 0.0 {
                        continue;
                    }
                    PointerEvent::Scroll {
                        position: to_kurbo(pos, origin),
                        delta: kurbo::Vec2::new(0.0, delta.y.signum() as f64),
                    }
                }
                _ => continue,
            };
            editor.handle_pointer(&pointer_event);
        }
    }
}

fn paint_base_layer(painter: &Painter, rect: Rect, session: &MapSession) {
    let layer = session.base_layer();
    let [r, g, b] = layer.background_rgb();
    painter.rect_filled(rect, 0.0, Color32::from_rgb(r, g, b));

    let line_color = match layer {
        BaseLayer::Street => Color32::from_gray(214),
        BaseLayer::Satellite => Color32::from_white_alpha(40),
    };
    let stroke = Stroke::new(1.0, line_color);

    let extent = session.view().visible_extent();
    let sw = to_lon_lat(Point::new(extent.x0, extent.y0));
    let ne = to_lon_lat(Point::new(extent.x1, extent.y1));
    let (west, east) = (sw.lon.max(-180.0), ne.lon.min(180.0));
    let (south, north) = (sw.lat.max(-MAX_LATITUDE), ne.lat.min(MAX_LATITUDE));
    if !(west < east && south < north) {
        return;
    }

    let step = graticule_step((east - west).max(north - south));
    let segment = |a: LonLat, b: LonLat| {
        [
            to_egui(session.to_screen(to_map(a)), rect.min),
            to_egui(session.to_screen(to_map(b)), rect.min),
        ]
    };

    let mut lon = (west / step).ceil() * step;
    while lon <= east {
        painter.line_segment(
            segment(LonLat::new(lon, south), LonLat::new(lon, north)),
            stroke,
        );
        lon += step;
    }
    let mut lat = (south / step).ceil() * step;
    while lat <= north {
        painter.line_segment(
            segment(LonLat::new(west, lat), LonLat::new(east, lat)),
            stroke,
        );
        lat += step;
    }
}

fn paint_overlays(painter: &Painter, rect: Rect, session: &MapSession) {
    let screen = |p: Point| to_egui(session.to_screen(p), rect.min);
    let overlays = session.overlays();

    if let Some(polygon) = &overlays.polygon {
        let ring: Vec<Pos2> = polygon.vertices().iter().map(|v| screen(*v)).collect();
        painter.add(Shape::closed_line(ring.clone(), Stroke::new(2.5, theme::AREA)));
        for vertex in ring {
            painter.circle(vertex, 4.0, Color32::WHITE, Stroke::new(1.5, theme::AREA));
        }
    }

    if let Some(point) = &overlays.point {
        let center = screen(point.position);
        painter.circle_filled(center + vec2(0.0, 1.5), 8.0, Color32::from_black_alpha(40));
        painter.circle(center, 7.0, theme::POINT, Stroke::new(2.0, Color32::WHITE));
    }
}

fn paint_sketch(painter: &Painter, rect: Rect, session: &MapSession) {
    let Some(preview) = session.preview() else {
        return;
    };
    let screen = |p: Point| to_egui(session.to_screen(p), rect.min);
    let stroke = Stroke::new(2.0, theme::SKETCH);

    match preview.kind {
        DrawKind::Point => {
            if let Some(cursor) = preview.cursor {
                painter.circle_stroke(screen(cursor), 7.0, stroke);
            }
        }
        DrawKind::Polygon => {
            let mut line: Vec<Pos2> = preview.vertices.iter().map(|v| screen(*v)).collect();
            if let Some(cursor) = preview.cursor {
                line.push(screen(cursor));
            }
            if line.len() >= 2 {
                painter.extend(Shape::dashed_line(&line, stroke, 6.0, 4.0));
            }
            for vertex in preview.vertices {
                painter.circle(screen(*vertex), 4.0, Color32::WHITE, stroke);
            }
        }
    }
}

fn paint_attribution(painter: &Painter, rect: Rect, layer: BaseLayer) {
    let color = match layer {
        BaseLayer::Street => theme::TEXT_MUTED,
        BaseLayer::Satellite => Color32::from_gray(220),
    };
    painter.text(
        rect.right_bottom() - vec2(8.0, 6.0),
        Align2::RIGHT_BOTTOM,
        layer.attribution(),
        FontId::proportional(10.0),
        color,
    );
}
