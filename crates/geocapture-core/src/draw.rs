//! Draw and modify interactions.
//!
//! [`DrawSession`] is the seam between the editor state machine and whatever
//! turns pointer gestures into sketches. [`PointerDrawSession`] is the built-in
//! implementation working on map-space gestures.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::geometry::MIN_POLYGON_VERTICES;
use crate::overlay::{FeatureId, Overlays, VertexTarget};

/// Kind of geometry a draw produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawKind {
    Point,
    Polygon,
}

/// The editor's drawing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DrawMode {
    #[default]
    Idle,
    DrawingPoint,
    DrawingPolygon,
}

impl From<Option<DrawKind>> for DrawMode {
    fn from(kind: Option<DrawKind>) -> Self {
        match kind {
            None => DrawMode::Idle,
            Some(DrawKind::Point) => DrawMode::DrawingPoint,
            Some(DrawKind::Polygon) => DrawMode::DrawingPolygon,
        }
    }
}

/// A finished sketch in map coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Sketch {
    Point(Point),
    /// Open ring of at least three distinct vertices.
    Polygon(Vec<Point>),
}

/// Sketch in progress, for rendering.
#[derive(Debug, Clone, Copy)]
pub struct SketchPreview<'a> {
    pub kind: DrawKind,
    pub vertices: &'a [Point],
    /// Last hovered position, used for the rubber-band segment.
    pub cursor: Option<Point>,
}

/// Pointer gestures in map coordinates, already classified by the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapGesture {
    /// Left button went down.
    Press { at: Point },
    /// Pointer moved past the click tolerance with the button held.
    Drag { at: Point },
    /// Button released after a drag.
    Release { at: Point },
    /// Press and release without travel. `double` marks the second click of a double-click.
    Click { at: Point, double: bool },
    /// Pointer moved with no button held.
    Hover { at: Point },
}

/// Notifications produced by a draw session.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// A draw finished; the session is idle again.
    Completed(Sketch),
    /// A vertex drag was released after moving an overlay vertex.
    VerticesChanged,
}

/// How a gesture was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// Not used; the map may pan.
    Ignored,
    /// Used without producing a notification.
    Consumed,
    Event(DrawEvent),
}

/// Draw/modify interaction driver.
pub trait DrawSession {
    /// Begin drawing a geometry of `kind`, abandoning any sketch in progress.
    fn start(&mut self, kind: DrawKind);

    /// Abandon the sketch in progress, if any.
    fn cancel(&mut self);

    /// The kind currently being drawn.
    fn active(&self) -> Option<DrawKind>;

    /// Sketch in progress, if any.
    fn preview(&self) -> Option<SketchPreview<'_>>;

    /// Whether an overlay vertex is being dragged.
    fn is_modifying(&self) -> bool;

    /// Abort a vertex drag, putting the vertex back where it started.
    fn cancel_modify(&mut self, overlays: &mut Overlays);

    /// Route a gesture. `tolerance` is the handle hit radius in map units.
    fn handle(&mut self, gesture: MapGesture, overlays: &mut Overlays, tolerance: f64) -> Handled;
}

#[derive(Debug, Clone, Copy)]
struct VertexDrag {
    /// Feature the drag started on. A replaced feature ends the drag.
    feature: FeatureId,
    target: VertexTarget,
    origin: Point,
    moved: bool,
}

/// Built-in draw session: click to place, double-click or click the first
/// vertex to close a polygon, drag handles to modify.
#[derive(Debug, Clone, Default)]
pub struct PointerDrawSession {
    active: Option<DrawKind>,
    vertices: Vec<Point>,
    cursor: Option<Point>,
    drag: Option<VertexDrag>,
}

impl PointerDrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish_polygon(&mut self) -> Handled {
        let distinct = distinct_count(&self.vertices);
        if distinct < MIN_POLYGON_VERTICES {
            log::debug!("Ignoring polygon finish with {} distinct vertices", distinct);
            return Handled::Consumed;
        }
        let ring = std::mem::take(&mut self.vertices);
        self.cancel();
        Handled::Event(DrawEvent::Completed(Sketch::Polygon(ring)))
    }

    fn polygon_click(&mut self, at: Point, double: bool, tolerance: f64) -> Handled {
        if double {
            return self.finish_polygon();
        }
        let near = |a: Point, b: Point| (a - b).hypot2() <= tolerance * tolerance;
        if self.vertices.len() >= MIN_POLYGON_VERTICES
            && self.vertices.first().is_some_and(|first| near(*first, at))
        {
            return self.finish_polygon();
        }
        if self.vertices.len() < MIN_POLYGON_VERTICES
            && self.vertices.iter().any(|v| near(*v, at))
        {
            // Too early to close, and a repeat would leave a degenerate ring
            return Handled::Consumed;
        }
        if self.vertices.last().is_some_and(|last| near(*last, at)) {
            return Handled::Consumed;
        }
        self.vertices.push(at);
        Handled::Consumed
    }
}

/// Number of distinct positions among `vertices`.
fn distinct_count(vertices: &[Point]) -> usize {
    let mut seen: Vec<Point> = Vec::with_capacity(vertices.len());
    for v in vertices {
        if !seen.contains(v) {
            seen.push(*v);
        }
    }
    seen.len()
}

impl DrawSession for PointerDrawSession {
    fn start(&mut self, kind: DrawKind) {
        self.cancel();
        self.active = Some(kind);
    }

    fn cancel(&mut self) {
        self.active = None;
        self.vertices.clear();
        self.cursor = None;
    }

    fn active(&self) -> Option<DrawKind> {
        self.active
    }

    fn preview(&self) -> Option<SketchPreview<'_>> {
        self.active.map(|kind| SketchPreview {
            kind,
            vertices: &self.vertices,
            cursor: self.cursor,
        })
    }

    fn is_modifying(&self) -> bool {
        self.drag.is_some()
    }

    fn cancel_modify(&mut self, overlays: &mut Overlays) {
        if let Some(drag) = self.drag.take() {
            if overlays.feature_id(drag.target) == Some(drag.feature) {
                overlays.move_vertex(drag.target, drag.origin);
            }
        }
    }

    fn handle(&mut self, gesture: MapGesture, overlays: &mut Overlays, tolerance: f64) -> Handled {
        match gesture {
            // Committed overlays stay draggable while a sketch is in progress
            MapGesture::Press { at } => {
                let Some(target) = overlays.hit_test_handle(at, tolerance) else {
                    return Handled::Ignored;
                };
                let (Some(feature), Some(origin)) =
                    (overlays.feature_id(target), overlays.vertex_position(target))
                else {
                    return Handled::Ignored;
                };
                self.drag = Some(VertexDrag {
                    feature,
                    target,
                    origin,
                    moved: false,
                });
                Handled::Consumed
            }
            MapGesture::Drag { at } => {
                let Some(mut drag) = self.drag else {
                    if self.active.is_some() {
                        self.cursor = Some(at);
                    }
                    return Handled::Ignored;
                };
                if overlays.feature_id(drag.target) == Some(drag.feature) {
                    drag.moved |= overlays.move_vertex(drag.target, at);
                    self.drag = Some(drag);
                } else {
                    log::debug!("Dropping drag of replaced feature {}", drag.feature);
                    self.drag = None;
                }
                Handled::Consumed
            }
            MapGesture::Release { at } => match self.drag.take() {
                Some(drag) if overlays.feature_id(drag.target) == Some(drag.feature) => {
                    let moved = overlays.move_vertex(drag.target, at) || drag.moved;
                    if moved {
                        Handled::Event(DrawEvent::VerticesChanged)
                    } else {
                        Handled::Consumed
                    }
                }
                Some(_) => Handled::Consumed,
                None => Handled::Ignored,
            },
            MapGesture::Click { at, double } => {
                if self.drag.take().is_some() {
                    // Pressed a handle without moving it
                    return Handled::Consumed;
                }
                match self.active {
                    Some(DrawKind::Point) => {
                        self.cancel();
                        Handled::Event(DrawEvent::Completed(Sketch::Point(at)))
                    }
                    Some(DrawKind::Polygon) => self.polygon_click(at, double, tolerance),
                    None => Handled::Ignored,
                }
            }
            MapGesture::Hover { at } => {
                if self.active.is_some() {
                    self.cursor = Some(at);
                    Handled::Consumed
                } else {
                    Handled::Ignored
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{PointFeature, PolygonFeature};

    const TOL: f64 = 5.0;

    fn click(session: &mut PointerDrawSession, overlays: &mut Overlays, x: f64, y: f64) -> Handled {
        session.handle(
            MapGesture::Click {
                at: Point::new(x, y),
                double: false,
            },
            overlays,
            TOL,
        )
    }

    #[test]
    fn test_mode_from_kind() {
        assert_eq!(DrawMode::from(None), DrawMode::Idle);
        assert_eq!(DrawMode::from(Some(DrawKind::Polygon)), DrawMode::DrawingPolygon);
    }

    #[test]
    fn test_point_completes_on_click() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays::default();
        session.start(DrawKind::Point);
        assert_eq!(session.active(), Some(DrawKind::Point));

        let handled = click(&mut session, &mut overlays, 10.0, 20.0);
        assert_eq!(
            handled,
            Handled::Event(DrawEvent::Completed(Sketch::Point(Point::new(10.0, 20.0))))
        );
        assert_eq!(session.active(), None);
    }

    #[test]
    fn test_polygon_double_click_finishes() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays::default();
        session.start(DrawKind::Polygon);
        click(&mut session, &mut overlays, 0.0, 0.0);
        click(&mut session, &mut overlays, 100.0, 0.0);
        click(&mut session, &mut overlays, 50.0, 100.0);
        assert_eq!(session.preview().unwrap().vertices.len(), 3);

        let handled = session.handle(
            MapGesture::Click {
                at: Point::new(50.0, 100.0),
                double: true,
            },
            &mut overlays,
            TOL,
        );
        match handled {
            Handled::Event(DrawEvent::Completed(Sketch::Polygon(ring))) => {
                assert_eq!(ring.len(), 3)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(session.preview().is_none());
    }

    #[test]
    fn test_polygon_click_on_first_vertex_finishes() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays::default();
        session.start(DrawKind::Polygon);
        click(&mut session, &mut overlays, 0.0, 0.0);
        click(&mut session, &mut overlays, 100.0, 0.0);
        click(&mut session, &mut overlays, 50.0, 100.0);
        let handled = click(&mut session, &mut overlays, 1.0, 1.0);
        assert!(matches!(
            handled,
            Handled::Event(DrawEvent::Completed(Sketch::Polygon(_)))
        ));
    }

    #[test]
    fn test_polygon_finish_needs_three_vertices() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays::default();
        session.start(DrawKind::Polygon);
        click(&mut session, &mut overlays, 0.0, 0.0);
        click(&mut session, &mut overlays, 100.0, 0.0);
        let handled = session.handle(
            MapGesture::Click {
                at: Point::new(100.0, 0.0),
                double: true,
            },
            &mut overlays,
            TOL,
        );
        assert_eq!(handled, Handled::Consumed);
        assert_eq!(session.active(), Some(DrawKind::Polygon));
    }

    #[test]
    fn test_repeated_click_does_not_duplicate_vertex() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays::default();
        session.start(DrawKind::Polygon);
        click(&mut session, &mut overlays, 0.0, 0.0);
        click(&mut session, &mut overlays, 100.0, 0.0);
        click(&mut session, &mut overlays, 101.0, 0.0);
        assert_eq!(session.preview().unwrap().vertices.len(), 2);
    }

    #[test]
    fn test_restart_discards_sketch() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays::default();
        session.start(DrawKind::Polygon);
        click(&mut session, &mut overlays, 0.0, 0.0);
        session.start(DrawKind::Point);
        let preview = session.preview().unwrap();
        assert_eq!(preview.kind, DrawKind::Point);
        assert!(preview.vertices.is_empty());
    }

    #[test]
    fn test_handle_drag_while_drawing_keeps_sketch() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays {
            point: Some(PointFeature::new(Point::ZERO)),
            polygon: None,
        };
        session.start(DrawKind::Polygon);
        click(&mut session, &mut overlays, 200.0, 200.0);

        let handled = session.handle(MapGesture::Press { at: Point::ZERO }, &mut overlays, TOL);
        assert_eq!(handled, Handled::Consumed);
        assert!(session.is_modifying());

        let release = session.handle(
            MapGesture::Release {
                at: Point::new(40.0, 0.0),
            },
            &mut overlays,
            TOL,
        );
        assert_eq!(release, Handled::Event(DrawEvent::VerticesChanged));
        assert_eq!(
            overlays.vertex_position(VertexTarget::Point),
            Some(Point::new(40.0, 0.0))
        );
        assert_eq!(session.active(), Some(DrawKind::Polygon));
        assert_eq!(session.preview().unwrap().vertices.len(), 1);
    }

    #[test]
    fn test_early_click_on_first_vertex_is_ignored() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays::default();
        session.start(DrawKind::Polygon);
        click(&mut session, &mut overlays, 0.0, 0.0);
        click(&mut session, &mut overlays, 100.0, 0.0);
        assert_eq!(click(&mut session, &mut overlays, 1.0, 0.0), Handled::Consumed);
        assert_eq!(click(&mut session, &mut overlays, 0.0, 0.0), Handled::Consumed);
        assert_eq!(session.preview().unwrap().vertices.len(), 2);

        click(&mut session, &mut overlays, 50.0, 100.0);
        let handled = click(&mut session, &mut overlays, 0.0, 0.0);
        match handled {
            Handled::Event(DrawEvent::Completed(Sketch::Polygon(ring))) => {
                assert_eq!(distinct_count(&ring), 3)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_distinct_count() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert_eq!(distinct_count(&[a, b, a]), 2);
        assert_eq!(distinct_count(&[]), 0);
    }

    #[test]
    fn test_drag_ends_when_feature_replaced() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays {
            point: Some(PointFeature::new(Point::ZERO)),
            polygon: None,
        };
        session.handle(MapGesture::Press { at: Point::ZERO }, &mut overlays, TOL);
        overlays.point = Some(PointFeature::new(Point::new(500.0, 500.0)));

        let drag = session.handle(
            MapGesture::Drag {
                at: Point::new(30.0, 30.0),
            },
            &mut overlays,
            TOL,
        );
        assert_eq!(drag, Handled::Consumed);
        assert!(!session.is_modifying());
        assert_eq!(
            overlays.vertex_position(VertexTarget::Point),
            Some(Point::new(500.0, 500.0))
        );
    }

    #[test]
    fn test_cancel_modify_leaves_replaced_feature_alone() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays {
            point: Some(PointFeature::new(Point::ZERO)),
            polygon: None,
        };
        session.handle(MapGesture::Press { at: Point::ZERO }, &mut overlays, TOL);
        overlays.point = Some(PointFeature::new(Point::new(500.0, 500.0)));
        session.cancel_modify(&mut overlays);
        assert_eq!(
            overlays.vertex_position(VertexTarget::Point),
            Some(Point::new(500.0, 500.0))
        );
    }

    #[test]
    fn test_drag_vertex_emits_on_release() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays {
            point: None,
            polygon: Some(PolygonFeature::new(vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(50.0, 100.0),
            ])),
        };
        let press = session.handle(
            MapGesture::Press {
                at: Point::new(100.0, 1.0),
            },
            &mut overlays,
            TOL,
        );
        assert_eq!(press, Handled::Consumed);
        assert!(session.is_modifying());

        session.handle(
            MapGesture::Drag {
                at: Point::new(120.0, 10.0),
            },
            &mut overlays,
            TOL,
        );
        let release = session.handle(
            MapGesture::Release {
                at: Point::new(130.0, 10.0),
            },
            &mut overlays,
            TOL,
        );
        assert_eq!(release, Handled::Event(DrawEvent::VerticesChanged));
        assert_eq!(
            overlays.vertex_position(VertexTarget::PolygonVertex(1)),
            Some(Point::new(130.0, 10.0))
        );
    }

    #[test]
    fn test_handle_click_without_move_is_silent() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays {
            point: Some(PointFeature::new(Point::ZERO)),
            polygon: None,
        };
        session.handle(MapGesture::Press { at: Point::ZERO }, &mut overlays, TOL);
        let handled = click(&mut session, &mut overlays, 0.0, 0.0);
        assert_eq!(handled, Handled::Consumed);
        assert!(!session.is_modifying());
    }

    #[test]
    fn test_cancel_modify_restores_vertex() {
        let mut session = PointerDrawSession::new();
        let mut overlays = Overlays {
            point: Some(PointFeature::new(Point::ZERO)),
            polygon: None,
        };
        session.handle(MapGesture::Press { at: Point::ZERO }, &mut overlays, TOL);
        session.handle(
            MapGesture::Drag {
                at: Point::new(40.0, 40.0),
            },
            &mut overlays,
            TOL,
        );
        session.cancel_modify(&mut overlays);
        assert_eq!(overlays.vertex_position(VertexTarget::Point), Some(Point::ZERO));
        assert!(!session.is_modifying());
    }
}
