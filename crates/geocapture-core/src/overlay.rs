//! Vector overlays drawn above the base layer, and their drag handles.
//!
//! Overlay coordinates are map metres. Polygon vertices are stored as an open
//! ring; the closing vertex is only added when a ring is read out.

use kurbo::{Point, Rect};
use uuid::Uuid;

/// Identifier of an overlay feature within a session.
pub type FeatureId = Uuid;

/// The location marker.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFeature {
    pub id: FeatureId,
    pub position: Point,
}

impl PointFeature {
    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
        }
    }
}

/// The area boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    pub id: FeatureId,
    vertices: Vec<Point>,
}

impl PolygonFeature {
    /// Create a polygon from open-ring vertices.
    pub fn new(vertices: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vertices,
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn bounds(&self) -> Option<Rect> {
        let first = self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold(Rect::from_points(*first, *first), |rect, v| rect.union_pt(*v)),
        )
    }
}

/// What a drag handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexTarget {
    /// The location marker itself.
    Point,
    /// A polygon vertex by index into the open ring.
    PolygonVertex(usize),
}

/// A draggable handle on an overlay.
#[derive(Debug, Clone, Copy)]
pub struct VertexHandle {
    pub target: VertexTarget,
    /// Position in map coordinates.
    pub position: Point,
}

impl VertexHandle {
    /// Check if a point (in map coordinates) hits this handle.
    /// `tolerance` should already be scaled by the view resolution.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// The two overlay slots of a session.
#[derive(Debug, Clone, Default)]
pub struct Overlays {
    pub point: Option<PointFeature>,
    pub polygon: Option<PolygonFeature>,
}

impl Overlays {
    pub fn is_empty(&self) -> bool {
        self.point.is_none() && self.polygon.is_none()
    }

    /// All drag handles, the point marker first.
    pub fn handles(&self) -> Vec<VertexHandle> {
        let mut handles = Vec::new();
        if let Some(point) = &self.point {
            handles.push(VertexHandle {
                target: VertexTarget::Point,
                position: point.position,
            });
        }
        if let Some(polygon) = &self.polygon {
            handles.extend(polygon.vertices.iter().enumerate().map(|(i, v)| VertexHandle {
                target: VertexTarget::PolygonVertex(i),
                position: *v,
            }));
        }
        handles
    }

    /// Find the handle nearest to `at` within `tolerance`.
    ///
    /// The point marker wins ties so it stays grabbable when placed on a vertex.
    pub fn hit_test_handle(&self, at: Point, tolerance: f64) -> Option<VertexTarget> {
        self.handles()
            .into_iter()
            .filter(|h| h.hit_test(at, tolerance))
            .fold(None::<(VertexHandle, f64)>, |best, h| {
                let d = (at - h.position).hypot2();
                match best {
                    Some((_, best_d)) if best_d <= d => best,
                    _ => Some((h, d)),
                }
            })
            .map(|(h, _)| h.target)
    }

    /// Id of the feature owning `target`, if that vertex exists.
    pub fn feature_id(&self, target: VertexTarget) -> Option<FeatureId> {
        match target {
            VertexTarget::Point => self.point.as_ref().map(|p| p.id),
            VertexTarget::PolygonVertex(i) => self
                .polygon
                .as_ref()
                .filter(|p| i < p.vertices.len())
                .map(|p| p.id),
        }
    }

    pub fn vertex_position(&self, target: VertexTarget) -> Option<Point> {
        match target {
            VertexTarget::Point => self.point.as_ref().map(|p| p.position),
            VertexTarget::PolygonVertex(i) => {
                self.polygon.as_ref().and_then(|p| p.vertices.get(i).copied())
            }
        }
    }

    /// Move a handle's vertex. Returns false if the target no longer exists.
    pub fn move_vertex(&mut self, target: VertexTarget, to: Point) -> bool {
        match target {
            VertexTarget::Point => match &mut self.point {
                Some(point) => {
                    point.position = to;
                    true
                }
                None => false,
            },
            VertexTarget::PolygonVertex(i) => {
                match self.polygon.as_mut().and_then(|p| p.vertices.get_mut(i)) {
                    Some(vertex) => {
                        *vertex = to;
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlays() -> Overlays {
        Overlays {
            point: Some(PointFeature::new(Point::new(0.0, 0.0))),
            polygon: Some(PolygonFeature::new(vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(50.0, 100.0),
            ])),
        }
    }

    #[test]
    fn test_feature_id_follows_replacement() {
        let mut overlays = overlays();
        let original = overlays.feature_id(VertexTarget::PolygonVertex(2));
        assert_eq!(original, overlays.polygon.as_ref().map(|p| p.id));
        assert_eq!(overlays.feature_id(VertexTarget::PolygonVertex(3)), None);

        overlays.polygon = Some(PolygonFeature::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 10.0),
        ]));
        assert_ne!(overlays.feature_id(VertexTarget::PolygonVertex(2)), original);
    }

    #[test]
    fn test_handles_include_point_and_vertices() {
        let handles = overlays().handles();
        assert_eq!(handles.len(), 4);
        assert_eq!(handles[0].target, VertexTarget::Point);
        assert_eq!(handles[3].target, VertexTarget::PolygonVertex(2));
    }

    #[test]
    fn test_hit_test_prefers_point_on_tie() {
        let o = overlays();
        assert_eq!(
            o.hit_test_handle(Point::new(1.0, 1.0), 5.0),
            Some(VertexTarget::Point)
        );
    }

    #[test]
    fn test_hit_test_picks_nearest() {
        let o = overlays();
        assert_eq!(
            o.hit_test_handle(Point::new(97.0, 1.0), 10.0),
            Some(VertexTarget::PolygonVertex(1))
        );
        assert_eq!(o.hit_test_handle(Point::new(500.0, 500.0), 10.0), None);
    }

    #[test]
    fn test_move_vertex() {
        let mut o = overlays();
        assert!(o.move_vertex(VertexTarget::PolygonVertex(2), Point::new(60.0, 120.0)));
        assert_eq!(
            o.vertex_position(VertexTarget::PolygonVertex(2)),
            Some(Point::new(60.0, 120.0))
        );
        // Point is untouched
        assert_eq!(o.vertex_position(VertexTarget::Point), Some(Point::ZERO));
        assert!(!o.move_vertex(VertexTarget::PolygonVertex(9), Point::ZERO));
    }

    #[test]
    fn test_bounds() {
        let bounds = overlays().polygon.unwrap().bounds().unwrap();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 100.0, 100.0));
    }
}
