//! GeoJSON-style point and polygon geometries in longitude/latitude.
//!
//! These are the shapes exchanged with the caller. Everything inside the map
//! session works in projected metres (see [`crate::projection`]); conversion
//! happens at the session boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::projection::MAX_LATITUDE;

/// Minimum number of distinct vertices for a polygon ring.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Problems found while validating or parsing a geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("coordinate {index} is not a finite number")]
    NonFinite { index: usize },
    #[error("coordinate {index} ({lon}, {lat}) is outside the displayable range")]
    OutOfRange { index: usize, lon: f64, lat: f64 },
    #[error("polygon ring has {found} distinct vertices, at least 3 are required")]
    TooFewVertices { found: usize },
    #[error("polygon has no exterior ring")]
    MissingRing,
    #[error("unexpected geometry type: {0}")]
    UnexpectedType(String),
    #[error("invalid GeoJSON: {0}")]
    Json(String),
}

impl GeometryError {
    /// Whether the error comes from bad coordinate values rather than shape structure.
    pub fn is_coordinate_fault(&self) -> bool {
        matches!(self, Self::NonFinite { .. } | Self::OutOfRange { .. })
    }
}

/// Result type for geometry validation and parsing.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// A longitude/latitude pair in degrees, serialized as `[lon, lat]`.
///
/// Positions with extra ordinates (altitude) are accepted on input and the
/// extra values dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Check that both ordinates are finite and inside the Web Mercator domain.
    ///
    /// `index` is reported back in the error to locate the offending position.
    pub fn validate(&self, index: usize) -> GeometryResult<()> {
        if !self.lon.is_finite() || !self.lat.is_finite() {
            return Err(GeometryError::NonFinite { index });
        }
        if self.lon.abs() > 180.0 || self.lat.abs() > MAX_LATITUDE {
            return Err(GeometryError::OutOfRange {
                index,
                lon: self.lon,
                lat: self.lat,
            });
        }
        Ok(())
    }

    /// Compare two positions with a tolerance in degrees.
    pub fn approx_eq(&self, other: &LonLat, tolerance: f64) -> bool {
        (self.lon - other.lon).abs() <= tolerance && (self.lat - other.lat).abs() <= tolerance
    }
}

impl TryFrom<Vec<f64>> for LonLat {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [lon, lat, ..] => Ok(Self::new(*lon, *lat)),
            _ => Err(format!("position needs 2 ordinates, got {}", values.len())),
        }
    }
}

impl From<[f64; 2]> for LonLat {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self::new(lon, lat)
    }
}

impl From<LonLat> for [f64; 2] {
    fn from(pos: LonLat) -> Self {
        [pos.lon, pos.lat]
    }
}

/// GeoJSON `type` tag for points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointType {
    #[default]
    Point,
}

/// GeoJSON `type` tag for polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolygonType {
    #[default]
    Polygon,
}

/// A single named location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: PointType,
    pub coordinates: LonLat,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self::at(LonLat::new(lon, lat))
    }

    pub fn at(position: LonLat) -> Self {
        Self {
            kind: PointType::Point,
            coordinates: position,
        }
    }

    pub fn position(&self) -> LonLat {
        self.coordinates
    }

    pub fn validate(&self) -> GeometryResult<()> {
        self.coordinates.validate(0)
    }
}

/// An area boundary. Only the first (exterior) ring is edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPolygon {
    #[serde(rename = "type")]
    pub kind: PolygonType,
    pub coordinates: Vec<Vec<LonLat>>,
}

impl GeoPolygon {
    /// Build a polygon from ring vertices, closing the ring if needed.
    pub fn from_ring(vertices: &[LonLat]) -> Self {
        Self {
            kind: PolygonType::Polygon,
            coordinates: vec![close_ring(vertices)],
        }
    }

    /// The exterior ring as stored (closed or not).
    pub fn exterior(&self) -> Option<&[LonLat]> {
        self.coordinates.first().map(Vec::as_slice)
    }

    /// Number of interior rings (holes).
    pub fn interior_ring_count(&self) -> usize {
        self.coordinates.len().saturating_sub(1)
    }

    /// Exterior ring vertices without the closing repeat or consecutive duplicates.
    pub fn distinct_vertices(&self) -> Vec<LonLat> {
        let Some(ring) = self.exterior() else {
            return Vec::new();
        };
        let mut vertices: Vec<LonLat> = Vec::with_capacity(ring.len());
        for pos in ring {
            if vertices.last() != Some(pos) {
                vertices.push(*pos);
            }
        }
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        vertices
    }

    /// Validate the exterior ring and return its distinct vertices.
    pub fn validate(&self) -> GeometryResult<Vec<LonLat>> {
        let ring = match self.exterior() {
            Some(ring) if !ring.is_empty() => ring,
            _ => return Err(GeometryError::MissingRing),
        };
        for (index, pos) in ring.iter().enumerate() {
            pos.validate(index)?;
        }
        let vertices = self.distinct_vertices();
        if vertices.len() < MIN_POLYGON_VERTICES {
            return Err(GeometryError::TooFewVertices {
                found: vertices.len(),
            });
        }
        Ok(vertices)
    }

    /// Bounding box of the exterior ring as (south-west, north-east).
    pub fn bounds(&self) -> Option<(LonLat, LonLat)> {
        let ring = self.exterior()?;
        let first = ring.first()?;
        let mut min = *first;
        let mut max = *first;
        for pos in ring {
            min.lon = min.lon.min(pos.lon);
            min.lat = min.lat.min(pos.lat);
            max.lon = max.lon.max(pos.lon);
            max.lat = max.lat.max(pos.lat);
        }
        Some((min, max))
    }
}

/// Return the ring with its first vertex repeated at the end.
pub fn close_ring(vertices: &[LonLat]) -> Vec<LonLat> {
    let mut ring = vertices.to_vec();
    if let Some(first) = vertices.first() {
        if vertices.len() == 1 || vertices.last() != Some(first) {
            ring.push(*first);
        }
    }
    ring
}

/// The pair of geometries reported to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryPair {
    pub point: Option<GeoPoint>,
    pub polygon: Option<GeoPolygon>,
}

impl GeometryPair {
    pub fn new(point: Option<GeoPoint>, polygon: Option<GeoPolygon>) -> Self {
        Self { point, polygon }
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_none() && self.polygon.is_none()
    }

    /// Encode as a GeoJSON FeatureCollection with one feature per present geometry.
    pub fn to_feature_collection(&self) -> Value {
        let mut features = Vec::new();
        if let Some(point) = &self.point {
            features.push(json!({
                "type": "Feature",
                "properties": { "role": "location" },
                "geometry": point,
            }));
        }
        if let Some(polygon) = &self.polygon {
            features.push(json!({
                "type": "Feature",
                "properties": { "role": "area" },
                "geometry": polygon,
            }));
        }
        json!({ "type": "FeatureCollection", "features": features })
    }

    /// Parse a FeatureCollection, a Feature, or a bare Point/Polygon geometry.
    ///
    /// Only the first geometry of each kind is kept.
    pub fn from_geojson(value: &Value) -> GeometryResult<Self> {
        let mut pair = Self::default();
        match type_of(value)? {
            "FeatureCollection" => {
                let features = value
                    .get("features")
                    .and_then(Value::as_array)
                    .ok_or_else(|| GeometryError::Json("missing features array".into()))?;
                for feature in features {
                    pair.absorb_feature(feature)?;
                }
            }
            "Feature" => pair.absorb_feature(value)?,
            _ => pair.absorb_geometry(value)?,
        }
        Ok(pair)
    }

    pub fn from_geojson_str(text: &str) -> GeometryResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| GeometryError::Json(e.to_string()))?;
        Self::from_geojson(&value)
    }

    fn absorb_feature(&mut self, feature: &Value) -> GeometryResult<()> {
        match feature.get("geometry") {
            Some(Value::Null) | None => Ok(()),
            Some(geometry) => self.absorb_geometry(geometry),
        }
    }

    fn absorb_geometry(&mut self, geometry: &Value) -> GeometryResult<()> {
        match type_of(geometry)? {
            "Point" => {
                let point: GeoPoint = serde_json::from_value(geometry.clone())
                    .map_err(|e| GeometryError::Json(e.to_string()))?;
                if self.point.is_some() {
                    log::warn!("Ignoring extra point geometry");
                } else {
                    self.point = Some(point);
                }
            }
            "Polygon" => {
                let polygon: GeoPolygon = serde_json::from_value(geometry.clone())
                    .map_err(|e| GeometryError::Json(e.to_string()))?;
                if self.polygon.is_some() {
                    log::warn!("Ignoring extra polygon geometry");
                } else {
                    self.polygon = Some(polygon);
                }
            }
            other => return Err(GeometryError::UnexpectedType(other.to_string())),
        }
        Ok(())
    }
}

fn type_of(value: &Value) -> GeometryResult<&str> {
    value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GeometryError::Json("missing \"type\" member".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<LonLat> {
        vec![
            LonLat::new(84.0, 28.0),
            LonLat::new(84.1, 28.0),
            LonLat::new(84.05, 28.1),
        ]
    }

    #[test]
    fn test_point_serializes_as_geojson() {
        let point = GeoPoint::new(84.0, 28.3);
        let value = serde_json::to_value(point).unwrap();
        assert_eq!(value, json!({ "type": "Point", "coordinates": [84.0, 28.3] }));
    }

    #[test]
    fn test_point_rejects_wrong_type_tag() {
        let result: Result<GeoPoint, _> =
            serde_json::from_value(json!({ "type": "Polygon", "coordinates": [1.0, 2.0] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_position_drops_altitude() {
        let point: GeoPoint =
            serde_json::from_value(json!({ "type": "Point", "coordinates": [84.0, 28.3, 1200.0] }))
                .unwrap();
        assert_eq!(point.position(), LonLat::new(84.0, 28.3));
    }

    #[test]
    fn test_position_needs_two_ordinates() {
        let result: Result<GeoPoint, _> =
            serde_json::from_value(json!({ "type": "Point", "coordinates": [84.0] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_ring_closes() {
        let polygon = GeoPolygon::from_ring(&triangle());
        let ring = polygon.exterior().unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);
    }

    #[test]
    fn test_from_ring_keeps_closed_ring() {
        let mut closed = triangle();
        closed.push(closed[0]);
        let polygon = GeoPolygon::from_ring(&closed);
        assert_eq!(polygon.exterior().unwrap().len(), 4);
    }

    #[test]
    fn test_distinct_vertices_strips_duplicates() {
        let t = triangle();
        let polygon = GeoPolygon {
            kind: PolygonType::Polygon,
            coordinates: vec![vec![t[0], t[1], t[1], t[2], t[0]]],
        };
        assert_eq!(polygon.distinct_vertices(), t);
    }

    #[test]
    fn test_validate_too_few_vertices() {
        let polygon = GeoPolygon::from_ring(&triangle()[..2]);
        assert_eq!(
            polygon.validate(),
            Err(GeometryError::TooFewVertices { found: 2 })
        );
    }

    #[test]
    fn test_validate_missing_ring() {
        let polygon = GeoPolygon {
            kind: PolygonType::Polygon,
            coordinates: vec![],
        };
        assert_eq!(polygon.validate(), Err(GeometryError::MissingRing));
    }

    #[test]
    fn test_validate_out_of_range_latitude() {
        let mut ring = triangle();
        ring[1].lat = 95.0;
        let err = GeoPolygon::from_ring(&ring).validate().unwrap_err();
        assert!(matches!(err, GeometryError::OutOfRange { index: 1, .. }));
        assert!(err.is_coordinate_fault());
    }

    #[test]
    fn test_validate_non_finite_point() {
        let err = GeoPoint::new(f64::NAN, 28.0).validate().unwrap_err();
        assert_eq!(err, GeometryError::NonFinite { index: 0 });
        assert!(!GeometryError::MissingRing.is_coordinate_fault());
    }

    #[test]
    fn test_bounds() {
        let (sw, ne) = GeoPolygon::from_ring(&triangle()).bounds().unwrap();
        assert_eq!(sw, LonLat::new(84.0, 28.0));
        assert_eq!(ne, LonLat::new(84.1, 28.1));
    }

    #[test]
    fn test_feature_collection_roundtrip() {
        let pair = GeometryPair::new(
            Some(GeoPoint::new(84.0, 28.3)),
            Some(GeoPolygon::from_ring(&triangle())),
        );
        let value = pair.to_feature_collection();
        assert_eq!(value["features"].as_array().unwrap().len(), 2);
        assert_eq!(value["features"][0]["properties"]["role"], "location");

        let parsed = GeometryPair::from_geojson(&value).unwrap();
        assert_eq!(parsed, pair);
    }

    #[test]
    fn test_parse_bare_geometry() {
        let pair = GeometryPair::from_geojson_str(r#"{"type":"Point","coordinates":[84.0,28.3]}"#)
            .unwrap();
        assert_eq!(pair.point, Some(GeoPoint::new(84.0, 28.3)));
        assert!(pair.polygon.is_none());
    }

    #[test]
    fn test_parse_rejects_line_string() {
        let err = GeometryPair::from_geojson_str(
            r#"{"type":"LineString","coordinates":[[84.0,28.3],[84.1,28.4]]}"#,
        )
        .unwrap_err();
        assert_eq!(err, GeometryError::UnexpectedType("LineString".into()));
    }

    #[test]
    fn test_parse_keeps_first_of_each_kind() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } },
                { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [3.0, 4.0] } },
                { "type": "Feature", "properties": {}, "geometry": null }
            ]
        });
        let pair = GeometryPair::from_geojson(&value).unwrap();
        assert_eq!(pair.point, Some(GeoPoint::new(1.0, 2.0)));
    }

    #[test]
    fn test_empty_pair_encodes_empty_collection() {
        let value = GeometryPair::default().to_feature_collection();
        assert!(value["features"].as_array().unwrap().is_empty());
    }
}
