//! Spherical Web Mercator (EPSG:3857) projection.
//!
//! Overlays live in projected metres; every value crossing the session
//! boundary is converted with [`to_map`] and [`to_lon_lat`].

use std::f64::consts::FRAC_PI_2;

use kurbo::Point;

use crate::geometry::LonLat;

/// Sphere radius used by Web Mercator, in metres.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude at which the projected world becomes square.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Half the projected world width, in metres.
pub const HALF_WORLD: f64 = std::f64::consts::PI * EARTH_RADIUS;

/// Project a lon/lat position to map metres.
pub fn to_map(pos: LonLat) -> Point {
    let lat = pos.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    Point::new(
        EARTH_RADIUS * pos.lon.to_radians(),
        EARTH_RADIUS * (0.5 * (FRAC_PI_2 + lat)).tan().ln(),
    )
}

/// Unproject map metres to lon/lat.
///
/// Longitudes east or west of the projected world wrap back into [-180, 180].
pub fn to_lon_lat(point: Point) -> LonLat {
    let lon = wrap_longitude((point.x / EARTH_RADIUS).to_degrees());
    let lat = 2.0 * (point.y / EARTH_RADIUS).exp().atan() - FRAC_PI_2;
    LonLat::new(lon, lat.to_degrees())
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}
