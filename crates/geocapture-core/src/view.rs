//! Map view: pan, zoom and rotation between map metres and screen pixels.

use std::f64::consts::{PI, TAU};
use std::time::{Duration, Instant};

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::projection::HALF_WORLD;

/// Metres per pixel at zoom 0 for a 256 px tile pyramid.
pub const INITIAL_RESOLUTION: f64 = 2.0 * HALF_WORLD / 256.0;

/// Default duration of the animated rotation reset.
pub const DEFAULT_ROTATION_ANIMATION: Duration = Duration::from_millis(250);

/// An in-flight animation of the view bearing back to north-up.
#[derive(Debug, Clone, Copy)]
pub struct RotationAnimation {
    from: f64,
    start: Instant,
    duration: Duration,
}

impl RotationAnimation {
    /// Rotation at `now`, and whether the animation has finished.
    fn sample(&self, now: Instant) -> (f64, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed >= self.duration || self.duration.is_zero() {
            return (0.0, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        // Cubic ease-out
        let eased = 1.0 - (1.0 - t).powi(3);
        (self.from * (1.0 - eased), false)
    }
}

/// The view transform for the map.
///
/// Map coordinates are Web Mercator metres with y pointing north; screen
/// coordinates are pixels with y pointing down and the origin at the top-left
/// of the viewport.
#[derive(Debug, Clone)]
pub struct MapView {
    /// Map point shown at the viewport centre.
    pub center: Point,
    zoom: f64,
    /// Bearing in radians, normalized to (-PI, PI].
    rotation: f64,
    viewport: Size,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
    animation: Option<RotationAnimation>,
    animation_duration: Duration,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: Point::ZERO,
            zoom: 2.0,
            rotation: 0.0,
            viewport: Size::new(800.0, 600.0),
            min_zoom: 2.0,
            max_zoom: 20.0,
            animation: None,
            animation_duration: DEFAULT_ROTATION_ANIMATION,
        }
    }
}

impl MapView {
    /// Create a view of the given viewport size.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Set how long [`MapView::reset_rotation`] animates for.
    pub fn with_animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration = duration;
        self
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Metres per screen pixel at the current zoom.
    pub fn resolution(&self) -> f64 {
        INITIAL_RESOLUTION / 2f64.powf(self.zoom)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Set the zoom level, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Centre the view on a map point at the given zoom.
    pub fn center_on(&mut self, center: Point, zoom: f64) {
        self.center = center;
        self.set_zoom(zoom);
    }

    /// Change the viewport size, keeping the centre fixed.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = Size::new(viewport.width.max(1.0), viewport.height.max(1.0));
    }

    /// Get the affine transform from map metres to screen pixels.
    pub fn transform(&self) -> Affine {
        let res = self.resolution();
        Affine::translate(Vec2::new(self.viewport.width / 2.0, self.viewport.height / 2.0))
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(1.0 / res, -1.0 / res)
            * Affine::translate(-self.center.to_vec2())
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        self.transform().inverse()
    }

    /// Convert a map point to screen coordinates.
    pub fn map_to_screen(&self, map_point: Point) -> Point {
        self.transform() * map_point
    }

    /// Convert a screen point to map coordinates.
    pub fn screen_to_map(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Pan so that map content follows a pointer moved by `delta` screen pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        let origin = self.screen_to_map(Point::ZERO);
        let moved = self.screen_to_map(Point::ZERO + delta);
        self.center -= moved - origin;
        self.clamp_center();
    }

    /// Keep the centre inside the projected world.
    fn clamp_center(&mut self) {
        self.center = Point::new(
            self.center.x.clamp(-HALF_WORLD, HALF_WORLD),
            self.center.y.clamp(-HALF_WORLD, HALF_WORLD),
        );
    }

    /// Zoom by `factor`, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        let new_zoom = (self.zoom + factor.log2()).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let anchor = self.screen_to_map(screen_point);
        let old_res = self.resolution();
        self.zoom = new_zoom;
        let scale = self.resolution() / old_res;
        self.center = anchor + (self.center - anchor) * scale;
        self.clamp_center();
    }

    /// Rotate the view by `delta` radians. Stops any running reset animation.
    pub fn rotate_by(&mut self, delta: f64) {
        self.animation = None;
        self.rotation = normalize_angle(self.rotation + delta);
    }

    /// Start animating the bearing back to zero.
    pub fn reset_rotation(&mut self, now: Instant) {
        if self.rotation == 0.0 {
            self.animation = None;
            return;
        }
        let animation = RotationAnimation {
            from: self.rotation,
            start: now,
            duration: self.animation_duration,
        };
        if self.animation_duration.is_zero() {
            self.rotation = 0.0;
            self.animation = None;
        } else {
            self.animation = Some(animation);
        }
    }

    /// Advance any running animation. Returns true while still animating.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        let (rotation, done) = animation.sample(now);
        self.rotation = rotation;
        if done {
            self.animation = None;
        }
        !done
    }

    /// Fit the view to show a map extent with `padding` pixels on each side.
    ///
    /// Resets the bearing. A degenerate extent is centred at `max_fit_zoom`.
    pub fn fit_extent(&mut self, extent: Rect, padding: f64, max_fit_zoom: f64) {
        self.animation = None;
        self.rotation = 0.0;
        self.center = extent.center();

        let available = Size::new(
            (self.viewport.width - padding * 2.0).max(1.0),
            (self.viewport.height - padding * 2.0).max(1.0),
        );
        let res = (extent.width() / available.width).max(extent.height() / available.height);
        let limit = max_fit_zoom.min(self.max_zoom);
        let zoom = if res > 0.0 && res.is_finite() {
            (INITIAL_RESOLUTION / res).log2().min(limit)
        } else {
            limit
        };
        self.set_zoom(zoom);
    }

    /// Map extent currently covered by the viewport (axis-aligned, rotation included).
    pub fn visible_extent(&self) -> Rect {
        let corners = [
            Point::ZERO,
            Point::new(self.viewport.width, 0.0),
            Point::new(0.0, self.viewport.height),
            Point::new(self.viewport.width, self.viewport.height),
        ];
        let first = self.screen_to_map(corners[0]);
        corners[1..]
            .iter()
            .fold(Rect::from_points(first, first), |rect, corner| {
                rect.union_pt(self.screen_to_map(*corner))
            })
    }
}

fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> MapView {
        let mut view = MapView::new(Size::new(800.0, 600.0));
        view.center_on(Point::new(1000.0, 2000.0), 10.0);
        view
    }

    #[test]
    fn test_center_maps_to_viewport_center() {
        let view = view();
        let screen = view.map_to_screen(view.center);
        assert!((screen.x - 400.0).abs() < 1e-9);
        assert!((screen.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_north_is_up() {
        let view = view();
        let north = view.map_to_screen(view.center + Vec2::new(0.0, 100.0));
        assert!(north.y < 300.0);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut view = view();
        view.rotate_by(0.7);

        let original = Point::new(123.0, 456.0);
        let map = view.screen_to_map(original);
        let back = view.map_to_screen(map);

        assert!((back.x - original.x).abs() < 1e-6);
        assert!((back.y - original.y).abs() < 1e-6);
    }

    #[test]
    fn test_resolution_halves_per_zoom_level() {
        let mut view = view();
        let res = view.resolution();
        view.set_zoom(11.0);
        assert!((view.resolution() * 2.0 - res).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut view = view();
        view.zoom_at(Point::ZERO, 0.000_001);
        assert!((view.zoom() - view.min_zoom).abs() < f64::EPSILON);

        view.zoom_at(Point::ZERO, 1e9);
        assert!((view.zoom() - view.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed() {
        let mut view = view();
        let anchor = Point::new(100.0, 50.0);
        let before = view.screen_to_map(anchor);
        view.zoom_at(anchor, 2.0);
        let after = view.screen_to_map(anchor);
        assert!((before - after).hypot() < 1e-6);
        assert!((view.zoom() - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_follows_pointer() {
        let mut view = view();
        let grabbed = view.screen_to_map(Point::new(200.0, 200.0));
        view.pan_by(Vec2::new(30.0, -15.0));
        let now_at = view.map_to_screen(grabbed);
        assert!((now_at.x - 230.0).abs() < 1e-6);
        assert!((now_at.y - 185.0).abs() < 1e-6);
    }

    #[test]
    fn test_pan_stops_at_world_edge() {
        let mut view = view();
        for _ in 0..100 {
            view.pan_by(Vec2::new(-5000.0, 5000.0));
        }
        assert_eq!(view.center, Point::new(HALF_WORLD, HALF_WORLD));
    }

    #[test]
    fn test_rotation_normalized() {
        let mut view = view();
        view.rotate_by(3.0 * PI / 2.0);
        assert!((view.rotation() + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_rotation_animates_to_zero() {
        let mut view = view();
        view.rotate_by(1.0);
        let start = Instant::now();
        view.reset_rotation(start);
        assert!(view.is_animating());

        assert!(view.tick(start + Duration::from_millis(100)));
        let mid = view.rotation();
        assert!(mid > 0.0 && mid < 1.0);

        assert!(!view.tick(start + Duration::from_millis(300)));
        assert_eq!(view.rotation(), 0.0);
        assert!(!view.is_animating());
    }

    #[test]
    fn test_reset_rotation_without_duration_is_immediate() {
        let mut view = view().with_animation_duration(Duration::ZERO);
        view.rotate_by(1.0);
        view.reset_rotation(Instant::now());
        assert_eq!(view.rotation(), 0.0);
        assert!(!view.is_animating());
    }

    #[test]
    fn test_fit_extent_contains_extent() {
        let mut view = view();
        let extent = Rect::new(0.0, 0.0, 50_000.0, 20_000.0);
        view.fit_extent(extent, 20.0, 18.0);
        assert_eq!(view.center, extent.center());

        let corner = view.map_to_screen(Point::new(extent.x0, extent.y1));
        assert!(corner.x >= 19.999 && corner.y >= -1e-6);
        let corner = view.map_to_screen(Point::new(extent.x1, extent.y0));
        assert!(corner.x <= 780.001);
    }

    #[test]
    fn test_fit_degenerate_extent_uses_limit() {
        let mut view = view();
        view.fit_extent(Rect::new(5.0, 5.0, 5.0, 5.0), 20.0, 17.0);
        assert!((view.zoom() - 17.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_visible_extent_contains_center() {
        let view = view();
        assert!(view.visible_extent().contains(view.center));
    }
}
