//! Web-Mercator projection and zoom/altitude conversion.
//!
//! Pixel space is fixed at [`REFERENCE_ZOOM`] with 256-pixel tiles, so a
//! coordinate projects to the same pixel regardless of the current camera.
//! Everything here is a pure function of its inputs.

use crate::core::{
    bounds::MapRect,
    constants::{
        FIELD_OF_VIEW_DEGREES, MAP_WIDTH_AT_REFERENCE_ZOOM, MAX_PROJECTION_ZOOM, MERCATOR_OFFSET,
        MERCATOR_RADIUS, REFERENCE_ZOOM, TILE_SIZE,
    },
    geo::{CoordinateSpan, LatLng, Point, Size, VisibleRegion},
};
use std::f64::consts::FRAC_PI_2;

/// Camera field of view in radians
pub fn default_field_of_view() -> f64 {
    FIELD_OF_VIEW_DEGREES.to_radians()
}

pub fn lng_to_pixel_x(lng: f64) -> f64 {
    (MERCATOR_OFFSET + MERCATOR_RADIUS * lng.to_radians()).round()
}

pub fn lat_to_pixel_y(lat: f64) -> f64 {
    if lat >= 90.0 {
        return 0.0;
    }
    if lat <= -90.0 {
        return MERCATOR_OFFSET * 2.0;
    }
    let sin_lat = lat.to_radians().sin();
    (MERCATOR_OFFSET - MERCATOR_RADIUS * ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / 2.0).round()
}

pub fn pixel_x_to_lng(x: f64) -> f64 {
    ((x.round() - MERCATOR_OFFSET) / MERCATOR_RADIUS).to_degrees()
}

pub fn pixel_y_to_lat(y: f64) -> f64 {
    (FRAC_PI_2 - 2.0 * ((y.round() - MERCATOR_OFFSET) / MERCATOR_RADIUS).exp().atan()).to_degrees()
}

/// Projects a coordinate into reference pixel space
pub fn project(coord: &LatLng) -> Point {
    Point::new(lng_to_pixel_x(coord.lng), lat_to_pixel_y(coord.lat))
}

/// Inverse of [`project`]
pub fn unproject(point: &Point) -> LatLng {
    LatLng::new(pixel_y_to_lat(point.y), pixel_x_to_lng(point.x))
}

/// How many reference pixels one screen point covers at `zoom`
pub fn zoom_scale(zoom: f64) -> f64 {
    2_f64.powf(REFERENCE_ZOOM - zoom)
}

/// The part of pixel space a viewport of `viewport` points covers around `center`
pub fn viewport_rect(center: &LatLng, zoom: f64, viewport: Size) -> MapRect {
    let center_px = project(center);
    let scale = zoom_scale(zoom);
    let width = viewport.width * scale;
    let height = viewport.height * scale;

    MapRect::new(
        center_px.x - width / 2.0,
        center_px.y - height / 2.0,
        width,
        height,
    )
}

/// Latitude/longitude deltas of the region shown at `zoom` around `center`.
///
/// Zoom is clamped to [`MAX_PROJECTION_ZOOM`] first. Pixel Y grows
/// southwards, so the latitude delta is negated to come out positive.
pub fn span_for_zoom(center: &LatLng, zoom: f64, viewport: Size) -> CoordinateSpan {
    let zoom = zoom.min(MAX_PROJECTION_ZOOM);
    let rect = viewport_rect(center, zoom, viewport);

    let min_lng = pixel_x_to_lng(rect.x);
    let max_lng = pixel_x_to_lng(rect.x + rect.width);
    let min_lat = pixel_y_to_lat(rect.y);
    let max_lat = pixel_y_to_lat(rect.y + rect.height);

    CoordinateSpan::new(-(max_lat - min_lat), max_lng - min_lng)
}

/// Northeast/southwest corners of the area on screen.
///
/// A viewport with no area yields [`VisibleRegion::zero`].
pub fn visible_region(center: &LatLng, zoom: f64, viewport: Size) -> VisibleRegion {
    if viewport.is_empty() {
        return VisibleRegion::zero();
    }

    let rect = viewport_rect(center, zoom, viewport);
    let west = pixel_x_to_lng(rect.x);
    let east = pixel_x_to_lng(rect.x + rect.width);
    let north = pixel_y_to_lat(rect.y);
    let south = pixel_y_to_lat(rect.y + rect.height);

    VisibleRegion::new(LatLng::new(north, east), LatLng::new(south, west))
}

/// Ground distance one device pixel covers at `max_zoom`
pub fn distance_per_pixel(max_zoom: f64, screen_scale: f64) -> f64 {
    MAP_WIDTH_AT_REFERENCE_ZOOM / (f64::from(TILE_SIZE) * 2_f64.powf(max_zoom)) / screen_scale
}

/// Camera distance from the surface that shows the ground at `zoom`
pub fn altitude_for_zoom(zoom: f64, max_zoom: f64, screen_scale: f64, fov_radians: f64) -> f64 {
    let scale = 2_f64.powf(max_zoom - zoom);
    distance_per_pixel(max_zoom, screen_scale) * scale / fov_radians.tan()
}

/// Inverse of [`altitude_for_zoom`]
pub fn zoom_for_altitude(altitude: f64, max_zoom: f64, screen_scale: f64, fov_radians: f64) -> f64 {
    let scale = altitude * fov_radians.tan() / distance_per_pixel(max_zoom, screen_scale);
    max_zoom - scale.log2()
}

/// Pixel-space bounding box of `coords`, or `None` for an empty slice
pub fn bounding_box(coords: &[LatLng]) -> Option<MapRect> {
    MapRect::from_points(coords.iter().map(project))
}

/// Zoom at which `rect`, grown by `padding` points on every side, just fits `viewport`.
///
/// Returns `None` when the viewport has no area. A zero-area rectangle fits
/// at any zoom and yields `f64::INFINITY`; callers clamp.
pub fn zoom_to_fit(rect: &MapRect, viewport: Size, padding: f64) -> Option<f64> {
    if viewport.is_empty() {
        return None;
    }

    let available_width = (viewport.width - 2.0 * padding).max(1.0);
    let available_height = (viewport.height - 2.0 * padding).max(1.0);
    let scale = (rect.width / available_width).max(rect.height / available_height);

    Some(REFERENCE_ZOOM - scale.log2())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_pixel_center() {
        let point = project(&LatLng::new(0.0, 0.0));
        assert_eq!(point, Point::new(MERCATOR_OFFSET, MERCATOR_OFFSET));
        assert_eq!(unproject(&point), LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_projection_round_trip() {
        let sf = LatLng::new(37.7749, -122.4194);
        let back = unproject(&project(&sf));
        assert!(back.approx_eq(&sf, 1e-5));
    }

    #[test]
    fn test_poles_are_pinned() {
        assert_eq!(lat_to_pixel_y(90.0), 0.0);
        assert_eq!(lat_to_pixel_y(-90.0), MERCATOR_OFFSET * 2.0);
    }

    #[test]
    fn test_altitude_zoom_round_trip() {
        let fov = default_field_of_view();
        let mut zoom = 2.0;
        while zoom <= 21.0 {
            let altitude = altitude_for_zoom(zoom, 21.0, 2.0, fov);
            let back = zoom_for_altitude(altitude, 21.0, 2.0, fov);
            assert!((back - zoom).abs() < 1e-9, "zoom {} came back as {}", zoom, back);
            zoom += 0.5;
        }
    }

    #[test]
    fn test_altitude_halves_per_zoom_level() {
        let fov = default_field_of_view();
        let far = altitude_for_zoom(10.0, 21.0, 2.0, fov);
        let near = altitude_for_zoom(11.0, 21.0, 2.0, fov);
        assert!((far / near - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_span_shrinks_with_zoom() {
        let center = LatLng::new(37.7749, -122.4194);
        let viewport = Size::new(400.0, 800.0);
        let wide = span_for_zoom(&center, 10.0, viewport);
        let narrow = span_for_zoom(&center, 15.0, viewport);

        assert!(wide.latitude_delta > 0.0);
        assert!(wide.longitude_delta > narrow.longitude_delta);
        assert!(wide.latitude_delta > narrow.latitude_delta);
    }

    #[test]
    fn test_span_clamps_extreme_zoom() {
        let center = LatLng::new(10.0, 10.0);
        let viewport = Size::new(400.0, 400.0);
        assert_eq!(
            span_for_zoom(&center, 40.0, viewport),
            span_for_zoom(&center, MAX_PROJECTION_ZOOM, viewport)
        );
    }

    #[test]
    fn test_visible_region_empty_viewport() {
        let region = visible_region(&LatLng::new(10.0, 10.0), 12.0, Size::zero());
        assert_eq!(region, VisibleRegion::zero());
    }

    #[test]
    fn test_visible_region_contains_center() {
        let center = LatLng::new(37.7749, -122.4194);
        let region = visible_region(&center, 12.0, Size::new(400.0, 800.0));
        assert!(region.contains(&center));
        assert!(region.northeast.lat > region.southwest.lat);
        assert!(region.northeast.lng > region.southwest.lng);
    }

    #[test]
    fn test_bounding_box() {
        assert!(bounding_box(&[]).is_none());

        let p = LatLng::new(48.8566, 2.3522);
        let single = bounding_box(&[p]).unwrap();
        assert_eq!((single.width, single.height), (0.0, 0.0));
        assert_eq!(Point::new(single.x, single.y), project(&p));

        let rect = bounding_box(&[LatLng::new(1.0, -1.0), LatLng::new(-1.0, 1.0)]).unwrap();
        assert!(rect.width > 0.0 && rect.height > 0.0);
        assert_eq!(Point::new(rect.x, rect.y), project(&LatLng::new(1.0, -1.0)));
    }

    #[test]
    fn test_zoom_to_fit() {
        let viewport = Size::new(400.0, 400.0);
        let rect = MapRect::new(0.0, 0.0, 400.0 * 1024.0, 100.0);
        let zoom = zoom_to_fit(&rect, viewport, 0.0).unwrap();
        assert!((zoom - 11.0).abs() < 1e-9);

        let padded = zoom_to_fit(&rect, viewport, 50.0).unwrap();
        assert!(padded < zoom);

        assert!(zoom_to_fit(&rect, Size::zero(), 0.0).is_none());
        let point = MapRect::new(5.0, 5.0, 0.0, 0.0);
        assert_eq!(zoom_to_fit(&point, viewport, 0.0), Some(f64::INFINITY));
    }
}
