use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude.
///
/// On the wire a coordinate is a two-element `[lat, lng]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Checks whether two coordinates agree within `tolerance` degrees on both axes
    pub fn approx_eq(&self, other: &LatLng, tolerance: f64) -> bool {
        (self.lat - other.lat).abs() <= tolerance && (self.lng - other.lng).abs() <= tolerance
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(coord: LatLng) -> Self {
        [coord.lat, coord.lng]
    }
}

/// Represents a point in screen or projected pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Size of the map view in screen points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// A view with no area has nothing visible
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Latitude/longitude extent of a region, as the native region camera expects it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateSpan {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl CoordinateSpan {
    pub fn new(latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude_delta,
            longitude_delta,
        }
    }
}

/// The corners of the area currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleRegion {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

impl VisibleRegion {
    pub fn new(northeast: LatLng, southwest: LatLng) -> Self {
        Self {
            northeast,
            southwest,
        }
    }

    /// The degenerate region reported for a view without size
    pub fn zero() -> Self {
        Self::new(LatLng::default(), LatLng::default())
    }

    /// Checks if the region contains a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.southwest.lat
            && point.lat <= self.northeast.lat
            && point.lng >= self.southwest.lng
            && point.lng <= self.northeast.lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(40.7128, -74.0060);
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lng, -74.0060);
    }

    #[test]
    fn test_lat_lng_wire_shape() {
        let coord: LatLng = serde_json::from_str("[37.7749, -122.4194]").unwrap();
        assert_eq!(coord, LatLng::new(37.7749, -122.4194));
        assert_eq!(serde_json::to_string(&coord).unwrap(), "[37.7749,-122.4194]");
    }

    #[test]
    fn test_visible_region_wire_shape() {
        let region = VisibleRegion::new(LatLng::new(1.0, 2.0), LatLng::new(-1.0, -2.0));
        let value = serde_json::to_value(region).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"northeast": [1.0, 2.0], "southwest": [-1.0, -2.0]})
        );
        assert!(region.contains(&LatLng::new(0.5, 0.5)));
    }

    #[test]
    fn test_empty_size() {
        assert!(Size::zero().is_empty());
        assert!(Size::new(100.0, 0.0).is_empty());
        assert!(!Size::new(100.0, 50.0).is_empty());
    }
}
