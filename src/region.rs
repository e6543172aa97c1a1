//! Search region derivation for corridor searches.
//!
//! The region is a circle centered on the spherical mean of the route shape
//! with the full route length as its radius. Any route fits inside a circle
//! of its own length around any of its points, so the circle always encloses
//! the route. Long or winding routes get a loose region; tightening that is
//! a caller policy, the radius formula stays as is.

use serde::{Deserialize, Serialize};

use crate::geo::{self, Coordinate, EARTH_RADIUS_M};
use crate::polyline::Polyline;

/// Circle submitted to the place search provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchRegion {
    pub center: Coordinate,
    pub radius_m: f64,
}

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

/// Builds the search region for a route.
///
/// Negative or non-finite lengths collapse to a zero radius.
pub fn build_region(polyline: &Polyline, length_m: f64) -> SearchRegion {
    let points = polyline.points();
    let center = geo::spherical_mean(points).unwrap_or(points[0]);
    let radius_m = if length_m.is_finite() {
        length_m.max(0.0)
    } else {
        0.0
    };

    SearchRegion { center, radius_m }
}

impl SearchRegion {
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        geo::great_circle_distance_m(self.center, *coordinate) <= self.radius_m
    }

    /// Smallest latitude/longitude box enclosing the circle.
    ///
    /// Boxes that would reach a pole or wrap the antimeridian span the full
    /// longitude range.
    pub fn bounding_box(&self) -> BoundingBox {
        let delta_lat = (self.radius_m / EARTH_RADIUS_M).to_degrees();
        let min_lat = (self.center.lat() - delta_lat).max(-90.0);
        let max_lat = (self.center.lat() + delta_lat).min(90.0);

        let full_width = BoundingBox {
            min_lat,
            min_lng: -180.0,
            max_lat,
            max_lng: 180.0,
        };

        if min_lat <= -90.0 || max_lat >= 90.0 {
            return full_width;
        }

        let cos_lat = self.center.lat().to_radians().cos();
        let ratio = (self.radius_m / EARTH_RADIUS_M).sin() / cos_lat;
        if ratio >= 1.0 {
            return full_width;
        }
        let delta_lng = ratio.asin().to_degrees();
        let min_lng = self.center.lng() - delta_lng;
        let max_lng = self.center.lng() + delta_lng;
        if min_lng < -180.0 || max_lng > 180.0 {
            return full_width;
        }

        BoundingBox {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
        }
    }
}
