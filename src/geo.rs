//! Spherical geometry on WGS84 coordinates.
//!
//! Distances use the haversine formula on a sphere of mean Earth radius.
//! Centers use the vector (spherical) mean, which stays correct across the
//! antimeridian and near the poles where averaging degrees does not.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Below this norm the averaged unit vector has no usable direction.
const DEGENERATE_NORM: f64 = 1e-12;

/// A latitude/longitude pair in degrees.
///
/// Always in range: construction and deserialization both go through
/// [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    /// Creates a coordinate, rejecting out-of-range or non-finite values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        great_circle_distance_m(*self, *other)
    }

    fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lng = self.lng.to_radians();
        let cos_lat = lat.cos();
        [cos_lat * lng.cos(), cos_lat * lng.sin(), lat.sin()]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Parses `LAT,LNG` in degrees.
impl FromStr for Coordinate {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| GeoError::Unparsable(s.to_string()))?;
        let lat = lat
            .trim()
            .parse()
            .map_err(|_| GeoError::Unparsable(s.to_string()))?;
        let lng = lng
            .trim()
            .parse()
            .map_err(|_| GeoError::Unparsable(s.to_string()))?;
        Coordinate::new(lat, lng)
    }
}

/// Great-circle distance between two points in meters.
pub fn great_circle_distance_m(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Accumulated great-circle length along consecutive points, in meters.
pub fn path_length_m(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| great_circle_distance_m(pair[0], pair[1]))
        .sum()
}

/// Spherical mean of a non-empty coordinate set.
///
/// A single coordinate is returned unchanged. When the unit vectors cancel
/// out (e.g. two antipodal points) the mean has no direction, and the first
/// coordinate is returned instead of an arbitrary `atan2(0, 0)` result.
///
/// Returned longitudes lie in `(-180, 180]`.
pub fn spherical_mean(coords: &[Coordinate]) -> Result<Coordinate, GeoError> {
    let first = match coords {
        [] => return Err(GeoError::EmptyCoordinates),
        [only] => return Ok(*only),
        [first, ..] => *first,
    };

    let mut sum = [0.0_f64; 3];
    for coord in coords {
        let v = coord.to_unit_vector();
        sum[0] += v[0];
        sum[1] += v[1];
        sum[2] += v[2];
    }

    let total = coords.len() as f64;
    let [x, y, z] = sum.map(|component| component / total);

    if (x * x + y * y + z * z).sqrt() < DEGENERATE_NORM {
        return Ok(first);
    }

    let hyp = (x * x + y * y).sqrt();
    let lat = z.atan2(hyp).to_degrees().clamp(-90.0, 90.0);
    let mut lng = y.atan2(x).to_degrees();
    if lng <= -180.0 {
        lng = 180.0;
    }

    Ok(Coordinate {
        lat,
        lng: lng.min(180.0),
    })
}
