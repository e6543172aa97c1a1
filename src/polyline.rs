//! Polyline representation for route geometries.
//!
//! A [`Polyline`] always has at least two vertices. Routing providers ship
//! geometries in the compact encoded-polyline format; [`decode`] and
//! [`encode`] convert at that boundary so the rest of the crate only sees
//! decoded coordinates.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::geo::{self, Coordinate};

/// Coordinate precision used by OSRM's `geometries=polyline`.
pub const PRECISION_5: u32 = 5;

/// A route shape as an ordered sequence of at least two coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a polyline, rejecting shapes with fewer than two points.
    pub fn new(points: Vec<Coordinate>) -> Result<Self, GeoError> {
        if points.len() < 2 {
            return Err(GeoError::TooFewPoints {
                found: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true for a constructed polyline.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Accumulated great-circle length in meters.
    pub fn length_m(&self) -> f64 {
        geo::path_length_m(&self.points)
    }
}

impl TryFrom<Vec<Coordinate>> for Polyline {
    type Error = GeoError;

    fn try_from(points: Vec<Coordinate>) -> Result<Self, Self::Error> {
        Polyline::new(points)
    }
}

impl From<Polyline> for Vec<Coordinate> {
    fn from(polyline: Polyline) -> Self {
        polyline.points
    }
}

/// Decodes an encoded polyline string.
///
/// Returns raw points rather than a [`Polyline`]: a provider may legally
/// hand back fewer than two vertices and callers decide how to treat that.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinate>, GeoError> {
    let factor = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat += next_value(bytes, &mut index)?;
        lng += next_value(bytes, &mut index)?;
        points.push(Coordinate::new(lat as f64 / factor, lng as f64 / factor)?);
    }

    Ok(points)
}

/// Encodes coordinates into the encoded-polyline format.
pub fn encode(points: &[Coordinate], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut out = String::with_capacity(points.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.lat() * factor).round() as i64;
        let lng = (point.lng() * factor).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, GeoError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or_else(|| GeoError::InvalidEncoding("truncated input".to_string()))?;
        if !(63..=126).contains(&byte) {
            return Err(GeoError::InvalidEncoding(format!(
                "unexpected character {:?} at offset {}",
                byte as char, *index
            )));
        }
        *index += 1;

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
        if shift > 60 {
            return Err(GeoError::InvalidEncoding("value overflows 64 bits".to_string()));
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn push_value(out: &mut String, value: i64) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push(char::from(((0x20 | (v & 0x1f)) + 63) as u8));
        v >>= 5;
    }
    out.push(char::from((v + 63) as u8));
}
