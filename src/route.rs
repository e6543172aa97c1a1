//! Computed routes as returned by a routing service.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::geo::{self, Coordinate};
use crate::polyline::Polyline;

/// Notices a provider attached to one section (leg) of a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub notices: Vec<String>,
}

/// A computed route: its shape, its length, and per-segment notices.
///
/// The shape is kept as the provider returned it. Use [`RouteResult::polyline`]
/// to get a validated [`Polyline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub shape: Vec<Coordinate>,
    pub length_m: f64,
    pub segments: Vec<RouteSegment>,
}

impl RouteResult {
    pub fn new(shape: Vec<Coordinate>, length_m: f64, segments: Vec<RouteSegment>) -> Self {
        Self {
            shape,
            length_m,
            segments,
        }
    }

    /// Route whose length is accumulated along the shape.
    pub fn from_shape(shape: Vec<Coordinate>, segments: Vec<RouteSegment>) -> Self {
        let length_m = geo::path_length_m(&shape);
        Self::new(shape, length_m, segments)
    }

    /// The route shape as a polyline; fails for fewer than two points.
    pub fn polyline(&self) -> Result<Polyline, GeoError> {
        Polyline::new(self.shape.clone())
    }
}
