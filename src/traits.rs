//! Interfaces to the collaborators a corridor search depends on.
//!
//! Routing and place search are out-of-process services and are modelled as
//! async traits. The map surface is a synchronous sink driven by the single
//! writer that owns it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{RoutingError, SearchError};
use crate::geo::Coordinate;
use crate::place::Candidate;
use crate::polyline::Polyline;
use crate::region::SearchRegion;
use crate::route::RouteResult;

/// Travel mode requested from the routing service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Car,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteOptions {
    pub travel_mode: TravelMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// BCP 47 language tag for result titles, e.g. `en-US`.
    pub language: String,
    pub max_results: usize,
}

/// Computes routes through an ordered list of waypoints.
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Returns at least one route on success; alternatives, if any, follow
    /// the preferred route.
    async fn calculate_route(
        &self,
        waypoints: &[Coordinate],
        options: &RouteOptions,
    ) -> Result<Vec<RouteResult>, RoutingError>;
}

/// Text search for places bounded to a region.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        region: &SearchRegion,
        options: &SearchOptions,
    ) -> Result<Vec<Candidate>, SearchError>;
}

/// Marker imagery known to the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerIcon {
    Waypoint,
    Restaurant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolylineStyle {
    pub width_px: f32,
    /// RGBA, each channel in `[0, 1]`.
    pub color: [f32; 4],
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            width_px: 20.0,
            color: [0.0, 0.56, 0.54, 0.63],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolylineHandle(pub u64);

/// Rendering sink for markers and route lines.
pub trait MapSurface: Send {
    fn add_marker(&mut self, coordinate: Coordinate, icon: MarkerIcon, label: &str) -> MarkerHandle;

    fn add_polyline(&mut self, polyline: &Polyline, style: &PolylineStyle) -> PolylineHandle;

    fn remove_marker(&mut self, handle: MarkerHandle);

    fn remove_polyline(&mut self, handle: PolylineHandle);

    /// Drops pinned labels and any overlay not removed individually.
    fn clear_all(&mut self);
}
