//! Corridor membership for search candidates.
//!
//! A candidate is near the route when it lies within the half-width of at
//! least one route vertex. This approximates distance to the continuous
//! curve, so precision depends on vertex density: on sparse shapes a
//! candidate next to the middle of a long straight segment can be missed.
//!
//! Cost is O(vertices) per candidate and O(candidates x vertices) per
//! search. Result sets are capped by the provider (30 by default), so a
//! search filters at most a few hundred thousand distance evaluations even
//! for dense routes.

use rayon::prelude::*;

use crate::geo::Coordinate;
use crate::place::Candidate;
use crate::polyline::Polyline;

/// Whether `candidate` lies within `half_width_m` of any route vertex.
pub fn is_near_route(candidate: Coordinate, polyline: &Polyline, half_width_m: f64) -> bool {
    polyline
        .points()
        .iter()
        .any(|vertex| candidate.distance_to(vertex) <= half_width_m)
}

/// Distance from `candidate` to the closest route vertex, in meters.
pub fn nearest_vertex_distance_m(candidate: Coordinate, polyline: &Polyline) -> f64 {
    polyline
        .points()
        .iter()
        .map(|vertex| candidate.distance_to(vertex))
        .fold(f64::INFINITY, f64::min)
}

/// Keeps the candidates inside the corridor, preserving provider order.
///
/// Candidates are independent, so they are evaluated in parallel.
pub fn filter_candidates(
    candidates: &[Candidate],
    polyline: &Polyline,
    half_width_m: f64,
) -> Vec<Candidate> {
    candidates
        .par_iter()
        .filter(|candidate| is_near_route(candidate.coordinate, polyline, half_width_m))
        .cloned()
        .collect()
}
