//! Places returned by a search provider.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A point of interest returned by a place search.
///
/// Candidates that pass the corridor filter are the accepted POIs of a
/// search; they keep the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub coordinate: Coordinate,
}
