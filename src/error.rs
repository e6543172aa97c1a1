//! Error types for corridor searches and the services they depend on.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),
    #[error("polyline needs at least 2 points, got {found}")]
    TooFewPoints { found: usize },
    #[error("coordinate set is empty")]
    EmptyCoordinates,
    #[error("invalid encoded polyline: {0}")]
    InvalidEncoding(String),
    #[error("expected `LAT,LNG`, got {0:?}")]
    Unparsable(String),
}

/// Failures reported by a routing service.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("no route found: {message}")]
    NoRoute { message: String },
    #[error("routing service error {code}: {message}")]
    Service { code: String, message: String },
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid routing response: {0}")]
    InvalidResponse(String),
}

/// Whether a search failure calls for a tighter corridor or is generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorKind {
    RegionTooLarge,
    Other,
}

/// Failures reported by a place search service.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search region radius {radius_m:.0} m exceeds the provider limit of {max_radius_m:.0} m")]
    RegionTooLarge { radius_m: f64, max_radius_m: f64 },
    #[error("search service error {status}: {message}")]
    Service { status: u16, message: String },
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid search response: {0}")]
    InvalidResponse(String),
}

impl SearchError {
    pub fn kind(&self) -> SearchErrorKind {
        match self {
            SearchError::RegionTooLarge { .. } => SearchErrorKind::RegionTooLarge,
            _ => SearchErrorKind::Other,
        }
    }
}

/// Reasons a corridor search attempt ends without results.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("at least 2 waypoints are required, have {found}")]
    NotEnoughWaypoints { found: usize },
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error("route geometry is unusable: {0}")]
    DegenerateRoute(GeoError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("search {generation} was superseded by a newer search or a clear")]
    Superseded { generation: u64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("corridor half-width must be positive, got {0}")]
    InvalidHalfWidth(f64),
    #[error("max_results must be at least 1")]
    ZeroMaxResults,
    #[error("search query must not be empty")]
    EmptyQuery,
}
