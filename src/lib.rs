//! corridor-search
//!
//! Finds points of interest inside a corridor around a multi-waypoint route:
//! route the waypoints, search a region enclosing the route, keep the
//! results near the route.

pub mod advisory;
pub mod config;
pub mod error;
pub mod finder;
pub mod geo;
pub mod nominatim;
pub mod osrm;
pub mod place;
pub mod polyline;
pub mod proximity;
pub mod region;
pub mod route;
pub mod state;
pub mod traits;

pub use error::{FinderError, GeoError, RoutingError, SearchError, SearchErrorKind};
pub use finder::{RestaurantFinder, SearchReport};
pub use geo::Coordinate;
