//! Restaurant search along a multi-waypoint route.
//!
//! A search runs `waypoints -> route -> region -> place search -> corridor
//! filter -> markers`. Routing and search are awaited strictly in sequence
//! because the search region depends on the route.
//!
//! Every search is tagged with a generation. Starting a new search or
//! clearing the map bumps the generation; an older search that resumes
//! afterwards renders nothing more, takes back the route it drew and ends
//! with [`FinderError::Superseded`].
//! The map surface, the waypoints and the handles of everything rendered
//! live behind one lock that is never held across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::advisory::{Advisory, extract_advisories};
use crate::config::FinderConfig;
use crate::error::{ConfigError, FinderError, RoutingError, SearchErrorKind};
use crate::geo::Coordinate;
use crate::place::Candidate;
use crate::proximity::filter_candidates;
use crate::region::{SearchRegion, build_region};
use crate::route::RouteResult;
use crate::state::{FailureReason, SearchAttempt, SearchState};
use crate::traits::{
    MapSurface, MarkerHandle, MarkerIcon, PlaceSearch, PolylineHandle, PolylineStyle,
    RoutingService,
};

/// Label shown next to waypoint markers.
const WAYPOINT_LABEL: &str = " ";

/// Outcome of a completed search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub generation: u64,
    pub route: RouteResult,
    pub advisories: Vec<Advisory>,
    pub region: SearchRegion,
    /// Number of candidates the search service returned before filtering.
    pub returned: usize,
    /// Accepted POIs in the order the search service returned them.
    pub restaurants: Vec<Candidate>,
}

struct Scene<M> {
    surface: M,
    generation: u64,
    last_state: SearchState,
    waypoints: Vec<Coordinate>,
    markers: Vec<MarkerHandle>,
    polylines: Vec<PolylineHandle>,
}

pub struct RestaurantFinder<R, S, M> {
    routing: R,
    search: S,
    config: FinderConfig,
    route_style: PolylineStyle,
    scene: Mutex<Scene<M>>,
}

impl<R, S, M> RestaurantFinder<R, S, M>
where
    R: RoutingService,
    S: PlaceSearch,
    M: MapSurface,
{
    pub fn new(routing: R, search: S, surface: M, config: FinderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            routing,
            search,
            config,
            route_style: PolylineStyle::default(),
            scene: Mutex::new(Scene {
                surface,
                generation: 0,
                last_state: SearchState::Idle,
                waypoints: Vec::new(),
                markers: Vec::new(),
                polylines: Vec::new(),
            }),
        })
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// A panicking surface must not wedge the finder, so poisoning is ignored.
    fn scene(&self) -> MutexGuard<'_, Scene<M>> {
        self.scene.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a waypoint and marks it on the map.
    pub fn add_waypoint(&self, coordinate: Coordinate) {
        let mut scene = self.scene();
        let handle = scene
            .surface
            .add_marker(coordinate, MarkerIcon::Waypoint, WAYPOINT_LABEL);
        scene.markers.push(handle);
        scene.waypoints.push(coordinate);
        debug!(waypoint = %coordinate, total = scene.waypoints.len(), "waypoint added");
    }

    pub fn waypoints(&self) -> Vec<Coordinate> {
        self.scene().waypoints.clone()
    }

    pub fn marker_count(&self) -> usize {
        self.scene().markers.len()
    }

    pub fn polyline_count(&self) -> usize {
        self.scene().polylines.len()
    }

    /// State the most recent search ended in, or `Idle` after a clear.
    pub fn last_state(&self) -> SearchState {
        self.scene().last_state
    }

    /// Removes everything this finder rendered and forgets the waypoints.
    ///
    /// Searches still in flight are invalidated. Clearing an empty map is a
    /// no-op.
    pub fn clear(&self) {
        let mut scene = self.scene();
        scene.generation += 1;
        scene.last_state = SearchState::Idle;

        let markers = std::mem::take(&mut scene.markers);
        let polylines = std::mem::take(&mut scene.polylines);
        for handle in &markers {
            scene.surface.remove_marker(*handle);
        }
        for handle in &polylines {
            scene.surface.remove_polyline(*handle);
        }
        scene.waypoints.clear();
        scene.surface.clear_all();

        debug!(
            markers = markers.len(),
            polylines = polylines.len(),
            "map cleared"
        );
    }

    /// Routes through the collected waypoints and marks the restaurants
    /// found within the configured corridor around the route.
    pub async fn find_restaurants(&self) -> Result<SearchReport, FinderError> {
        let (generation, waypoints) = {
            let mut scene = self.scene();
            if scene.waypoints.len() < 2 {
                return Err(FinderError::NotEnoughWaypoints {
                    found: scene.waypoints.len(),
                });
            }
            scene.generation += 1;
            scene.last_state = SearchState::RouteRequested;
            (scene.generation, scene.waypoints.clone())
        };

        let mut attempt = SearchAttempt::new(generation);
        attempt.advance(SearchState::RouteRequested);
        debug!(generation, waypoints = waypoints.len(), "requesting route");

        let routes = match self
            .routing
            .calculate_route(&waypoints, &self.config.route_options())
            .await
        {
            Ok(routes) => routes,
            Err(err) => {
                warn!(generation, error = %err, "route calculation failed");
                return Err(self.fail(&mut attempt, FailureReason::Routing, err.into()));
            }
        };

        // Alternatives are ignored; the provider lists its preferred route first.
        let Some(route) = routes.into_iter().next() else {
            let err = RoutingError::NoRoute {
                message: "routing service returned no routes".to_string(),
            };
            warn!(generation, error = %err, "route calculation failed");
            return Err(self.fail(&mut attempt, FailureReason::Routing, err.into()));
        };
        attempt.advance(SearchState::RouteReady);
        self.set_last_state(&attempt);

        let advisories = extract_advisories(&route);
        for advisory in &advisories {
            warn!(
                generation,
                code = %advisory.code,
                segment = advisory.segment_index,
                "route contains a warning"
            );
        }

        let polyline = match route.polyline() {
            Ok(polyline) => polyline,
            Err(err) => {
                debug!(generation, error = %err, "skipping route rendering");
                return Err(self.fail(
                    &mut attempt,
                    FailureReason::DegenerateRoute,
                    FinderError::DegenerateRoute(err),
                ));
            }
        };

        let route_handle = {
            let mut scene = self.scene();
            if scene.generation == generation {
                let handle = scene.surface.add_polyline(&polyline, &self.route_style);
                scene.polylines.push(handle);
                Some(handle)
            } else {
                None
            }
        };
        let Some(route_handle) = route_handle else {
            return Err(self.supersede(&mut attempt, None));
        };

        let region = build_region(&polyline, route.length_m);
        attempt.advance(SearchState::SearchRequested);
        self.set_last_state(&attempt);
        debug!(
            generation,
            center = %region.center,
            radius_m = region.radius_m,
            query = %self.config.query,
            "searching along route"
        );

        let candidates = match self
            .search
            .search(&self.config.query, &region, &self.config.search_options())
            .await
        {
            Ok(candidates) => candidates,
            Err(_) if !self.is_current(generation) => {
                return Err(self.supersede(&mut attempt, Some(route_handle)));
            }
            Err(err) => {
                let kind = err.kind();
                match kind {
                    SearchErrorKind::RegionTooLarge => warn!(
                        generation,
                        error = %err,
                        "route too long or corridor half-width too small"
                    ),
                    SearchErrorKind::Other => {
                        warn!(generation, error = %err, "no restaurants found along the route")
                    }
                }
                return Err(self.fail(&mut attempt, FailureReason::Search(kind), err.into()));
            }
        };

        let returned = candidates.len();
        let restaurants = filter_candidates(&candidates, &polyline, self.config.half_width_m);
        debug!(
            generation,
            returned,
            accepted = restaurants.len(),
            half_width_m = self.config.half_width_m,
            "filtered search results"
        );

        let committed = {
            let mut scene = self.scene();
            if scene.generation == generation {
                for restaurant in &restaurants {
                    let handle = scene.surface.add_marker(
                        restaurant.coordinate,
                        MarkerIcon::Restaurant,
                        &restaurant.title,
                    );
                    scene.markers.push(handle);
                }
                attempt.advance(SearchState::Completed);
                scene.last_state = attempt.state();
                true
            } else {
                false
            }
        };
        if !committed {
            return Err(self.supersede(&mut attempt, Some(route_handle)));
        }

        info!(
            generation,
            returned,
            accepted = restaurants.len(),
            advisories = advisories.len(),
            "search along route completed"
        );

        Ok(SearchReport {
            generation,
            route,
            advisories,
            region,
            returned,
            restaurants,
        })
    }

    fn is_current(&self, generation: u64) -> bool {
        self.scene().generation == generation
    }

    fn set_last_state(&self, attempt: &SearchAttempt) {
        let mut scene = self.scene();
        if scene.generation == attempt.generation() {
            scene.last_state = attempt.state();
        }
    }

    fn fail(&self, attempt: &mut SearchAttempt, reason: FailureReason, err: FinderError) -> FinderError {
        attempt.fail(reason);
        self.set_last_state(attempt);
        err
    }

    /// Ends a stale attempt. A route it drew is removed unless a clear
    /// already took it off the map.
    fn supersede(&self, attempt: &mut SearchAttempt, route: Option<PolylineHandle>) -> FinderError {
        debug!(generation = attempt.generation(), "discarding stale search");
        if let Some(handle) = route {
            let mut scene = self.scene();
            if let Some(index) = scene.polylines.iter().position(|tracked| *tracked == handle) {
                scene.polylines.remove(index);
                scene.surface.remove_polyline(handle);
            }
        }
        attempt.fail(FailureReason::Superseded);
        FinderError::Superseded {
            generation: attempt.generation(),
        }
    }
}
