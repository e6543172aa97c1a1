//! In-process stand-ins for the routing service, place search and map.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use corridor_search::error::{RoutingError, SearchError};
use corridor_search::geo::Coordinate;
use corridor_search::place::Candidate;
use corridor_search::polyline::Polyline;
use corridor_search::region::SearchRegion;
use corridor_search::route::RouteResult;
use corridor_search::traits::{
    MapSurface, MarkerHandle, MarkerIcon, PlaceSearch, PolylineHandle, PolylineStyle,
    RouteOptions, RoutingService, SearchOptions,
};

#[derive(Debug, Clone)]
pub enum RouteReply {
    Routes(Vec<RouteResult>),
    NoRoute(String),
}

/// Routing service returning a fixed reply.
pub struct ScriptedRouting {
    reply: RouteReply,
    calls: Arc<AtomicUsize>,
    hold_first: Option<Arc<Notify>>,
}

impl ScriptedRouting {
    pub fn new(reply: RouteReply) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            hold_first: None,
        }
    }

    pub fn route(route: RouteResult) -> Self {
        Self::new(RouteReply::Routes(vec![route]))
    }

    /// The first call waits until `release` is notified.
    pub fn hold_first_call(mut self, release: Arc<Notify>) -> Self {
        self.hold_first = Some(release);
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl RoutingService for ScriptedRouting {
    async fn calculate_route(
        &self,
        waypoints: &[Coordinate],
        _options: &RouteOptions,
    ) -> Result<Vec<RouteResult>, RoutingError> {
        assert!(waypoints.len() >= 2, "finder must not route fewer than 2 waypoints");
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            if let Some(release) = &self.hold_first {
                release.notified().await;
            }
        }
        match &self.reply {
            RouteReply::Routes(routes) => Ok(routes.clone()),
            RouteReply::NoRoute(message) => Err(RoutingError::NoRoute {
                message: message.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SearchReply {
    Candidates(Vec<Candidate>),
    RegionTooLarge,
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct SearchCall {
    pub query: String,
    pub region: SearchRegion,
    pub options: SearchOptions,
}

/// Place search returning a fixed reply and recording each request.
pub struct ScriptedSearch {
    reply: SearchReply,
    calls: Arc<Mutex<Vec<SearchCall>>>,
    hold_first: Option<Arc<Notify>>,
}

impl ScriptedSearch {
    pub fn new(reply: SearchReply) -> Self {
        Self {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
            hold_first: None,
        }
    }

    pub fn candidates(candidates: Vec<Candidate>) -> Self {
        Self::new(SearchReply::Candidates(candidates))
    }

    /// The first call waits until `release` is notified.
    pub fn hold_first_call(mut self, release: Arc<Notify>) -> Self {
        self.hold_first = Some(release);
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<SearchCall>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl PlaceSearch for ScriptedSearch {
    async fn search(
        &self,
        query: &str,
        region: &SearchRegion,
        options: &SearchOptions,
    ) -> Result<Vec<Candidate>, SearchError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(SearchCall {
                query: query.to_string(),
                region: *region,
                options: options.clone(),
            });
            calls.len()
        };
        if call == 1 {
            if let Some(release) = &self.hold_first {
                release.notified().await;
            }
        }
        match &self.reply {
            SearchReply::Candidates(candidates) => Ok(candidates.clone()),
            SearchReply::RegionTooLarge => Err(SearchError::RegionTooLarge {
                radius_m: region.radius_m,
                max_radius_m: 1000.0,
            }),
            SearchReply::Unavailable => Err(SearchError::Service {
                status: 503,
                message: "service unavailable".to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct SurfaceLog {
    next_id: u64,
    pub markers: BTreeMap<u64, (Coordinate, MarkerIcon, String)>,
    pub polylines: BTreeMap<u64, Vec<Coordinate>>,
    pub unknown_removals: usize,
    pub clear_all_calls: usize,
}

impl SurfaceLog {
    pub fn labels(&self, icon: MarkerIcon) -> Vec<String> {
        self.markers
            .values()
            .filter(|(_, i, _)| *i == icon)
            .map(|(_, _, label)| label.clone())
            .collect()
    }
}

/// Map surface that records what is currently drawn.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn log(&self) -> std::sync::MutexGuard<'_, SurfaceLog> {
        self.log.lock().unwrap()
    }
}

impl MapSurface for RecordingSurface {
    fn add_marker(&mut self, coordinate: Coordinate, icon: MarkerIcon, label: &str) -> MarkerHandle {
        let mut log = self.log.lock().unwrap();
        log.next_id += 1;
        let id = log.next_id;
        log.markers.insert(id, (coordinate, icon, label.to_string()));
        MarkerHandle(id)
    }

    fn add_polyline(&mut self, polyline: &Polyline, _style: &PolylineStyle) -> PolylineHandle {
        let mut log = self.log.lock().unwrap();
        log.next_id += 1;
        let id = log.next_id;
        log.polylines.insert(id, polyline.points().to_vec());
        PolylineHandle(id)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        let mut log = self.log.lock().unwrap();
        if log.markers.remove(&handle.0).is_none() {
            log.unknown_removals += 1;
        }
    }

    fn remove_polyline(&mut self, handle: PolylineHandle) {
        let mut log = self.log.lock().unwrap();
        if log.polylines.remove(&handle.0).is_none() {
            log.unknown_removals += 1;
        }
    }

    fn clear_all(&mut self) {
        self.log.lock().unwrap().clear_all_calls += 1;
    }
}
