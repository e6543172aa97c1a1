//! OSRM HTTP adapter for route calculation.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::RoutingError;
use crate::geo::Coordinate;
use crate::polyline::{self, PRECISION_5};
use crate::route::{RouteResult, RouteSegment};
use crate::traits::{RouteOptions, RoutingService, TravelMode};

/// Notice attached to a leg whose waypoint was moved onto the road network.
pub const WAYPOINT_SNAPPED: &str = "waypointSnapped";

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    /// Snap distances above this produce a `waypointSnapped` notice.
    pub snap_warning_m: f64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
            snap_warning_m: 250.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, waypoints: &[Coordinate], options: &RouteOptions) -> String {
        let profile = match options.travel_mode {
            TravelMode::Car => self.config.profile.as_str(),
        };
        let coords = waypoints
            .iter()
            .map(|c| format!("{:.6},{:.6}", c.lng(), c.lat()))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline&alternatives=false",
            self.config.base_url.trim_end_matches('/'),
            profile,
            coords
        )
    }
}

#[async_trait]
impl RoutingService for OsrmClient {
    async fn calculate_route(
        &self,
        waypoints: &[Coordinate],
        options: &RouteOptions,
    ) -> Result<Vec<RouteResult>, RoutingError> {
        if waypoints.len() < 2 {
            return Err(RoutingError::Service {
                code: "InvalidQuery".to_string(),
                message: format!("at least 2 waypoints are required, got {}", waypoints.len()),
            });
        }

        let url = self.route_url(waypoints, options);
        debug!(%url, "requesting OSRM route");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.json::<OsrmRouteResponse>().await.map_err(|err| {
            if status.is_success() {
                RoutingError::InvalidResponse(err.to_string())
            } else {
                RoutingError::Service {
                    code: status.as_u16().to_string(),
                    message: err.to_string(),
                }
            }
        })?;

        parse_route_response(body, self.config.snap_warning_m)
    }
}

fn parse_route_response(
    body: OsrmRouteResponse,
    snap_warning_m: f64,
) -> Result<Vec<RouteResult>, RoutingError> {
    if body.code != "Ok" {
        let message = body.message.unwrap_or_else(|| body.code.clone());
        return Err(match body.code.as_str() {
            "NoRoute" | "NoSegment" => RoutingError::NoRoute { message },
            _ => RoutingError::Service {
                code: body.code,
                message,
            },
        });
    }

    if body.routes.is_empty() {
        return Err(RoutingError::NoRoute {
            message: "OSRM returned no routes".to_string(),
        });
    }

    let snapped: Vec<bool> = body
        .waypoints
        .iter()
        .map(|w| w.distance.is_some_and(|d| d > snap_warning_m))
        .collect();

    body.routes
        .into_iter()
        .map(|route| {
            let shape = polyline::decode(&route.geometry, PRECISION_5)
                .map_err(|err| RoutingError::InvalidResponse(err.to_string()))?;
            let segments = leg_segments(route.legs.len(), &snapped);
            Ok(RouteResult::new(shape, route.distance, segments))
        })
        .collect()
}

/// Leg `i` runs from waypoint `i` to `i + 1`. A snapped start waypoint marks
/// its leg; the final waypoint marks the last leg.
fn leg_segments(leg_count: usize, snapped: &[bool]) -> Vec<RouteSegment> {
    (0..leg_count)
        .map(|leg| {
            let mut segment = RouteSegment::default();
            if snapped.get(leg).copied().unwrap_or(false) {
                segment.notices.push(WAYPOINT_SNAPPED.to_string());
            }
            let is_last = leg + 1 == leg_count;
            if is_last && snapped.get(leg + 1).copied().unwrap_or(false) {
                segment.notices.push(WAYPOINT_SNAPPED.to_string());
            }
            segment
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
    #[serde(default)]
    waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    distance: f64,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    distance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn parse(json: &str) -> Result<Vec<RouteResult>, RoutingError> {
        let body: OsrmRouteResponse = serde_json::from_str(json).unwrap();
        parse_route_response(body, 250.0)
    }

    #[test]
    fn test_route_url_uses_lng_lat_order() {
        let client = OsrmClient::new(OsrmConfig::default()).unwrap();
        let url = client.route_url(
            &[coord(52.5163, 13.3777), coord(52.5219, 13.4132)],
            &RouteOptions::default(),
        );
        assert_eq!(
            url,
            "http://localhost:5000/route/v1/car/13.377700,52.516300;13.413200,52.521900\
             ?overview=full&geometries=polyline&alternatives=false"
        );
    }

    #[test]
    fn test_parse_ok_response() {
        let shape = vec![coord(52.5163, 13.3777), coord(52.517, 13.3889), coord(52.5219, 13.4132)];
        let json = format!(
            r#"{{"code":"Ok","routes":[{{"geometry":{},"distance":2712.4,"duration":420.0,
                "legs":[{{"distance":2712.4,"duration":420.0,"summary":"","steps":[]}}]}}],
                "waypoints":[{{"distance":3.1,"name":"Pariser Platz","location":[13.3777,52.5163]}},
                             {{"distance":12.0,"name":"Alexanderplatz","location":[13.4132,52.5219]}}]}}"#,
            serde_json::to_string(&polyline::encode(&shape, PRECISION_5)).unwrap()
        );
        let routes = parse(&json).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].shape, shape);
        assert_eq!(routes[0].length_m, 2712.4);
        assert_eq!(routes[0].segments, vec![RouteSegment::default()]);
    }

    #[test]
    fn test_parse_no_route() {
        let err = parse(r#"{"code":"NoRoute","message":"Impossible route between points"}"#)
            .unwrap_err();
        assert!(matches!(err, RoutingError::NoRoute { ref message } if message == "Impossible route between points"));
    }

    #[test]
    fn test_parse_other_error_code() {
        let err = parse(r#"{"code":"InvalidUrl","message":"URL string malformed"}"#).unwrap_err();
        assert!(matches!(err, RoutingError::Service { ref code, .. } if code == "InvalidUrl"));
    }

    #[test]
    fn test_parse_bad_geometry() {
        let err = parse(r#"{"code":"Ok","routes":[{"geometry":"_p~iF","distance":1.0,"legs":[]}]}"#)
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidResponse(_)));
    }

    #[test]
    fn test_leg_segments_mark_snapped_waypoints() {
        let segments = leg_segments(3, &[true, false, false, true]);
        assert_eq!(segments[0].notices, vec![WAYPOINT_SNAPPED.to_string()]);
        assert!(segments[1].notices.is_empty());
        assert_eq!(segments[2].notices, vec![WAYPOINT_SNAPPED.to_string()]);
    }

    #[test]
    fn test_leg_segments_without_waypoints() {
        let segments = leg_segments(2, &[]);
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.notices.is_empty()));
    }

    #[tokio::test]
    async fn test_single_waypoint_rejected_without_request() {
        let client = OsrmClient::new(OsrmConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..OsrmConfig::default()
        })
        .unwrap();
        let err = client
            .calculate_route(&[coord(52.5, 13.4)], &RouteOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RoutingError::Service { ref code, .. } if code == "InvalidQuery"));
    }
}
