//! Nominatim HTTP adapter for place search.
//!
//! Nominatim searches rectangles, so the circular region is sent as its
//! bounding box with `bounded=1`. The corridor filter drops whatever the box
//! adds outside the circle.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::SearchError;
use crate::geo::Coordinate;
use crate::place::Candidate;
use crate::region::SearchRegion;
use crate::traits::{PlaceSearch, SearchOptions};

/// Upper bound Nominatim accepts for `limit`.
pub const MAX_LIMIT: usize = 40;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Larger regions are refused before any request is made.
    pub max_region_radius_m: f64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("corridor-search/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
            max_region_radius_m: 100_000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

/// Query parameters for a bounded Nominatim search.
fn search_params(query: &str, region: &SearchRegion, options: &SearchOptions) -> Vec<(&'static str, String)> {
    let bbox = region.bounding_box();
    vec![
        ("q", query.to_string()),
        ("format", "jsonv2".to_string()),
        (
            "viewbox",
            format!(
                "{:.6},{:.6},{:.6},{:.6}",
                bbox.min_lng, bbox.max_lat, bbox.max_lng, bbox.min_lat
            ),
        ),
        ("bounded", "1".to_string()),
        ("limit", options.max_results.clamp(1, MAX_LIMIT).to_string()),
        ("accept-language", options.language.clone()),
    ]
}

#[async_trait]
impl PlaceSearch for NominatimClient {
    async fn search(
        &self,
        query: &str,
        region: &SearchRegion,
        options: &SearchOptions,
    ) -> Result<Vec<Candidate>, SearchError> {
        if region.radius_m > self.config.max_region_radius_m {
            return Err(SearchError::RegionTooLarge {
                radius_m: region.radius_m,
                max_radius_m: self.config.max_region_radius_m,
            });
        }

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let params = search_params(query, region, options);
        debug!(%url, ?params, "requesting Nominatim search");

        let response = self.client.get(url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) => body,
                Err(err) => format!("failed to read error body: {}", err),
            };
            return Err(SearchError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let places = response
            .json::<Vec<NominatimPlace>>()
            .await
            .map_err(|err| SearchError::InvalidResponse(err.to_string()))?;

        Ok(places.into_iter().filter_map(to_candidate).collect())
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    place_id: Option<u64>,
    osm_type: Option<String>,
    osm_id: Option<u64>,
    lat: String,
    lon: String,
    name: Option<String>,
    display_name: Option<String>,
}

fn to_candidate(place: NominatimPlace) -> Option<Candidate> {
    let coordinate = match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
        (Ok(lat), Ok(lng)) => Coordinate::new(lat, lng).ok(),
        _ => None,
    };
    let Some(coordinate) = coordinate else {
        debug!(lat = %place.lat, lon = %place.lon, "skipping place with unusable coordinates");
        return None;
    };

    let id = match (&place.osm_type, place.osm_id) {
        (Some(osm_type), Some(osm_id)) => format!("{}/{}", osm_type, osm_id),
        _ => place.place_id.map(|id| id.to_string()).unwrap_or_default(),
    };

    let title = place
        .name
        .filter(|name| !name.is_empty())
        .or_else(|| {
            place
                .display_name
                .as_deref()
                .and_then(|full| full.split(',').next())
                .map(|first| first.trim().to_string())
        })
        .unwrap_or_default();

    Some(Candidate {
        id,
        title,
        coordinate,
    })
}
