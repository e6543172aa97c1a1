//! Find restaurants along a driving route.
//!
//! Routes through the given waypoints with OSRM, searches Nominatim around
//! the route and prints the places inside the corridor.

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corridor_search::config::FinderConfig;
use corridor_search::geo::Coordinate;
use corridor_search::nominatim::{NominatimClient, NominatimConfig};
use corridor_search::osrm::{OsrmClient, OsrmConfig};
use corridor_search::polyline::{self, Polyline, PRECISION_5};
use corridor_search::proximity::nearest_vertex_distance_m;
use corridor_search::traits::{MapSurface, MarkerHandle, MarkerIcon, PolylineHandle, PolylineStyle};
use corridor_search::{FinderError, RestaurantFinder};

/// Find restaurants along a route
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Waypoint as LAT,LNG; give at least two, in travel order
    #[arg(long = "waypoint", required = true, allow_hyphen_values = true)]
    waypoints: Vec<Coordinate>,

    /// OSRM server URL
    #[arg(long, default_value = "http://localhost:5000")]
    osrm_url: String,

    /// Nominatim server URL
    #[arg(long, default_value = "https://nominatim.openstreetmap.org")]
    nominatim_url: String,

    /// Category term to search for
    #[arg(long)]
    query: Option<String>,

    /// Corridor half-width in meters
    #[arg(long)]
    half_width: Option<f64>,

    /// Maximum number of search results
    #[arg(long)]
    max_results: Option<usize>,

    /// Language for result titles
    #[arg(long)]
    language: Option<String>,
}

/// Prints what a map would draw.
#[derive(Default)]
struct ConsoleSurface {
    next_id: u64,
}

impl ConsoleSurface {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MapSurface for ConsoleSurface {
    fn add_marker(&mut self, _coordinate: Coordinate, _icon: MarkerIcon, _label: &str) -> MarkerHandle {
        MarkerHandle(self.next())
    }

    fn add_polyline(&mut self, polyline: &Polyline, _style: &PolylineStyle) -> PolylineHandle {
        println!(
            "Route: {} vertices, {:.1} km",
            polyline.len(),
            polyline.length_m() / 1000.0
        );
        println!("  {}", polyline::encode(polyline.points(), PRECISION_5));
        PolylineHandle(self.next())
    }

    fn remove_marker(&mut self, _handle: MarkerHandle) {}

    fn remove_polyline(&mut self, _handle: PolylineHandle) {}

    fn clear_all(&mut self) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corridor_search=info,find_restaurants=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    if args.waypoints.len() < 2 {
        bail!("at least 2 waypoints are required, got {}", args.waypoints.len());
    }

    let mut config = FinderConfig::from_env();
    if let Some(query) = args.query {
        config.query = query;
    }
    if let Some(half_width) = args.half_width {
        config.half_width_m = half_width;
    }
    if let Some(max_results) = args.max_results {
        config.max_results = max_results;
    }
    if let Some(language) = args.language {
        config.language = language;
    }

    let routing = OsrmClient::new(OsrmConfig {
        base_url: args.osrm_url,
        ..OsrmConfig::default()
    })
    .context("build OSRM client")?;
    let search = NominatimClient::new(NominatimConfig {
        base_url: args.nominatim_url,
        ..NominatimConfig::default()
    })
    .context("build Nominatim client")?;

    let finder = RestaurantFinder::new(routing, search, ConsoleSurface::default(), config)
        .context("invalid search configuration")?;
    for waypoint in args.waypoints {
        finder.add_waypoint(waypoint);
    }

    match finder.find_restaurants().await {
        Ok(report) => {
            for advisory in &report.advisories {
                println!(
                    "Warning on segment {}: {}",
                    advisory.segment_index, advisory.code
                );
            }
            let route = report.route.polyline().context("route shape")?;
            for place in &report.restaurants {
                println!(
                    "  {:<40} {}  {:>4.0} m from route",
                    place.title,
                    place.coordinate,
                    nearest_vertex_distance_m(place.coordinate, &route)
                );
            }
            println!(
                "{} of {} places are within {} m of the route",
                report.restaurants.len(),
                report.returned,
                finder.config().half_width_m
            );
            Ok(())
        }
        Err(FinderError::Search(err)) => {
            // The route is still useful without places.
            eprintln!("Search failed: {}", err);
            Ok(())
        }
        Err(err) => Err(err).context("search along route failed"),
    }
}
