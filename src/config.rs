//! Corridor search configuration.

use std::env;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::traits::{RouteOptions, SearchOptions, TravelMode};

/// Results requested from the search provider per search.
pub const DEFAULT_MAX_RESULTS: usize = 30;

/// Corridor half-width in meters around route vertices.
pub const DEFAULT_HALF_WIDTH_M: f64 = 200.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Category term sent to the place search.
    pub query: String,
    pub max_results: usize,
    pub language: String,
    pub half_width_m: f64,
    pub travel_mode: TravelMode,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            query: "restaurants".to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            language: "en-US".to_string(),
            half_width_m: DEFAULT_HALF_WIDTH_M,
            travel_mode: TravelMode::Car,
        }
    }
}

impl FinderConfig {
    /// Reads `CORRIDOR_*` variables, keeping defaults for anything missing
    /// or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            query: env::var("CORRIDOR_QUERY").unwrap_or(defaults.query),
            max_results: env::var("CORRIDOR_MAX_RESULTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_results),
            language: env::var("CORRIDOR_LANGUAGE").unwrap_or(defaults.language),
            half_width_m: env::var("CORRIDOR_HALF_WIDTH_M")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.half_width_m),
            travel_mode: defaults.travel_mode,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.half_width_m > 0.0 && self.half_width_m.is_finite()) {
            return Err(ConfigError::InvalidHalfWidth(self.half_width_m));
        }
        if self.max_results == 0 {
            return Err(ConfigError::ZeroMaxResults);
        }
        if self.query.trim().is_empty() {
            return Err(ConfigError::EmptyQuery);
        }
        Ok(())
    }

    pub fn route_options(&self) -> RouteOptions {
        RouteOptions {
            travel_mode: self.travel_mode,
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            language: self.language.clone(),
            max_results: self.max_results,
        }
    }
}
