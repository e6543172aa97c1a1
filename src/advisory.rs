//! Route advisories: provider notices flattened in route order.

use serde::{Deserialize, Serialize};

use crate::route::RouteResult;

/// A provider notice about one route segment, typically a routing option
/// the provider could only partially honor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub code: String,
    pub segment_index: usize,
}

/// Flattens per-segment notices, in segment order then notice order.
pub fn extract_advisories(route: &RouteResult) -> Vec<Advisory> {
    route
        .segments
        .iter()
        .enumerate()
        .flat_map(|(segment_index, segment)| {
            segment.notices.iter().map(move |code| Advisory {
                code: code.clone(),
                segment_index,
            })
        })
        .collect()
}
