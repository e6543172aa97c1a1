//! Berlin locations for realistic test fixtures.
//!
//! The route follows Unter den Linden from the Brandenburg Gate to the
//! Schlossbrücke and continues to Alexanderplatz, sampled every ~180 m.
//! Restaurant coordinates are rounded to four decimals.

use corridor_search::geo::Coordinate;
use corridor_search::place::Candidate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng).expect("fixture coordinates are valid")
    }

    pub fn candidate(&self) -> Candidate {
        Candidate {
            id: self.name.to_lowercase().replace(' ', "-"),
            title: self.name.to_string(),
            coordinate: self.coordinate(),
        }
    }
}

pub const BRANDENBURG_GATE: Location = Location::new("Brandenburger Tor", 52.5163, 13.3777);
pub const SCHLOSSBRUECKE: Location = Location::new("Schlossbrücke", 52.5175, 13.399);
pub const ALEXANDERPLATZ: Location = Location::new("Alexanderplatz", 52.5219, 13.4132);

/// Route shape, ~2.5 km long.
pub const UNTER_DEN_LINDEN_ROUTE: &[(f64, f64)] = &[
    (52.5163, 13.3777),
    (52.51645, 13.38036),
    (52.5166, 13.38302),
    (52.51675, 13.38569),
    (52.5169, 13.38835),
    (52.51705, 13.39101),
    (52.5172, 13.39367),
    (52.51735, 13.39634),
    (52.5175, 13.399),
    (52.51823, 13.40137),
    (52.51897, 13.40373),
    (52.5197, 13.4061),
    (52.52043, 13.40847),
    (52.52117, 13.41083),
    (52.5219, 13.4132),
];

/// Within 200 m of a route vertex.
pub const RESTAURANTS_ON_ROUTE: &[Location] = &[
    Location::new("Cafe Einstein Unter den Linden", 52.5170, 13.3860),
    Location::new("Lebensmittel in Mitte", 52.5183, 13.4010),
    Location::new("Dean and David Alexa", 52.5205, 13.4120),
];

/// More than 200 m from every route vertex.
pub const RESTAURANTS_OFF_ROUTE: &[Location] = &[
    Location::new("Borchardt", 52.5146, 13.3909),
    Location::new("Brauhaus Lemke", 52.5225, 13.4085),
    Location::new("Zur letzten Instanz", 52.5170, 13.4135),
    Location::new("Curry 36", 52.4936, 13.3880),
];

pub fn route_shape() -> Vec<Coordinate> {
    UNTER_DEN_LINDEN_ROUTE
        .iter()
        .map(|(lat, lng)| Coordinate::new(*lat, *lng).expect("fixture coordinates are valid"))
        .collect()
}

/// Search results interleaving on- and off-route places.
pub fn mixed_candidates() -> Vec<Candidate> {
    vec![
        RESTAURANTS_OFF_ROUTE[0].candidate(),
        RESTAURANTS_ON_ROUTE[0].candidate(),
        RESTAURANTS_OFF_ROUTE[1].candidate(),
        RESTAURANTS_ON_ROUTE[1].candidate(),
        RESTAURANTS_OFF_ROUTE[2].candidate(),
        RESTAURANTS_ON_ROUTE[2].candidate(),
        RESTAURANTS_OFF_ROUTE[3].candidate(),
    ]
}
