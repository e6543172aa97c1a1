//! Test fixtures for corridor-search.
//!
//! Provides a real Berlin driving route and restaurants around it, plus
//! in-process doubles for the routing service, place search and map.

#![allow(dead_code)]

pub mod berlin_locations;
pub mod doubles;

pub use berlin_locations::*;
