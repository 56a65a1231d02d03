//! Domain model types for dispatch routing.
//!
//! Locations with demands, vehicles with capacities, per-vehicle routes and
//! the per-round solution produced by the search engine.

mod location;
mod route;
mod solution;
mod vehicle;

pub use location::{Coordinates, Location};
pub use route::Route;
pub use solution::Solution;
pub use vehicle::Vehicle;
