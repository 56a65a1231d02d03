//! Location and coordinate types.

use serde::{Deserialize, Serialize};

/// A geographic point, longitude first as road-network APIs expect it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Coordinates {
    /// Creates coordinates from longitude and latitude.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Returns `true` if both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

/// A demand point (or the depot) in a dispatch request.
///
/// Location 0 of every request is the depot and must carry demand 0.
///
/// # Examples
///
/// ```
/// use dispatch_routing::models::Location;
///
/// let depot = Location::depot(52.517037, 13.388860);
/// assert_eq!(depot.demand, 0);
///
/// let c = Location::new(52.529407, 13.397634, 50);
/// assert_eq!(c.coordinates().lon, 13.397634);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Units to deliver. Non-negative.
    #[serde(default)]
    pub demand: i64,
}

impl Location {
    /// Creates a location with the given demand.
    pub fn new(lat: f64, lon: f64, demand: i64) -> Self {
        Self { lat, lon, demand }
    }

    /// Creates a depot (demand 0).
    pub fn depot(lat: f64, lon: f64) -> Self {
        Self::new(lat, lon, 0)
    }

    /// Coordinates of this location.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lon, self.lat)
    }
}
