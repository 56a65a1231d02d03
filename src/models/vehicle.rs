//! Vehicle type.

use serde::{Deserialize, Serialize};

/// A vehicle of the fleet.
///
/// The solver only looks at the capacity and the ordinal position; `id` is
/// echoed back on every route the vehicle drives.
///
/// # Examples
///
/// ```
/// use dispatch_routing::models::Vehicle;
///
/// let v = Vehicle::new(7, 60);
/// assert_eq!(v.id, 7);
/// assert_eq!(v.capacity, 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vehicle {
    /// Caller-assigned identifier.
    pub id: i64,
    /// Maximum load per trip. A capacity of 0 only allows empty trips.
    pub capacity: i64,
}

impl Vehicle {
    /// Creates a vehicle.
    pub fn new(id: i64, capacity: i64) -> Self {
        Self { id, capacity }
    }
}
