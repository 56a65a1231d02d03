//! Per-vehicle route.

/// An ordered sequence of node visits driven by a single vehicle.
///
/// The depot is implicit at both ends and not stored in `nodes`. A route with
/// no nodes is an unused vehicle (depot → depot) and has distance 0.
///
/// # Examples
///
/// ```
/// use dispatch_routing::models::Route;
///
/// let route = Route::with_nodes(0, vec![2, 1], 40, 17);
/// assert_eq!(route.path(0), vec![0, 2, 1, 0]);
/// assert_eq!(route.load(), 40);
///
/// let unused = Route::new(1);
/// assert!(unused.is_empty());
/// assert_eq!(unused.path(0), vec![0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    vehicle: usize,
    nodes: Vec<usize>,
    load: i64,
    distance: i64,
}

impl Route {
    /// Creates an empty route for the vehicle at ordinal `vehicle`.
    pub fn new(vehicle: usize) -> Self {
        Self {
            vehicle,
            nodes: Vec::new(),
            load: 0,
            distance: 0,
        }
    }

    /// Creates a route with precomputed load and distance.
    pub fn with_nodes(vehicle: usize, nodes: Vec<usize>, load: i64, distance: i64) -> Self {
        Self {
            vehicle,
            nodes,
            load,
            distance,
        }
    }

    /// Ordinal position of the vehicle in the fleet.
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// Visited nodes in order, depot excluded.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Number of visited nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the vehicle stays at the depot.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total demand carried.
    pub fn load(&self) -> i64 {
        self.load
    }

    /// Sum of arc costs from depot back to depot.
    pub fn distance(&self) -> i64 {
        self.distance
    }

    /// Full node sequence with the depot at both ends.
    pub fn path(&self, depot: usize) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.nodes.len() + 2);
        path.push(depot);
        path.extend_from_slice(&self.nodes);
        path.push(depot);
        path
    }
}
