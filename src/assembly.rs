//! Converts round solutions into trip routes over original indices.

use serde::{Deserialize, Serialize};

use crate::dispatch::IndexMap;
use crate::models::{Solution, Vehicle};
use crate::problem::RoutingModel;

/// One vehicle's route in one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRoute {
    /// Round number, starting at 1.
    pub trip_id: u32,
    /// Identifier of the vehicle driving the route.
    pub vehicle_id: i64,
    /// Original location indices, depot at both ends. `[0, 0]` for an idle vehicle.
    pub route: Vec<usize>,
    /// Route distance.
    pub distance: i64,
}

impl TripRoute {
    /// Returns `true` if the vehicle never leaves the depot.
    pub fn is_idle(&self) -> bool {
        self.route.len() <= 2
    }
}

/// Everything one round contributes to the final result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    /// Round number.
    pub trip_id: u32,
    /// One route per vehicle, in fleet order, idle vehicles included.
    pub routes: Vec<TripRoute>,
    /// Sum of route distances.
    pub distance: i64,
    /// Original indices of the nodes the round left unvisited, ascending.
    pub dropped: Vec<usize>,
}

/// Maps `solution` back to original indices and tags it with `trip_id`.
///
/// `vehicles` must be the fleet the round was solved with.
///
/// # Examples
///
/// ```
/// use dispatch_routing::assembly::assemble_round;
/// use dispatch_routing::dispatch::IndexMap;
/// use dispatch_routing::models::{Route, Solution, Vehicle};
///
/// // second round over original nodes 0, 4, 9
/// let map = IndexMap::identity(10).restrict(&[4, 9]);
/// let solution = Solution::new(
///     vec![Route::with_nodes(0, vec![2], 5, 30), Route::new(1)],
///     vec![1],
/// );
/// let vehicles = [Vehicle::new(11, 10), Vehicle::new(12, 10)];
///
/// let round = assemble_round(2, &solution, &vehicles, &map);
/// assert_eq!(round.routes[0].route, vec![0, 9, 0]);
/// assert_eq!(round.routes[0].vehicle_id, 11);
/// assert_eq!(round.routes[1].route, vec![0, 0]);
/// assert_eq!(round.dropped, vec![4]);
/// assert_eq!(round.distance, 30);
/// ```
pub fn assemble_round(
    trip_id: u32,
    solution: &Solution,
    vehicles: &[Vehicle],
    map: &IndexMap,
) -> RoundResult {
    let routes = solution
        .routes()
        .iter()
        .map(|route| TripRoute {
            trip_id,
            vehicle_id: vehicles[route.vehicle()].id,
            route: map.map_route(&route.path(RoutingModel::DEPOT)),
            distance: route.distance(),
        })
        .collect();

    let mut dropped = map.map_route(solution.dropped());
    dropped.sort_unstable();

    RoundResult {
        trip_id,
        routes,
        distance: solution.objective(),
        dropped,
    }
}
