//! End-to-end dispatch request handling.
//!
//! Validates the request, fetches the cost matrix once, and runs the
//! [`MultiTripDispatcher`]. The JSON shapes match what the HTTP front end
//! accepts and returns.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assembly::TripRoute;
use crate::config::SolverConfig;
use crate::dispatch::{MultiTripDispatcher, RoundSummary};
use crate::distance::{fetch_matrix, MatrixProvider};
use crate::error::{Result, RoutingError};
use crate::models::{Coordinates, Location, Vehicle};
use crate::problem::validate_input;
use crate::search::{Clock, SystemClock};

/// A dispatch request. Location 0 is the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Depot followed by the customers.
    pub locations: Vec<Location>,
    /// Available fleet.
    pub vehicles: Vec<Vehicle>,
}

/// Routes of every trip plus what could not be served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    /// Routes ordered by trip, then by vehicle.
    pub routes: Vec<TripRoute>,
    /// Sum of every route's distance.
    pub total_distance: i64,
    /// Locations not served within the round limit.
    #[serde(default)]
    pub unserved: Vec<usize>,
    /// Unserved locations no vehicle can ever carry.
    #[serde(default)]
    pub undeliverable: Vec<usize>,
    /// Per-trip diagnostics.
    #[serde(default)]
    pub rounds: Vec<RoundSummary>,
}

/// Solves `request` with the wall clock.
///
/// # Errors
///
/// - [`RoutingError::InvalidInput`] before any matrix is fetched
/// - [`RoutingError::MatrixUnavailable`] if `provider` fails
/// - [`RoutingError::Infeasible`] when there are no vehicles
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dispatch_routing::api::{solve, SolveRequest};
/// use dispatch_routing::config::SolverConfig;
/// use dispatch_routing::distance::HaversineProvider;
/// use dispatch_routing::models::{Location, Vehicle};
///
/// let request = SolveRequest {
///     locations: vec![
///         Location::depot(52.5170, 13.3888),
///         Location::new(52.5294, 13.3976, 10),
///     ],
///     vehicles: vec![Vehicle::new(1, 20)],
/// };
/// let config = SolverConfig::default().with_time_limit(Duration::from_millis(100));
///
/// let response = solve(&request, &HaversineProvider::default(), &config).unwrap();
/// assert_eq!(response.routes.len(), 1);
/// assert_eq!(response.routes[0].route, vec![0, 1, 0]);
/// assert_eq!(response.total_distance, response.routes[0].distance);
/// ```
pub fn solve(
    request: &SolveRequest,
    provider: &dyn MatrixProvider,
    config: &SolverConfig,
) -> Result<SolveResponse> {
    solve_with_clock(request, provider, config, &SystemClock::new())
}

/// Solves `request`, measuring round budgets with `clock`.
pub fn solve_with_clock<K: Clock + ?Sized>(
    request: &SolveRequest,
    provider: &dyn MatrixProvider,
    config: &SolverConfig,
    clock: &K,
) -> Result<SolveResponse> {
    config.validate()?;
    let demands: Vec<i64> = request.locations.iter().map(|l| l.demand).collect();
    let capacities: Vec<i64> = request.vehicles.iter().map(|v| v.capacity).collect();
    validate_input(&demands, &capacities)?;

    let coordinates: Vec<Coordinates> =
        request.locations.iter().map(Location::coordinates).collect();
    if let Some(i) = coordinates.iter().position(|c| !c.is_valid()) {
        return Err(RoutingError::invalid(format!(
            "location {i} has invalid coordinates ({}, {})",
            request.locations[i].lat, request.locations[i].lon
        )));
    }

    let matrix = fetch_matrix(provider, &coordinates)?;
    let outcome = MultiTripDispatcher::new(config, clock).dispatch(
        &matrix,
        &demands,
        &request.vehicles,
    )?;

    info!(
        locations = demands.len(),
        vehicles = capacities.len(),
        trips = outcome.rounds.len(),
        total_distance = outcome.total_distance,
        unserved = outcome.unserved.len(),
        "dispatch solved"
    );
    Ok(SolveResponse {
        routes: outcome.routes,
        total_distance: outcome.total_distance,
        unserved: outcome.unserved,
        undeliverable: outcome.undeliverable,
        rounds: outcome.rounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{CostMatrix, StaticProvider};

    struct Unreachable;

    impl MatrixProvider for Unreachable {
        fn matrix(&self, _: &[Coordinates]) -> Result<CostMatrix> {
            Err(RoutingError::matrix("connection refused"))
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    fn request(demands: &[i64], capacities: &[i64]) -> SolveRequest {
        SolveRequest {
            locations: demands
                .iter()
                .enumerate()
                .map(|(i, &d)| Location::new(48.0 + i as f64 * 0.01, 11.0, d))
                .collect(),
            vehicles: capacities
                .iter()
                .enumerate()
                .map(|(i, &c)| Vehicle::new(i as i64 + 1, c))
                .collect(),
        }
    }

    #[test]
    fn test_validation_before_fetch() {
        // the provider would fail, but validation fails first
        let err = solve(&request(&[0], &[10]), &Unreachable, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidInput(_)));

        let err =
            solve(&request(&[0, 1], &[]), &Unreachable, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, RoutingError::Infeasible(_)));
    }

    #[test]
    fn test_provider_failure() {
        let err =
            solve(&request(&[0, 1], &[10]), &Unreachable, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, RoutingError::MatrixUnavailable(_)));
    }

    #[test]
    fn test_invalid_coordinates() {
        let mut req = request(&[0, 1], &[10]);
        req.locations[1].lat = f64::NAN;
        let err = solve(&req, &Unreachable, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidInput(_)));
    }

    #[test]
    fn test_wrong_sized_matrix() {
        let provider = StaticProvider::new(CostMatrix::new(3));
        let err = solve(&request(&[0, 1], &[10]), &provider, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, RoutingError::MatrixUnavailable(_)));
    }

    #[test]
    fn test_request_json() {
        let json = r#"{
            "locations": [
                {"lat": 52.517037, "lon": 13.388860},
                {"lat": 52.529407, "lon": 13.397634, "demand": 5}
            ],
            "vehicles": [{"id": 1, "capacity": 10}]
        }"#;
        let req: SolveRequest = serde_json::from_str(json).expect("valid request");
        assert_eq!(req.locations[0].demand, 0);
        assert_eq!(req.locations[1].demand, 5);
        assert_eq!(req.vehicles[0], Vehicle::new(1, 10));
    }
}
