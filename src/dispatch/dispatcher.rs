//! Multi-trip dispatch: re-solve the dropped nodes until everything is
//! served or the round limit is reached.
//!
//! # Algorithm
//!
//! 1. Round 1 covers every location through the identity [`IndexMap`].
//! 2. Each round builds a model over its nodes (sub-matrix of the full cost
//!    matrix), runs the [`SearchEngine`], and assembles its routes in
//!    original indices, tagged with the round number as `trip_id`.
//! 3. No dropped nodes: stop. Otherwise the next round covers the depot plus
//!    the dropped nodes, until `max_rounds` rounds have run.
//!
//! Rounds run strictly in sequence; each owns its model and solution.

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use super::IndexMap;
use crate::assembly::{assemble_round, RoundResult, TripRoute};
use crate::config::SolverConfig;
use crate::distance::CostMatrix;
use crate::error::{Result, RoutingError};
use crate::models::Vehicle;
use crate::problem::{check_costs, validate_input, ModelBuilder};
use crate::search::{Clock, SearchEngine, SearchStatus};

/// Why dispatch stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The last round dropped nothing.
    AllServed,
    /// `max_rounds` rounds ran and some nodes are still unserved.
    RoundLimit,
}

/// Diagnostics of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Round number.
    pub trip_id: u32,
    /// Customers offered to the round.
    pub customers: usize,
    /// Customers routed.
    pub served: usize,
    /// Customers left for the next round.
    pub dropped: usize,
    /// Sum of the round's route distances.
    pub distance: i64,
    /// How the round's search ended.
    pub status: SearchStatus,
    /// Moves applied by the round's search.
    pub iterations: u64,
}

/// Result of [`MultiTripDispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Routes of every round, in round order then fleet order.
    pub routes: Vec<TripRoute>,
    /// Sum of all route distances.
    pub total_distance: i64,
    /// Original indices never served, ascending.
    pub unserved: Vec<usize>,
    /// Unserved nodes whose demand exceeds every vehicle's capacity.
    pub undeliverable: Vec<usize>,
    /// Per-round diagnostics.
    pub rounds: Vec<RoundSummary>,
    /// Why dispatch stopped.
    pub stop: StopReason,
}

/// Runs rounds of the search over shrinking node sets.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dispatch_routing::config::SolverConfig;
/// use dispatch_routing::dispatch::{MultiTripDispatcher, StopReason};
/// use dispatch_routing::distance::CostMatrix;
/// use dispatch_routing::models::Vehicle;
/// use dispatch_routing::search::SystemClock;
///
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0, 4, 6],
///     vec![4, 0, 3],
///     vec![6, 3, 0],
/// ]).unwrap();
/// let config = SolverConfig::default()
///     .with_time_limit(Duration::from_millis(200))
///     .with_max_stagnation(20);
/// let clock = SystemClock::new();
///
/// let outcome = MultiTripDispatcher::new(&config, &clock)
///     .dispatch(&matrix, &[0, 50, 50], &[Vehicle::new(1, 60)])
///     .unwrap();
/// assert_eq!(outcome.stop, StopReason::AllServed);
/// assert_eq!(outcome.routes.len(), 2);
/// assert_eq!(outcome.routes[0].route, vec![0, 1, 0]);
/// assert_eq!(outcome.routes[1].route, vec![0, 2, 0]);
/// assert_eq!(outcome.total_distance, 8 + 12);
/// ```
pub struct MultiTripDispatcher<'a, K: Clock + ?Sized> {
    config: &'a SolverConfig,
    clock: &'a K,
}

impl<'a, K: Clock + ?Sized> MultiTripDispatcher<'a, K> {
    /// Creates a dispatcher.
    pub fn new(config: &'a SolverConfig, clock: &'a K) -> Self {
        Self { config, clock }
    }

    /// Serves `demands` (index 0 = depot) with `vehicles` over `matrix`.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::InvalidInput`] for malformed inputs or configuration,
    ///   including negative or overflowing matrix entries
    /// - [`RoutingError::Infeasible`] when there are no vehicles
    ///
    /// An error in any round discards the rounds already solved.
    pub fn dispatch(
        &self,
        matrix: &CostMatrix,
        demands: &[i64],
        vehicles: &[Vehicle],
    ) -> Result<DispatchOutcome> {
        self.config.validate()?;
        let capacities: Vec<i64> = vehicles.iter().map(|v| v.capacity).collect();
        validate_input(demands, &capacities)?;
        if matrix.size() != demands.len() {
            return Err(RoutingError::invalid(format!(
                "cost matrix is {}x{} but there are {} locations",
                matrix.size(),
                matrix.size(),
                demands.len()
            )));
        }
        check_costs(matrix, vehicles.len())?;

        let mut map = IndexMap::identity(demands.len());
        let mut results: Vec<RoundResult> = Vec::new();
        let mut rounds = Vec::new();
        let mut trip_id = 1u32;

        let stop = loop {
            let _span = info_span!("round", trip_id).entered();
            let (result, summary, local_dropped) =
                self.solve_round(trip_id, matrix, demands, vehicles, &capacities, &map)?;
            info!(
                customers = summary.customers,
                served = summary.served,
                dropped = summary.dropped,
                distance = summary.distance,
                status = ?summary.status,
                "round finished"
            );

            results.push(result);
            rounds.push(summary);

            if local_dropped.is_empty() {
                break StopReason::AllServed;
            }
            if trip_id >= self.config.max_rounds {
                break StopReason::RoundLimit;
            }
            map = map.restrict(&local_dropped);
            trip_id += 1;
        };

        let unserved = match stop {
            StopReason::AllServed => Vec::new(),
            StopReason::RoundLimit => results
                .last()
                .map(|r| r.dropped.clone())
                .unwrap_or_default(),
        };
        let max_capacity = capacities.iter().copied().max().unwrap_or(0);
        let undeliverable: Vec<usize> = unserved
            .iter()
            .copied()
            .filter(|&n| demands[n] > max_capacity)
            .collect();
        if !unserved.is_empty() {
            warn!(
                rounds = rounds.len(),
                unserved = ?unserved,
                undeliverable = ?undeliverable,
                "round limit reached with unserved locations"
            );
        }

        let routes: Vec<TripRoute> = results.into_iter().flat_map(|r| r.routes).collect();
        let total_distance = routes.iter().map(|r| r.distance).sum();
        Ok(DispatchOutcome {
            routes,
            total_distance,
            unserved,
            undeliverable,
            rounds,
            stop,
        })
    }

    fn solve_round(
        &self,
        trip_id: u32,
        matrix: &CostMatrix,
        demands: &[i64],
        vehicles: &[Vehicle],
        capacities: &[i64],
        map: &IndexMap,
    ) -> Result<(RoundResult, RoundSummary, Vec<usize>)> {
        let round_demands = map.originals().iter().map(|&o| demands[o]).collect();
        let model = ModelBuilder::new(round_demands, capacities.to_vec())
            .with_matrix(matrix.submatrix(map.originals()))
            .with_penalty(self.config.skip_penalty)
            .build()?;
        info!(customers = map.len() - 1, "round started");

        let outcome = SearchEngine::new(&model, self.config, self.clock).solve()?;
        let result = assemble_round(trip_id, &outcome.solution, vehicles, map);
        let summary = RoundSummary {
            trip_id,
            customers: map.len() - 1,
            served: outcome.solution.num_served(),
            dropped: outcome.solution.dropped().len(),
            distance: result.distance,
            status: outcome.status,
            iterations: outcome.iterations,
        };
        Ok((result, summary, outcome.solution.dropped().to_vec()))
    }
}
