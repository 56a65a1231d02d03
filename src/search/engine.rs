//! Search engine: construction, local search, and guided escape under a time
//! budget.
//!
//! # Phases
//!
//! `Unsolved → Constructing → Improving → Converged | TimedOut`
//!
//! - *Constructing* builds the initial state with the configured heuristic.
//! - *Improving* repeatedly applies the best improving move over all
//!   neighborhoods until a local optimum, then (for guided local search)
//!   penalizes arcs and descends again on the augmented cost.
//! - *Converged* when descent alone is configured, when no arc can be
//!   penalized, or after `max_stagnation` local optima without a new best.
//! - *TimedOut* when the budget expires; the best state found is returned.
//!
//! The budget is polled once per construction step and before every
//! neighborhood scan, so one check interval is bounded by a single scan.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Clock, GuidedLocalSearch};
use crate::config::{ImprovementStrategy, SolverConfig};
use crate::constructive::construct;
use crate::error::Result;
use crate::evaluation::ArcCost;
use crate::local_search::{Candidate, Neighborhood, SearchState};
use crate::models::Solution;
use crate::problem::RoutingModel;

/// Lifecycle of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Unsolved,
    Constructing,
    Improving,
    Converged,
    TimedOut,
}

/// How the improvement phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// No further improvement expected.
    Converged,
    /// The time budget expired first.
    TimedOut,
}

/// Result of [`SearchEngine::solve`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best solution found, by route cost plus skip penalties.
    pub solution: Solution,
    /// How the search ended.
    pub status: SearchStatus,
    /// Moves applied.
    pub iterations: u64,
    /// Local optima reached.
    pub local_optima: u64,
}

struct Budget<'a, K: Clock + ?Sized> {
    clock: &'a K,
    start: Duration,
    limit: Duration,
}

impl<K: Clock + ?Sized> Budget<'_, K> {
    fn expired(&self) -> bool {
        self.clock.now().saturating_sub(self.start) >= self.limit
    }
}

/// Searches one [`RoutingModel`].
///
/// # Examples
///
/// ```
/// use dispatch_routing::config::SolverConfig;
/// use dispatch_routing::distance::CostMatrix;
/// use dispatch_routing::problem::ModelBuilder;
/// use dispatch_routing::search::{SearchEngine, SystemClock};
///
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0, 4, 6],
///     vec![4, 0, 3],
///     vec![6, 3, 0],
/// ]).unwrap();
/// let model = ModelBuilder::new(vec![0, 50, 50], vec![60])
///     .with_matrix(matrix)
///     .build()
///     .unwrap();
/// let config = SolverConfig::default().with_max_stagnation(50);
/// let clock = SystemClock::new();
///
/// let outcome = SearchEngine::new(&model, &config, &clock).solve().unwrap();
/// assert_eq!(outcome.solution.num_served(), 1);
/// assert_eq!(outcome.solution.dropped(), &[2]);
/// ```
pub struct SearchEngine<'a, K: Clock + ?Sized> {
    model: &'a RoutingModel,
    config: &'a SolverConfig,
    clock: &'a K,
    phase: SearchPhase,
}

impl<'a, K: Clock + ?Sized> SearchEngine<'a, K> {
    /// Creates an engine in the `Unsolved` phase.
    pub fn new(model: &'a RoutingModel, config: &'a SolverConfig, clock: &'a K) -> Self {
        Self {
            model,
            config,
            clock,
            phase: SearchPhase::Unsolved,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Runs construction and improvement.
    ///
    /// # Errors
    ///
    /// Propagates [`Infeasible`](crate::error::RoutingError::Infeasible)
    /// from construction. Expiry of the budget is not an error.
    pub fn solve(&mut self) -> Result<SearchOutcome> {
        let model = self.model;
        let budget = Budget {
            clock: self.clock,
            start: self.clock.now(),
            limit: self.config.time_limit_per_round,
        };

        self.transition(SearchPhase::Constructing);
        let mut state = construct(model, self.config.construction_strategy, &mut || {
            budget.expired()
        })?;

        self.transition(SearchPhase::Improving);
        let mut best = state.clone();
        let mut best_objective = state.penalized_objective(model);
        let mut gls = GuidedLocalSearch::new(model.num_nodes(), self.config.gls_lambda_coefficient);
        let mut iterations = 0u64;
        let mut local_optima = 0u64;
        let mut stagnation = 0u32;

        let status = loop {
            let optimum = if gls.lambda() == 0 {
                self.descend(&mut state, model.matrix(), &budget, &mut iterations)
            } else {
                self.descend(&mut state, &gls.augmented(model.matrix()), &budget, &mut iterations)
            };
            if !optimum {
                break SearchStatus::TimedOut;
            }
            local_optima += 1;

            let objective = state.penalized_objective(model);
            if objective < best_objective {
                debug!(
                    objective,
                    previous = best_objective,
                    dropped = state.dropped().len(),
                    "new best solution"
                );
                best = state.clone();
                best_objective = objective;
                stagnation = 0;
                gls.reset();
            } else {
                stagnation += 1;
            }

            if self.config.improvement_strategy == ImprovementStrategy::LocalDescent
                || stagnation >= self.config.max_stagnation
                || !gls.penalize(&state, model)
            {
                break SearchStatus::Converged;
            }
        };

        self.transition(match status {
            SearchStatus::Converged => SearchPhase::Converged,
            SearchStatus::TimedOut => SearchPhase::TimedOut,
        });

        Ok(SearchOutcome {
            solution: best.to_solution(model),
            status,
            iterations,
            local_optima,
        })
    }

    /// Best-improvement descent under `cost`. Returns `false` if the budget
    /// expired before a local optimum was reached.
    fn descend<C: ArcCost + ?Sized>(
        &self,
        state: &mut SearchState,
        cost: &C,
        budget: &Budget<'_, K>,
        iterations: &mut u64,
    ) -> bool {
        loop {
            let mut best: Option<Candidate> = None;
            for neighborhood in Neighborhood::ALL {
                if budget.expired() {
                    return false;
                }
                if let Some(c) = neighborhood.scan(state, self.model, cost, self.config.parallel) {
                    if best.is_none_or(|b| c < b) {
                        best = Some(c);
                    }
                }
            }
            match best {
                Some(c) => {
                    state.apply(c.mv, self.model);
                    *iterations += 1;
                }
                None => return true,
            }
        }
    }

    fn transition(&mut self, to: SearchPhase) {
        debug!(from = ?self.phase, to = ?to, "search phase");
        self.phase = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostMatrix;
    use crate::evaluation::RouteEvaluator;
    use crate::problem::ModelBuilder;
    use crate::search::VirtualClock;

    fn grid_model(capacities: Vec<i64>) -> RoutingModel {
        // 3×3 grid of customers around a corner depot, Manhattan distances
        let points: Vec<(i64, i64)> = std::iter::once((0, 0))
            .chain((1..=3).flat_map(|x| (1..=3).map(move |y| (x * 10, y * 10))))
            .collect();
        let rows = points
            .iter()
            .map(|a| {
                points
                    .iter()
                    .map(|b| (a.0 - b.0).abs() + (a.1 - b.1).abs())
                    .collect()
            })
            .collect();
        let mut demands = vec![10; points.len()];
        demands[0] = 0;
        ModelBuilder::new(demands, capacities)
            .with_matrix(CostMatrix::from_rows(rows).expect("valid"))
            .build()
            .expect("valid")
    }

    #[test]
    fn test_local_descent_converges() {
        let model = grid_model(vec![50, 50]);
        let config = SolverConfig::default().with_improvement(ImprovementStrategy::LocalDescent);
        let clock = VirtualClock::new(Duration::from_nanos(1));
        let mut engine = SearchEngine::new(&model, &config, &clock);
        let outcome = engine.solve().expect("feasible");

        assert_eq!(outcome.status, SearchStatus::Converged);
        assert_eq!(engine.phase(), SearchPhase::Converged);
        assert_eq!(outcome.local_optima, 1);
        assert!(outcome.solution.dropped().is_empty());
        assert!(RouteEvaluator::new(&model).check(&outcome.solution).is_empty());
    }

    #[test]
    fn test_gls_never_worse_than_descent() {
        let model = grid_model(vec![50, 50]);
        let descent = SolverConfig::default().with_improvement(ImprovementStrategy::LocalDescent);
        let guided = SolverConfig::default().with_max_stagnation(200);
        let clock = VirtualClock::new(Duration::from_nanos(1));

        let a = SearchEngine::new(&model, &descent, &clock).solve().expect("feasible");
        let b = SearchEngine::new(&model, &guided, &clock).solve().expect("feasible");
        assert!(b.solution.objective() <= a.solution.objective());
        assert!(b.local_optima > 1);
        assert!(RouteEvaluator::new(&model).check(&b.solution).is_empty());
    }

    #[test]
    fn test_timeout_returns_best() {
        let model = grid_model(vec![50, 50]);
        let config = SolverConfig::default().with_time_limit(Duration::from_secs(1));
        // 100 ms per read: a handful of construction steps, then expiry
        let clock = VirtualClock::new(Duration::from_millis(100));
        let mut engine = SearchEngine::new(&model, &config, &clock);
        let outcome = engine.solve().expect("feasible");

        assert_eq!(outcome.status, SearchStatus::TimedOut);
        assert_eq!(engine.phase(), SearchPhase::TimedOut);
        assert!(RouteEvaluator::new(&model).check(&outcome.solution).is_empty());
    }

    #[test]
    fn test_capacity_forces_drop() {
        // 9 customers × 10 but only 60 of capacity
        let model = grid_model(vec![30, 30]);
        let config = SolverConfig::default().with_max_stagnation(50);
        let clock = VirtualClock::new(Duration::from_nanos(1));
        let outcome = SearchEngine::new(&model, &config, &clock).solve().expect("feasible");

        assert_eq!(outcome.solution.num_served(), 6);
        assert_eq!(outcome.solution.dropped().len(), 3);
        for route in outcome.solution.routes() {
            assert!(route.load() <= 30);
        }
    }

    #[test]
    fn test_zero_budget_drops_optional_nodes() {
        let model = grid_model(vec![50, 50]);
        let config = SolverConfig::default().with_time_limit(Duration::ZERO);
        let clock = VirtualClock::new(Duration::from_millis(1));
        let outcome = SearchEngine::new(&model, &config, &clock).solve().expect("feasible");
        assert_eq!(outcome.status, SearchStatus::TimedOut);
        assert_eq!(outcome.solution.num_served(), 0);
        assert_eq!(outcome.iterations, 0);
    }
}
