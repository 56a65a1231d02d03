//! Solver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// How the initial solution of each round is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionStrategy {
    /// Repeatedly insert the unrouted node with the cheapest feasible
    /// insertion; ties go to the lowest node index.
    #[default]
    CheapestInsertion,
}

/// How the initial solution is improved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementStrategy {
    /// Local search with arc penalties to escape local optima.
    #[default]
    GuidedLocalSearch,
    /// Plain best-improvement descent, stops at the first local optimum.
    LocalDescent,
}

/// Skip penalty applied to every optional (non-depot) node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyPolicy {
    /// `max_arc_cost * (nodes + vehicles) + 1`, computed per round.
    #[default]
    Derived,
    /// A fixed value. Raised to the derived bound if it is not larger.
    Fixed(i64),
}

/// Options recognized by the solver.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dispatch_routing::config::{SolverConfig, ImprovementStrategy};
///
/// let config = SolverConfig::default()
///     .with_time_limit(Duration::from_millis(200))
///     .with_max_rounds(3)
///     .with_improvement(ImprovementStrategy::LocalDescent);
/// assert_eq!(config.max_rounds, 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Wall-clock budget of each round, construction included.
    ///
    /// The budget is polled at every construction step. If it runs out
    /// before construction finishes, the remaining optional nodes are left
    /// dropped even when a vehicle could still take them, and they move to
    /// the next round. Budgets too short to build a first solution therefore
    /// cost extra trips.
    #[serde(with = "duration_secs")]
    pub time_limit_per_round: Duration,
    /// Maximum number of dispatch rounds (trips).
    pub max_rounds: u32,
    /// Skip penalty for optional nodes.
    pub skip_penalty: PenaltyPolicy,
    /// Construction heuristic.
    pub construction_strategy: ConstructionStrategy,
    /// Improvement metaheuristic.
    pub improvement_strategy: ImprovementStrategy,
    /// Scales GLS arc penalties relative to the average arc cost.
    pub gls_lambda_coefficient: f64,
    /// Escape iterations without a new best before the search converges.
    pub max_stagnation: u32,
    /// Evaluate neighborhoods on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_per_round: Duration::from_secs(5),
            max_rounds: 5,
            skip_penalty: PenaltyPolicy::Derived,
            construction_strategy: ConstructionStrategy::CheapestInsertion,
            improvement_strategy: ImprovementStrategy::GuidedLocalSearch,
            gls_lambda_coefficient: 0.1,
            max_stagnation: 5_000,
            parallel: false,
        }
    }
}

impl SolverConfig {
    /// Sets the per-round time budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_per_round = limit;
        self
    }

    /// Sets the maximum number of rounds.
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Sets the skip penalty policy.
    pub fn with_skip_penalty(mut self, policy: PenaltyPolicy) -> Self {
        self.skip_penalty = policy;
        self
    }

    /// Sets the construction strategy.
    pub fn with_construction(mut self, strategy: ConstructionStrategy) -> Self {
        self.construction_strategy = strategy;
        self
    }

    /// Sets the improvement strategy.
    pub fn with_improvement(mut self, strategy: ImprovementStrategy) -> Self {
        self.improvement_strategy = strategy;
        self
    }

    /// Sets the GLS lambda coefficient.
    pub fn with_gls_lambda_coefficient(mut self, coefficient: f64) -> Self {
        self.gls_lambda_coefficient = coefficient;
        self
    }

    /// Sets the stagnation limit.
    pub fn with_max_stagnation(mut self, iterations: u32) -> Self {
        self.max_stagnation = iterations;
        self
    }

    /// Enables parallel neighborhood evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Rejects configurations the solver cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(RoutingError::invalid("max_rounds must be at least 1"));
        }
        if !self.gls_lambda_coefficient.is_finite() || self.gls_lambda_coefficient <= 0.0 {
            return Err(RoutingError::invalid(
                "gls_lambda_coefficient must be a positive finite number",
            ));
        }
        if let PenaltyPolicy::Fixed(p) = self.skip_penalty {
            if p <= 0 {
                return Err(RoutingError::invalid("skip_penalty must be positive"));
            }
        }
        Ok(())
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
