//! Construction heuristics for the initial solution of a round.
//!
//! - [`cheapest_insertion`] — repeated cheapest feasible insertion, O(n²(n + m))

mod cheapest_insertion;

pub use cheapest_insertion::cheapest_insertion;

use crate::config::ConstructionStrategy;
use crate::error::Result;
use crate::local_search::SearchState;
use crate::problem::RoutingModel;

/// Builds an initial state with the configured strategy.
///
/// `expired` is polled once per construction step.
pub fn construct(
    model: &RoutingModel,
    strategy: ConstructionStrategy,
    expired: &mut dyn FnMut() -> bool,
) -> Result<SearchState> {
    match strategy {
        ConstructionStrategy::CheapestInsertion => cheapest_insertion(model, expired),
    }
}
