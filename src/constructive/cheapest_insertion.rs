//! Cheapest-insertion construction.
//!
//! Starting from idle vehicles, repeatedly inserts the unrouted node whose
//! best feasible position adds the least distance. Nodes with no feasible
//! position stay unrouted and are charged their skip penalty.
//!
//! # Complexity
//!
//! O(n² · (n + m)) per round: n insertions, each pricing every unrouted node
//! at every position of every route.

use tracing::{debug, warn};

use crate::error::{Result, RoutingError};
use crate::evaluation::insertion_delta;
use crate::local_search::SearchState;
use crate::problem::{NodeKind, RoutingModel};

/// Builds an initial solution by cheapest insertion.
///
/// Ties are broken by lowest node index, then lowest route, then lowest
/// position, so the result is deterministic. Once `expired` reports true only
/// required nodes are still placed.
///
/// # Errors
///
/// [`RoutingError::Infeasible`] if a required node fits in no route.
///
/// # Examples
///
/// ```
/// use dispatch_routing::constructive::cheapest_insertion;
/// use dispatch_routing::distance::CostMatrix;
/// use dispatch_routing::problem::ModelBuilder;
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
///
/// let state = cheapest_insertion(&model, &mut || false).unwrap();
/// // only one of the two fits; node 1 is closer to the depot
/// assert_eq!(state.routes(), &[vec![1]]);
/// assert_eq!(state.dropped(), &[2]);
/// ```
pub fn cheapest_insertion(
    model: &RoutingModel,
    expired: &mut dyn FnMut() -> bool,
) -> Result<SearchState> {
    let mut state = SearchState::empty(model);
    let mut required_only = false;

    loop {
        if !required_only && expired() {
            warn!(
                unrouted = state.dropped().len(),
                "time budget expired during construction, placing required nodes only"
            );
            required_only = true;
        }
        let Some((_, node, route, pos)) = cheapest_step(&state, model, required_only) else {
            break;
        };
        state.insert(model, route, pos, node);
    }

    if let Some(&node) = state
        .dropped()
        .iter()
        .find(|&&n| model.kind(n) == NodeKind::Required)
    {
        return Err(RoutingError::infeasible(format!(
            "required node {node} (demand {}) fits in no vehicle",
            model.demand(node)
        )));
    }

    debug!(
        routed = model.num_nodes() - 1 - state.dropped().len(),
        dropped = state.dropped().len(),
        cost = state.route_costs(model.matrix()),
        "construction finished"
    );
    Ok(state)
}

/// Cheapest feasible `(delta, node, route, pos)` over unrouted nodes.
fn cheapest_step(
    state: &SearchState,
    model: &RoutingModel,
    required_only: bool,
) -> Option<(i64, usize, usize, usize)> {
    let depot = RoutingModel::DEPOT;
    let mut best: Option<(i64, usize, usize, usize)> = None;

    for &node in state.dropped() {
        if required_only && model.kind(node).is_optional() {
            continue;
        }
        let demand = model.demand(node);
        for (route, nodes) in state.routes().iter().enumerate() {
            if state.loads()[route] + demand > model.capacity(route) {
                continue;
            }
            for pos in 0..=nodes.len() {
                let delta = insertion_delta(nodes, pos, node, depot, model.matrix());
                let candidate = (delta, node, route, pos);
                if best.is_none_or(|b| candidate < b) {
                    best = Some(candidate);
                }
            }
        }
    }

    best
}
