//! Inter-route node relocation.
//!
//! # Algorithm
//!
//! Tries moving each node of a route to every insertion position of every
//! other route whose remaining capacity can take its demand. The delta is the
//! removal saving plus the insertion cost; skip penalties are unaffected.
//!
//! # Complexity
//!
//! O(n × N) per source route, where n = nodes in the route and N = routed nodes.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::{consider, Candidate, Move, SearchState};
use crate::evaluation::{insertion_delta, removal_delta, ArcCost};
use crate::problem::RoutingModel;

/// Best improving relocation of a node taken from route `from`.
pub(super) fn best_relocate_from<C: ArcCost + ?Sized>(
    state: &SearchState,
    model: &RoutingModel,
    cost: &C,
    from: usize,
) -> Option<Candidate> {
    let depot = RoutingModel::DEPOT;
    let routes = state.routes();
    let source = &routes[from];
    let mut best = None;

    for (from_pos, &node) in source.iter().enumerate() {
        let removal = removal_delta(source, from_pos, depot, cost);
        let demand = model.demand(node);

        for (to, target) in routes.iter().enumerate() {
            if to == from || state.loads()[to] + demand > model.capacity(to) {
                continue;
            }
            for to_pos in 0..=target.len() {
                let delta = removal + insertion_delta(target, to_pos, node, depot, cost);
                consider(
                    &mut best,
                    delta,
                    Move::Relocate {
                        from_route: from,
                        from_pos,
                        to_route: to,
                        to_pos,
                    },
                );
            }
        }
    }

    best
}
