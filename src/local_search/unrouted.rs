//! Moves between routes and the dropped set.
//!
//! Routing a dropped node earns back its skip penalty; dropping a routed
//! optional node charges it. With the derived penalty these moves only pay
//! off when capacity frees up, which is exactly when a node should return.

use super::{consider, Candidate, Move, SearchState};
use crate::evaluation::{insertion_delta, removal_delta, replacement_delta, ArcCost};
use crate::problem::RoutingModel;

/// Best improving insertion of a dropped node into `route`.
pub(super) fn best_insertion<C: ArcCost + ?Sized>(
    state: &SearchState,
    model: &RoutingModel,
    cost: &C,
    route: usize,
) -> Option<Candidate> {
    let depot = RoutingModel::DEPOT;
    let nodes = &state.routes()[route];
    let room = model.capacity(route) - state.loads()[route];
    let mut best = None;

    for &node in state.dropped() {
        if model.demand(node) > room {
            continue;
        }
        let penalty = model.penalty(node);
        for pos in 0..=nodes.len() {
            let delta = insertion_delta(nodes, pos, node, depot, cost) - penalty;
            consider(&mut best, delta, Move::InsertDropped { node, route, pos });
        }
    }

    best
}

/// Best improving exchange of a routed optional node of `route` with a dropped node.
pub(super) fn best_replacement<C: ArcCost + ?Sized>(
    state: &SearchState,
    model: &RoutingModel,
    cost: &C,
    route: usize,
) -> Option<Candidate> {
    let depot = RoutingModel::DEPOT;
    let nodes = &state.routes()[route];
    let load = state.loads()[route];
    let mut best = None;

    for (pos, &old) in nodes.iter().enumerate() {
        let Some(old_penalty) = model.kind(old).penalty() else {
            continue;
        };
        let base = load - model.demand(old);
        for &node in state.dropped() {
            if base + model.demand(node) > model.capacity(route) {
                continue;
            }
            let delta = replacement_delta(nodes, pos, node, depot, cost) + old_penalty
                - model.penalty(node);
            consider(&mut best, delta, Move::ReplaceWithDropped { route, pos, node });
        }
    }

    best
}

/// Best improving drop of an optional node from `route`.
pub(super) fn best_drop<C: ArcCost + ?Sized>(
    state: &SearchState,
    model: &RoutingModel,
    cost: &C,
    route: usize,
) -> Option<Candidate> {
    let depot = RoutingModel::DEPOT;
    let nodes = &state.routes()[route];
    let mut best = None;

    for (pos, &node) in nodes.iter().enumerate() {
        if let Some(penalty) = model.kind(node).penalty() {
            let delta = removal_delta(nodes, pos, depot, cost) + penalty;
            consider(&mut best, delta, Move::Drop { route, pos });
        }
    }

    best
}
