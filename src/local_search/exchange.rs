//! Inter-route node exchange (swap).
//!
//! # Algorithm
//!
//! For every pair of nodes in two different routes, exchange them if both
//! routes stay within capacity. The delta is the sum of the two in-place
//! replacement deltas.
//!
//! # Complexity
//!
//! O(n × N) per route, where n = nodes in the route and N = routed nodes in
//! later routes.

use super::{consider, Candidate, Move, SearchState};
use crate::evaluation::{replacement_delta, ArcCost};
use crate::problem::RoutingModel;

/// Best improving swap between route `a` and any later route.
pub(super) fn best_swap_from<C: ArcCost + ?Sized>(
    state: &SearchState,
    model: &RoutingModel,
    cost: &C,
    a: usize,
) -> Option<Candidate> {
    let depot = RoutingModel::DEPOT;
    let routes = state.routes();
    let loads = state.loads();
    let route_a = &routes[a];
    let mut best = None;

    for (pos_a, &x) in route_a.iter().enumerate() {
        let dx = model.demand(x);
        for b in (a + 1)..routes.len() {
            let route_b = &routes[b];
            for (pos_b, &y) in route_b.iter().enumerate() {
                let dy = model.demand(y);
                if loads[a] - dx + dy > model.capacity(a)
                    || loads[b] - dy + dx > model.capacity(b)
                {
                    continue;
                }
                let delta = replacement_delta(route_a, pos_a, y, depot, cost)
                    + replacement_delta(route_b, pos_b, x, depot, cost);
                consider(
                    &mut best,
                    delta,
                    Move::Swap {
                        route_a: a,
                        pos_a,
                        route_b: b,
                        pos_b,
                    },
                );
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostMatrix;
    use crate::problem::ModelBuilder;

    // east pair (1, 3) and west pair (2, 4)
    fn model(capacities: Vec<i64>, demands: Vec<i64>) -> RoutingModel {
        let xs = [0i64, 10, -10, 11, -11];
        let rows = xs
            .iter()
            .map(|a| xs.iter().map(|b| (a - b).abs()).collect())
            .collect();
        ModelBuilder::new(demands, capacities)
            .with_matrix(CostMatrix::from_rows(rows).expect("valid"))
            .build()
            .expect("valid")
    }

    #[test]
    fn test_swap_untangles_interleaved_routes() {
        let m = model(vec![20, 20], vec![0, 10, 10, 10, 10]);
        // each route crosses the depot
        let state = SearchState::from_routes(&m, vec![vec![1, 4], vec![3, 2]], vec![]);
        let best = best_swap_from(&state, &m, m.matrix(), 0).expect("improving");
        let mut after = state.clone();
        after.apply(best.mv, &m);
        assert_eq!(
            after.route_costs(m.matrix()) - state.route_costs(m.matrix()),
            best.delta
        );
        assert_eq!(after.route_costs(m.matrix()), 44);
    }

    #[test]
    fn test_swap_respects_capacity() {
        let m = model(vec![15, 30], vec![0, 5, 10, 20, 10]);
        // both untangling swaps overload vehicle 0; the feasible one gains nothing
        let state = SearchState::from_routes(&m, vec![vec![1, 4], vec![3, 2]], vec![]);
        assert!(best_swap_from(&state, &m, m.matrix(), 0).is_none());
    }

    #[test]
    fn test_swap_last_route_has_no_partner() {
        let m = model(vec![20, 20], vec![0, 10, 10, 10, 10]);
        let state = SearchState::from_routes(&m, vec![vec![1, 4], vec![3, 2]], vec![]);
        assert!(best_swap_from(&state, &m, m.matrix(), 1).is_none());
    }
}
