//! Mutable solution state shared by construction and local search.

use super::Move;
use crate::evaluation::{route_cost, ArcCost, RouteEvaluator};
use crate::models::Solution;
use crate::problem::RoutingModel;

/// One node sequence per vehicle, their loads, and the dropped set.
///
/// Loads are maintained incrementally by [`insert`](Self::insert) and
/// [`apply`](Self::apply); `dropped` stays sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    routes: Vec<Vec<usize>>,
    loads: Vec<i64>,
    dropped: Vec<usize>,
}

impl SearchState {
    /// Every vehicle idle, every customer dropped.
    pub fn empty(model: &RoutingModel) -> Self {
        Self {
            routes: vec![Vec::new(); model.num_vehicles()],
            loads: vec![0; model.num_vehicles()],
            dropped: model.customers().collect(),
        }
    }

    /// Builds a state from explicit routes; loads are computed.
    pub fn from_routes(
        model: &RoutingModel,
        routes: Vec<Vec<usize>>,
        mut dropped: Vec<usize>,
    ) -> Self {
        let loads = routes
            .iter()
            .map(|r| r.iter().map(|&n| model.demand(n)).sum())
            .collect();
        dropped.sort_unstable();
        Self {
            routes,
            loads,
            dropped,
        }
    }

    /// Node sequences, one per vehicle.
    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// Current load of each route.
    pub fn loads(&self) -> &[i64] {
        &self.loads
    }

    /// Dropped nodes, ascending.
    pub fn dropped(&self) -> &[usize] {
        &self.dropped
    }

    /// Sum of route costs under `cost`.
    pub fn route_costs<C: ArcCost + ?Sized>(&self, cost: &C) -> i64 {
        self.routes
            .iter()
            .map(|r| route_cost(r, RoutingModel::DEPOT, cost))
            .sum()
    }

    /// Objective driving the search: true route costs plus skip penalties.
    pub fn penalized_objective(&self, model: &RoutingModel) -> i64 {
        let penalties: i64 = self.dropped.iter().map(|&n| model.penalty(n)).sum();
        self.route_costs(model.matrix()) + penalties
    }

    /// Inserts a dropped `node` into `route` before `pos`.
    pub fn insert(&mut self, model: &RoutingModel, route: usize, pos: usize, node: usize) {
        self.undrop(node);
        self.routes[route].insert(pos, node);
        self.loads[route] += model.demand(node);
    }

    /// Applies a move produced by a neighborhood scan of this state.
    pub fn apply(&mut self, mv: Move, model: &RoutingModel) {
        match mv {
            Move::InsertDropped { node, route, pos } => self.insert(model, route, pos, node),
            Move::ReplaceWithDropped { route, pos, node } => {
                let old = std::mem::replace(&mut self.routes[route][pos], node);
                self.loads[route] += model.demand(node) - model.demand(old);
                self.undrop(node);
                self.drop_node(old);
            }
            Move::Relocate {
                from_route,
                from_pos,
                to_route,
                to_pos,
            } => {
                let node = self.routes[from_route].remove(from_pos);
                self.loads[from_route] -= model.demand(node);
                self.routes[to_route].insert(to_pos, node);
                self.loads[to_route] += model.demand(node);
            }
            Move::Swap {
                route_a,
                pos_a,
                route_b,
                pos_b,
            } => {
                let a = self.routes[route_a][pos_a];
                let b = self.routes[route_b][pos_b];
                self.routes[route_a][pos_a] = b;
                self.routes[route_b][pos_b] = a;
                let shift = model.demand(b) - model.demand(a);
                self.loads[route_a] += shift;
                self.loads[route_b] -= shift;
            }
            Move::TwoOpt { route, i, j } => self.routes[route][i..=j].reverse(),
            Move::Drop { route, pos } => {
                let node = self.routes[route].remove(pos);
                self.loads[route] -= model.demand(node);
                self.drop_node(node);
            }
        }
    }

    /// Converts to a [`Solution`] with true route distances.
    pub fn to_solution(&self, model: &RoutingModel) -> Solution {
        RouteEvaluator::new(model).build_solution(&self.routes, &self.dropped)
    }

    fn undrop(&mut self, node: usize) {
        if let Ok(i) = self.dropped.binary_search(&node) {
            self.dropped.remove(i);
        }
    }

    fn drop_node(&mut self, node: usize) {
        if let Err(i) = self.dropped.binary_search(&node) {
            self.dropped.insert(i, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostMatrix;
    use crate::problem::ModelBuilder;

    fn model() -> RoutingModel {
        let matrix = CostMatrix::from_rows(vec![
            vec![0, 5, 8, 12],
            vec![5, 0, 3, 7],
            vec![8, 3, 0, 4],
            vec![12, 7, 4, 0],
        ])
        .expect("valid");
        ModelBuilder::new(vec![0, 10, 20, 15], vec![40, 40])
            .with_matrix(matrix)
            .build()
            .expect("valid")
    }

    #[test]
    fn test_empty_state() {
        let m = model();
        let s = SearchState::empty(&m);
        assert_eq!(s.routes().len(), 2);
        assert_eq!(s.dropped(), &[1, 2, 3]);
        assert_eq!(s.route_costs(m.matrix()), 0);
        assert_eq!(s.penalized_objective(&m), 3 * m.penalty(1));
    }

    #[test]
    fn test_insert_updates_load_and_dropped() {
        let m = model();
        let mut s = SearchState::empty(&m);
        s.insert(&m, 1, 0, 2);
        assert_eq!(s.loads(), &[0, 20]);
        assert_eq!(s.dropped(), &[1, 3]);
    }

    #[test]
    fn test_apply_moves() {
        let m = model();
        let mut s = SearchState::from_routes(&m, vec![vec![1, 2], vec![3]], vec![]);
        assert_eq!(s.loads(), &[30, 15]);

        s.apply(
            Move::Swap {
                route_a: 0,
                pos_a: 0,
                route_b: 1,
                pos_b: 0,
            },
            &m,
        );
        assert_eq!(s.routes(), &[vec![3, 2], vec![1]]);
        assert_eq!(s.loads(), &[35, 10]);

        s.apply(
            Move::TwoOpt {
                route: 0,
                i: 0,
                j: 1,
            },
            &m,
        );
        assert_eq!(s.routes()[0], vec![2, 3]);

        s.apply(
            Move::Relocate {
                from_route: 0,
                from_pos: 0,
                to_route: 1,
                to_pos: 1,
            },
            &m,
        );
        assert_eq!(s.routes(), &[vec![3], vec![1, 2]]);
        assert_eq!(s.loads(), &[15, 30]);

        s.apply(Move::Drop { route: 1, pos: 0 }, &m);
        assert_eq!(s.dropped(), &[1]);
        assert_eq!(s.loads()[1], 20);

        s.apply(
            Move::ReplaceWithDropped {
                route: 0,
                pos: 0,
                node: 1,
            },
            &m,
        );
        assert_eq!(s.routes()[0], vec![1]);
        assert_eq!(s.dropped(), &[3]);
        assert_eq!(s.loads()[0], 10);

        s.apply(
            Move::InsertDropped {
                node: 3,
                route: 0,
                pos: 1,
            },
            &m,
        );
        assert!(s.dropped().is_empty());
        assert_eq!(s.routes()[0], vec![1, 3]);
    }

    #[test]
    fn test_to_solution() {
        let m = model();
        let s = SearchState::from_routes(&m, vec![vec![1, 2], vec![]], vec![3]);
        let sol = s.to_solution(&m);
        assert_eq!(sol.objective(), 5 + 3 + 8);
        assert_eq!(sol.dropped(), &[3]);
        assert!(sol.routes()[1].is_empty());
    }
}
