//! Route evaluator that computes distance and load, and checks solutions.

use super::route_cost;
use crate::models::{Route, Solution};
use crate::problem::RoutingModel;

/// A constraint a solution breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Route load exceeds the vehicle's capacity.
    CapacityExceeded {
        /// Vehicle ordinal.
        vehicle: usize,
        /// Load carried.
        load: i64,
        /// Vehicle capacity.
        capacity: i64,
    },
    /// A node is visited more than once.
    DuplicateVisit {
        /// Node index.
        node: usize,
    },
    /// A node is neither routed nor dropped.
    MissingNode {
        /// Node index.
        node: usize,
    },
    /// A required node was dropped.
    RequiredDropped {
        /// Node index.
        node: usize,
    },
    /// The depot appears inside a route, or a node index is out of range.
    InvalidNode {
        /// Vehicle ordinal.
        vehicle: usize,
        /// Offending index.
        node: usize,
    },
    /// The number of routes differs from the number of vehicles.
    RouteCount {
        /// Routes in the solution.
        routes: usize,
        /// Vehicles in the model.
        vehicles: usize,
    },
}

/// Evaluates routes against a [`RoutingModel`].
///
/// # Examples
///
/// ```
/// use dispatch_routing::distance::CostMatrix;
/// use dispatch_routing::evaluation::RouteEvaluator;
/// use dispatch_routing::problem::ModelBuilder;
///
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0, 4, 6],
///     vec![4, 0, 3],
///     vec![6, 3, 0],
/// ]).unwrap();
/// let model = ModelBuilder::new(vec![0, 10, 20], vec![50])
///     .with_matrix(matrix)
///     .build()
///     .unwrap();
///
/// let route = RouteEvaluator::new(&model).build_route(0, vec![1, 2]);
/// assert_eq!(route.distance(), 13);
/// assert_eq!(route.load(), 30);
/// ```
pub struct RouteEvaluator<'a> {
    model: &'a RoutingModel,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates an evaluator for the given model.
    pub fn new(model: &'a RoutingModel) -> Self {
        Self { model }
    }

    /// Total demand of `nodes`.
    pub fn load(&self, nodes: &[usize]) -> i64 {
        nodes.iter().map(|&n| self.model.demand(n)).sum()
    }

    /// Builds a route for `vehicle`, computing its distance and load.
    pub fn build_route(&self, vehicle: usize, nodes: Vec<usize>) -> Route {
        let distance = route_cost(&nodes, RoutingModel::DEPOT, self.model.matrix());
        let load = self.load(&nodes);
        Route::with_nodes(vehicle, nodes, load, distance)
    }

    /// Builds a solution from one node sequence per vehicle plus the dropped set.
    pub fn build_solution(&self, routes: &[Vec<usize>], dropped: &[usize]) -> Solution {
        let routes = routes
            .iter()
            .enumerate()
            .map(|(v, nodes)| self.build_route(v, nodes.clone()))
            .collect();
        Solution::new(routes, dropped.to_vec())
    }

    /// Lists every violated constraint of `solution`. Empty means feasible.
    pub fn check(&self, solution: &Solution) -> Vec<Violation> {
        let n = self.model.num_nodes();
        let mut violations = Vec::new();
        let mut seen = vec![0usize; n];

        if solution.routes().len() != self.model.num_vehicles() {
            violations.push(Violation::RouteCount {
                routes: solution.routes().len(),
                vehicles: self.model.num_vehicles(),
            });
        }

        for route in solution.routes() {
            let vehicle = route.vehicle();
            for &node in route.nodes() {
                if node == RoutingModel::DEPOT || node >= n {
                    violations.push(Violation::InvalidNode { vehicle, node });
                } else {
                    seen[node] += 1;
                }
            }
            let load = self.load(
                &route
                    .nodes()
                    .iter()
                    .copied()
                    .filter(|&c| c < n)
                    .collect::<Vec<_>>(),
            );
            if vehicle < self.model.num_vehicles() && load > self.model.capacity(vehicle) {
                violations.push(Violation::CapacityExceeded {
                    vehicle,
                    load,
                    capacity: self.model.capacity(vehicle),
                });
            }
        }

        for &node in solution.dropped() {
            if node == RoutingModel::DEPOT || node >= n {
                continue;
            }
            seen[node] += 1;
            if !self.model.kind(node).is_optional() {
                violations.push(Violation::RequiredDropped { node });
            }
        }

        for node in self.model.customers() {
            match seen[node] {
                0 => violations.push(Violation::MissingNode { node }),
                1 => {}
                _ => violations.push(Violation::DuplicateVisit { node }),
            }
        }

        violations
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
        ModelBuilder::new(vec![0, 10, 20, 15], vec![30, 30])
            .with_matrix(matrix)
            .require(3)
            .build()
            .expect("valid")
    }

    #[test]
    fn test_build_route_empty() {
        let m = model();
        let r = RouteEvaluator::new(&m).build_route(1, vec![]);
        assert!(r.is_empty());
        assert_eq!(r.distance(), 0);
        assert_eq!(r.vehicle(), 1);
    }

    #[test]
    fn test_build_route_single() {
        let m = model();
        let r = RouteEvaluator::new(&m).build_route(0, vec![1]);
        assert_eq!(r.distance(), 10);
        assert_eq!(r.load(), 10);
    }

    #[test]
    fn test_check_feasible() {
        let m = model();
        let eval = RouteEvaluator::new(&m);
        let sol = eval.build_solution(&[vec![1, 2], vec![3]], &[]);
        assert!(eval.check(&sol).is_empty());
    }

    #[test]
    fn test_check_capacity() {
        let m = model();
        let eval = RouteEvaluator::new(&m);
        // 10 + 20 + 15 = 45 > 30
        let sol = eval.build_solution(&[vec![1, 2, 3], vec![]], &[]);
        assert_eq!(
            eval.check(&sol),
            vec![Violation::CapacityExceeded {
                vehicle: 0,
                load: 45,
                capacity: 30
            }]
        );
    }

    #[test]
    fn test_check_missing_and_duplicate() {
        let m = model();
        let eval = RouteEvaluator::new(&m);
        let sol = eval.build_solution(&[vec![1, 3], vec![1]], &[]);
        let v = eval.check(&sol);
        assert!(v.contains(&Violation::DuplicateVisit { node: 1 }));
        assert!(v.contains(&Violation::MissingNode { node: 2 }));
    }

    #[test]
    fn test_check_required_dropped() {
        let m = model();
        let eval = RouteEvaluator::new(&m);
        let sol = eval.build_solution(&[vec![1, 2], vec![]], &[3]);
        assert_eq!(eval.check(&sol), vec![Violation::RequiredDropped { node: 3 }]);
    }

    #[test]
    fn test_check_depot_in_route() {
        let m = model();
        let eval = RouteEvaluator::new(&m);
        let sol = eval.build_solution(&[vec![1, 0, 2], vec![3]], &[]);
        let violations = eval.check(&sol);
        assert!(violations.contains(&Violation::InvalidNode {
            vehicle: 0,
            node: 0
        }));
    }
}
