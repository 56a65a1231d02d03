//! Guided local search arc penalties.
//!
//! # Algorithm
//!
//! At every local optimum each arc of the current solution records one
//! occurrence. The arcs maximising
//!
//! ```text
//! utility(i, j) = occurrences(i, j) · cost(i, j) / (1 + penalty(i, j))
//! ```
//!
//! have their penalty raised by one. The next descent runs on the augmented
//! cost `cost(i, j) + λ · penalty(i, j)`, which pushes it away from arcs the
//! search keeps returning to.
//!
//! λ is fixed at the first local optimum after a reset as
//! `max(1, coefficient · cost / arcs)`, i.e. a fraction of the average arc
//! cost of that solution.
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (1999). "Guided local search and its application
//! to the traveling salesman problem", *European Journal of Operational
//! Research* 113(2), 469-499.

use tracing::debug;

use crate::distance::CostMatrix;
use crate::evaluation::ArcCost;
use crate::local_search::SearchState;
use crate::problem::RoutingModel;

/// Arc penalty and occurrence tables for one round.
#[derive(Debug, Clone)]
pub struct GuidedLocalSearch {
    size: usize,
    penalties: Vec<u32>,
    occurrences: Vec<u32>,
    coefficient: f64,
    lambda: i64,
}

impl GuidedLocalSearch {
    /// Creates empty tables for `num_nodes` nodes.
    pub fn new(num_nodes: usize, coefficient: f64) -> Self {
        Self {
            size: num_nodes,
            penalties: vec![0; num_nodes * num_nodes],
            occurrences: vec![0; num_nodes * num_nodes],
            coefficient,
            lambda: 0,
        }
    }

    /// Current penalty of arc `from → to`.
    #[inline]
    pub fn penalty(&self, from: usize, to: usize) -> u32 {
        self.penalties[from * self.size + to]
    }

    /// Penalty weight; 0 until the first local optimum.
    pub fn lambda(&self) -> i64 {
        self.lambda
    }

    /// Augmented arc costs over `matrix`.
    pub fn augmented<'a>(&'a self, matrix: &'a CostMatrix) -> AugmentedCost<'a> {
        AugmentedCost { gls: self, matrix }
    }

    /// Clears all penalties and occurrences.
    pub fn reset(&mut self) {
        self.penalties.fill(0);
        self.occurrences.fill(0);
        self.lambda = 0;
    }

    /// Records the arcs of a local optimum and penalizes the maximum-utility
    /// ones. Returns `false` if no arc has positive utility.
    pub fn penalize(&mut self, state: &SearchState, model: &RoutingModel) -> bool {
        let matrix = model.matrix();
        let arcs = solution_arcs(state);
        if arcs.is_empty() {
            return false;
        }

        if self.lambda == 0 {
            let cost: i64 = arcs.iter().map(|&(i, j)| matrix.get(i, j)).sum();
            let scaled = self.coefficient * cost as f64 / arcs.len() as f64;
            self.lambda = (scaled as i64).max(1);
        }

        for &(i, j) in &arcs {
            let k = i * self.size + j;
            self.occurrences[k] = self.occurrences[k].saturating_add(1);
        }

        // utility as a fraction (occurrences · cost, 1 + penalty)
        let utility = |&(i, j): &(usize, usize)| {
            let k = i * self.size + j;
            (
                self.occurrences[k] as i128 * matrix.get(i, j) as i128,
                1 + self.penalties[k] as i128,
            )
        };
        let mut best = (0i128, 1i128);
        for arc in &arcs {
            let (num, den) = utility(arc);
            if num * best.1 > best.0 * den {
                best = (num, den);
            }
        }
        if best.0 == 0 {
            return false;
        }

        let selected: Vec<(usize, usize)> = arcs
            .iter()
            .filter(|arc| {
                let (num, den) = utility(arc);
                num * best.1 == best.0 * den
            })
            .copied()
            .collect();
        for &(i, j) in &selected {
            let k = i * self.size + j;
            self.penalties[k] = self.penalties[k].saturating_add(1);
        }

        debug!(
            penalized = selected.len(),
            lambda = self.lambda,
            "guided local search penalties raised"
        );
        true
    }
}

/// Arc costs plus `λ · penalty`.
#[derive(Debug, Clone, Copy)]
pub struct AugmentedCost<'a> {
    gls: &'a GuidedLocalSearch,
    matrix: &'a CostMatrix,
}

impl ArcCost for AugmentedCost<'_> {
    #[inline]
    fn arc(&self, from: usize, to: usize) -> i64 {
        let extra = self
            .gls
            .lambda
            .saturating_mul(self.gls.penalty(from, to) as i64);
        self.matrix.get(from, to).saturating_add(extra)
    }
}

/// Every arc travelled by a non-empty route, depot legs included.
fn solution_arcs(state: &SearchState) -> Vec<(usize, usize)> {
    let depot = RoutingModel::DEPOT;
    let mut arcs = Vec::new();
    for route in state.routes().iter().filter(|r| !r.is_empty()) {
        let mut prev = depot;
        for &node in route {
            arcs.push((prev, node));
            prev = node;
        }
        arcs.push((prev, depot));
    }
    arcs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ModelBuilder;

    fn model() -> RoutingModel {
        let matrix = CostMatrix::from_rows(vec![
            vec![0, 10, 20],
            vec![10, 0, 5],
            vec![20, 5, 0],
        ])
        .expect("valid");
        ModelBuilder::new(vec![0, 1, 1], vec![10])
            .with_matrix(matrix)
            .build()
            .expect("valid")
    }

    #[test]
    fn test_penalizes_most_expensive_arc() {
        let m = model();
        let state = SearchState::from_routes(&m, vec![vec![1, 2]], vec![]);
        let mut gls = GuidedLocalSearch::new(3, 0.1);

        assert!(gls.penalize(&state, &m));
        // 0.1 × 35 / 3 rounds to 1
        assert_eq!(gls.lambda(), 1);
        assert_eq!(gls.penalty(2, 0), 1);
        assert_eq!(gls.penalty(0, 1), 0);
        assert_eq!(gls.penalty(1, 2), 0);

        // second optimum: 2·20/2 ties 2·10/1, both arcs are raised
        assert!(gls.penalize(&state, &m));
        assert_eq!(gls.penalty(2, 0), 2);
        assert_eq!(gls.penalty(0, 1), 1);
        assert_eq!(gls.penalty(1, 2), 0);
    }

    #[test]
    fn test_augmented_cost() {
        let m = model();
        let state = SearchState::from_routes(&m, vec![vec![1, 2]], vec![]);
        // 0.36 × 35 / 3 = 4.2
        let mut gls = GuidedLocalSearch::new(3, 0.36);
        gls.penalize(&state, &m);
        assert_eq!(gls.lambda(), 4);
        let cost = gls.augmented(m.matrix());
        assert_eq!(cost.arc(2, 0), 24);
        assert_eq!(cost.arc(0, 2), 20);
    }

    #[test]
    fn test_nothing_to_penalize() {
        let m = model();
        let mut gls = GuidedLocalSearch::new(3, 0.1);
        let empty = SearchState::empty(&m);
        assert!(!gls.penalize(&empty, &m));

        let zero = ModelBuilder::new(vec![0, 1], vec![10])
            .with_matrix(CostMatrix::new(2))
            .build()
            .expect("valid");
        let state = SearchState::from_routes(&zero, vec![vec![1]], vec![]);
        let mut gls = GuidedLocalSearch::new(2, 0.1);
        assert!(!gls.penalize(&state, &zero));
    }

    #[test]
    fn test_reset() {
        let m = model();
        let state = SearchState::from_routes(&m, vec![vec![1, 2]], vec![]);
        let mut gls = GuidedLocalSearch::new(3, 0.1);
        gls.penalize(&state, &m);
        gls.reset();
        assert_eq!(gls.penalty(2, 0), 0);
        assert_eq!(gls.lambda(), 0);
    }
}
