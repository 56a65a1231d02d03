//! Per-round solution.

use super::Route;

/// Best-known solution of one search round, in round-local node indices.
///
/// `objective` is the sum of route distances; skip penalties of dropped nodes
/// only steer the search and never show up here.
///
/// # Examples
///
/// ```
/// use dispatch_routing::models::{Route, Solution};
///
/// let sol = Solution::new(
///     vec![Route::with_nodes(0, vec![1], 10, 8), Route::new(1)],
///     vec![2],
/// );
/// assert_eq!(sol.objective(), 8);
/// assert_eq!(sol.num_served(), 1);
/// assert_eq!(sol.dropped(), &[2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    routes: Vec<Route>,
    dropped: Vec<usize>,
    objective: i64,
}

impl Solution {
    /// Creates a solution; the objective is derived from the routes.
    pub fn new(routes: Vec<Route>, mut dropped: Vec<usize>) -> Self {
        dropped.sort_unstable();
        let objective = routes.iter().map(Route::distance).sum();
        Self {
            routes,
            dropped,
            objective,
        }
    }

    /// One route per vehicle, in fleet order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Nodes left unvisited, ascending.
    pub fn dropped(&self) -> &[usize] {
        &self.dropped
    }

    /// Sum of route distances.
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// Number of vehicles that leave the depot.
    pub fn num_used_vehicles(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Number of visited nodes across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }
}
