//! Local search neighborhoods over a [`SearchState`].
//!
//! - [`Neighborhood::InsertDropped`] — route a dropped node
//! - [`Neighborhood::ReplaceWithDropped`] — swap a routed node for a dropped one
//! - [`Neighborhood::Relocate`] — move a node to another route
//! - [`Neighborhood::Swap`] — exchange two nodes of different routes
//! - [`Neighborhood::TwoOpt`] — reverse a segment within a route
//! - [`Neighborhood::Drop`] — leave an optional node unvisited
//!
//! Scans are pure: they read the state, price every feasible move with the
//! supplied [`ArcCost`] plus the model's skip penalties, and return the best
//! strictly improving [`Candidate`]. Ties are broken by the move's ordering,
//! so sequential and parallel scans pick the same move.

mod exchange;
mod relocate;
mod state;
mod two_opt;
mod unrouted;

pub use state::SearchState;

use crate::evaluation::ArcCost;
use crate::problem::RoutingModel;

/// A local search move. Positions refer to the state the move was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Move {
    /// Insert dropped `node` into `route` before `pos`.
    InsertDropped {
        node: usize,
        route: usize,
        pos: usize,
    },
    /// Put dropped `node` in place of the node at `route[pos]`, which is dropped.
    ReplaceWithDropped {
        route: usize,
        pos: usize,
        node: usize,
    },
    /// Move `from_route[from_pos]` into `to_route` before `to_pos`.
    Relocate {
        from_route: usize,
        from_pos: usize,
        to_route: usize,
        to_pos: usize,
    },
    /// Exchange `route_a[pos_a]` and `route_b[pos_b]`.
    Swap {
        route_a: usize,
        pos_a: usize,
        route_b: usize,
        pos_b: usize,
    },
    /// Reverse `route[i..=j]`.
    TwoOpt { route: usize, i: usize, j: usize },
    /// Drop the node at `route[pos]`.
    Drop { route: usize, pos: usize },
}

/// A move and its objective change. Orders by delta, then by move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Candidate {
    /// Objective change; negative is an improvement.
    pub delta: i64,
    /// The move.
    pub mv: Move,
}

/// A family of moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighborhood {
    InsertDropped,
    ReplaceWithDropped,
    Relocate,
    Swap,
    TwoOpt,
    Drop,
}

impl Neighborhood {
    /// Every neighborhood, in sweep order.
    pub const ALL: [Neighborhood; 6] = [
        Neighborhood::InsertDropped,
        Neighborhood::ReplaceWithDropped,
        Neighborhood::Relocate,
        Neighborhood::Swap,
        Neighborhood::TwoOpt,
        Neighborhood::Drop,
    ];

    /// Best strictly improving move of this neighborhood, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use dispatch_routing::distance::CostMatrix;
    /// use dispatch_routing::local_search::{Move, Neighborhood, SearchState};
    /// use dispatch_routing::problem::ModelBuilder;
    ///
    /// let matrix = CostMatrix::from_rows(vec![
    ///     vec![0, 1, 2, 3],
    ///     vec![1, 0, 1, 2],
    ///     vec![2, 1, 0, 1],
    ///     vec![3, 2, 1, 0],
    /// ]).unwrap();
    /// let model = ModelBuilder::new(vec![0, 1, 1, 1], vec![10])
    ///     .with_matrix(matrix)
    ///     .build()
    ///     .unwrap();
    /// // 0 → 2 → 1 → 3 → 0 backtracks
    /// let state = SearchState::from_routes(&model, vec![vec![2, 1, 3]], vec![]);
    /// let best = Neighborhood::TwoOpt.scan(&state, &model, model.matrix(), false).unwrap();
    /// assert_eq!(best.mv, Move::TwoOpt { route: 0, i: 0, j: 1 });
    /// assert_eq!(best.delta, -2);
    /// ```
    pub fn scan<C: ArcCost + ?Sized>(
        self,
        state: &SearchState,
        model: &RoutingModel,
        cost: &C,
        parallel: bool,
    ) -> Option<Candidate> {
        let routes = state.routes().len();
        match self {
            Neighborhood::InsertDropped => {
                if state.dropped().is_empty() {
                    return None;
                }
                best_over_routes(routes, parallel, |r| {
                    unrouted::best_insertion(state, model, cost, r)
                })
            }
            Neighborhood::ReplaceWithDropped => {
                if state.dropped().is_empty() {
                    return None;
                }
                best_over_routes(routes, parallel, |r| {
                    unrouted::best_replacement(state, model, cost, r)
                })
            }
            Neighborhood::Relocate => best_over_routes(routes, parallel, |r| {
                relocate::best_relocate_from(state, model, cost, r)
            }),
            Neighborhood::Swap => best_over_routes(routes, parallel, |r| {
                exchange::best_swap_from(state, model, cost, r)
            }),
            Neighborhood::TwoOpt => best_over_routes(routes, parallel, |r| {
                two_opt::best_two_opt(state, cost, r)
            }),
            Neighborhood::Drop => best_over_routes(routes, parallel, |r| {
                unrouted::best_drop(state, model, cost, r)
            }),
        }
    }
}

/// Keeps `mv` if it improves and beats the current best.
#[inline]
fn consider(best: &mut Option<Candidate>, delta: i64, mv: Move) {
    if delta >= 0 {
        return;
    }
    let candidate = Candidate { delta, mv };
    if best.as_ref().is_none_or(|b| candidate < *b) {
        *best = Some(candidate);
    }
}

#[cfg(feature = "parallel")]
fn best_over_routes<F>(routes: usize, parallel: bool, scan: F) -> Option<Candidate>
where
    F: Fn(usize) -> Option<Candidate> + Sync + Send,
{
    use rayon::prelude::*;

    if parallel {
        (0..routes).into_par_iter().filter_map(scan).min()
    } else {
        (0..routes).filter_map(scan).min()
    }
}

#[cfg(not(feature = "parallel"))]
fn best_over_routes<F>(routes: usize, _parallel: bool, scan: F) -> Option<Candidate>
where
    F: Fn(usize) -> Option<Candidate>,
{
    (0..routes).filter_map(scan).min()
}
