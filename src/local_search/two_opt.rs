//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of positions `i < j` in a route, reverse the segment
//! `[i..=j]`:
//!
//! ```text
//! before: prev → r[i] → r[i+1] → ... → r[j] → next
//! after:  prev → r[j] → r[j-1] → ... → r[i] → next
//! ```
//!
//! Costs may be asymmetric, so the reversed inner arcs are priced too. The
//! forward and backward sums grow with `j`, keeping a scan at O(n²).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::{consider, Candidate, Move, SearchState};
use crate::evaluation::ArcCost;
use crate::problem::RoutingModel;

/// Best improving segment reversal within `route`.
pub(super) fn best_two_opt<C: ArcCost + ?Sized>(
    state: &SearchState,
    cost: &C,
    route: usize,
) -> Option<Candidate> {
    let depot = RoutingModel::DEPOT;
    let nodes = &state.routes()[route];
    let n = nodes.len();
    if n < 2 {
        return None;
    }

    let mut best = None;
    for i in 0..n - 1 {
        let prev = if i == 0 { depot } else { nodes[i - 1] };
        let mut forward = 0;
        let mut backward = 0;
        for j in (i + 1)..n {
            forward += cost.arc(nodes[j - 1], nodes[j]);
            backward += cost.arc(nodes[j], nodes[j - 1]);
            let next = if j + 1 == n { depot } else { nodes[j + 1] };

            let old = cost.arc(prev, nodes[i]) + forward + cost.arc(nodes[j], next);
            let new = cost.arc(prev, nodes[j]) + backward + cost.arc(nodes[i], next);
            consider(&mut best, new - old, Move::TwoOpt { route, i, j });
        }
    }

    best
}
