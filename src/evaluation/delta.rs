//! Incremental cost changes of single-route edits.
//!
//! Routes are node sequences without the depot; the depot closes both ends.
//! An empty route costs nothing, so inserting into or emptying a route
//! never charges the depot→depot arc.

use crate::distance::CostMatrix;

/// Directed arc cost used by evaluation and search.
pub trait ArcCost: Sync {
    /// Cost of travelling from `from` to `to`.
    fn arc(&self, from: usize, to: usize) -> i64;
}

impl ArcCost for CostMatrix {
    #[inline]
    fn arc(&self, from: usize, to: usize) -> i64 {
        self.get(from, to)
    }
}

/// Total cost `depot → nodes[0] → ... → nodes[n-1] → depot`, 0 if empty.
///
/// # Examples
///
/// ```
/// use dispatch_routing::distance::CostMatrix;
/// use dispatch_routing::evaluation::route_cost;
///
/// let m = CostMatrix::from_rows(vec![vec![0, 1, 2], vec![1, 0, 1], vec![2, 1, 0]]).unwrap();
/// assert_eq!(route_cost(&[1, 2], 0, &m), 4);
/// assert_eq!(route_cost(&[], 0, &m), 0);
/// ```
pub fn route_cost<C: ArcCost + ?Sized>(nodes: &[usize], depot: usize, cost: &C) -> i64 {
    let (Some(&first), Some(&last)) = (nodes.first(), nodes.last()) else {
        return 0;
    };
    let inner: i64 = nodes.windows(2).map(|w| cost.arc(w[0], w[1])).sum();
    cost.arc(depot, first) + inner + cost.arc(last, depot)
}

#[inline]
fn neighbors(nodes: &[usize], pos: usize, depot: usize) -> (usize, usize) {
    let prev = if pos == 0 { depot } else { nodes[pos - 1] };
    let next = if pos + 1 >= nodes.len() {
        depot
    } else {
        nodes[pos + 1]
    };
    (prev, next)
}

/// Cost change of inserting `node` before position `pos` (`pos == len` appends).
pub fn insertion_delta<C: ArcCost + ?Sized>(
    nodes: &[usize],
    pos: usize,
    node: usize,
    depot: usize,
    cost: &C,
) -> i64 {
    if nodes.is_empty() {
        return cost.arc(depot, node) + cost.arc(node, depot);
    }
    let prev = if pos == 0 { depot } else { nodes[pos - 1] };
    let next = if pos == nodes.len() { depot } else { nodes[pos] };
    cost.arc(prev, node) + cost.arc(node, next) - cost.arc(prev, next)
}

/// Cost change of removing the node at `pos`. Usually negative.
pub fn removal_delta<C: ArcCost + ?Sized>(
    nodes: &[usize],
    pos: usize,
    depot: usize,
    cost: &C,
) -> i64 {
    let node = nodes[pos];
    let (prev, next) = neighbors(nodes, pos, depot);
    let bridge = if nodes.len() == 1 {
        0
    } else {
        cost.arc(prev, next)
    };
    bridge - cost.arc(prev, node) - cost.arc(node, next)
}

/// Cost change of replacing the node at `pos` with `node`.
pub fn replacement_delta<C: ArcCost + ?Sized>(
    nodes: &[usize],
    pos: usize,
    node: usize,
    depot: usize,
    cost: &C,
) -> i64 {
    let old = nodes[pos];
    let (prev, next) = neighbors(nodes, pos, depot);
    cost.arc(prev, node) + cost.arc(node, next) - cost.arc(prev, old) - cost.arc(old, next)
}
