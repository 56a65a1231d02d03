//! Per-round routing model.

use crate::distance::CostMatrix;

/// How a node takes part in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Start and end of every route. Never dropped.
    Depot,
    /// Must be visited; the round fails if no vehicle can take it.
    Required,
    /// May be left unvisited at the given cost.
    Optional {
        /// Cost charged to the search objective while the node is dropped.
        penalty: i64,
    },
}

impl NodeKind {
    /// Skip penalty, `None` for nodes that cannot be dropped.
    pub fn penalty(&self) -> Option<i64> {
        match self {
            NodeKind::Optional { penalty } => Some(*penalty),
            NodeKind::Depot | NodeKind::Required => None,
        }
    }

    /// Returns `true` if the node may be dropped.
    pub fn is_optional(&self) -> bool {
        matches!(self, NodeKind::Optional { .. })
    }
}

/// Graph model searched in one round: nodes with demands and skip terms,
/// vehicle capacities, and the arc cost matrix.
///
/// Node 0 is the depot. Built by [`ModelBuilder`](super::ModelBuilder),
/// which guarantees the invariants relied on here.
#[derive(Debug, Clone)]
pub struct RoutingModel {
    pub(super) matrix: CostMatrix,
    pub(super) demands: Vec<i64>,
    pub(super) kinds: Vec<NodeKind>,
    pub(super) capacities: Vec<i64>,
}

impl RoutingModel {
    /// Index of the depot.
    pub const DEPOT: usize = 0;

    /// Number of nodes, depot included.
    pub fn num_nodes(&self) -> usize {
        self.demands.len()
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.capacities.len()
    }

    /// Non-depot node indices.
    pub fn customers(&self) -> std::ops::Range<usize> {
        1..self.num_nodes()
    }

    /// Demand of `node`.
    #[inline]
    pub fn demand(&self, node: usize) -> i64 {
        self.demands[node]
    }

    /// Participation of `node`.
    #[inline]
    pub fn kind(&self, node: usize) -> NodeKind {
        self.kinds[node]
    }

    /// Skip penalty of `node`, 0 for nodes that cannot be dropped.
    #[inline]
    pub fn penalty(&self, node: usize) -> i64 {
        self.kinds[node].penalty().unwrap_or(0)
    }

    /// Capacity of the vehicle at ordinal `vehicle`.
    #[inline]
    pub fn capacity(&self, vehicle: usize) -> i64 {
        self.capacities[vehicle]
    }

    /// Largest vehicle capacity.
    pub fn max_capacity(&self) -> i64 {
        self.capacities.iter().copied().max().unwrap_or(0)
    }

    /// Arc cost matrix.
    pub fn matrix(&self) -> &CostMatrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_penalty() {
        assert_eq!(NodeKind::Depot.penalty(), None);
        assert_eq!(NodeKind::Required.penalty(), None);
        assert_eq!(NodeKind::Optional { penalty: 7 }.penalty(), Some(7));
        assert!(NodeKind::Optional { penalty: 7 }.is_optional());
        assert!(!NodeKind::Required.is_optional());
    }
}
