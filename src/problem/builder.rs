//! Routing model construction and input validation.

use tracing::warn;

use super::{NodeKind, RoutingModel};
use crate::config::PenaltyPolicy;
use crate::distance::CostMatrix;
use crate::error::{Result, RoutingError};

/// Checks demands and capacities before any matrix is fetched or search run.
///
/// - fewer than 2 nodes, depot demand ≠ 0, negative demand or negative
///   capacity → [`RoutingError::InvalidInput`]
/// - no vehicles → [`RoutingError::Infeasible`]
pub fn validate_input(demands: &[i64], capacities: &[i64]) -> Result<()> {
    if demands.len() < 2 {
        return Err(RoutingError::invalid(
            "at least 2 locations (depot + 1 customer) required",
        ));
    }
    if demands[0] != 0 {
        return Err(RoutingError::invalid(format!(
            "depot must have demand 0, got {}",
            demands[0]
        )));
    }
    if let Some(i) = demands.iter().position(|&d| d < 0) {
        return Err(RoutingError::invalid(format!(
            "location {i} has negative demand {}",
            demands[i]
        )));
    }
    if let Some(v) = capacities.iter().position(|&c| c < 0) {
        return Err(RoutingError::invalid(format!(
            "vehicle {v} has negative capacity {}",
            capacities[v]
        )));
    }
    if capacities.is_empty() {
        return Err(RoutingError::infeasible("no vehicles available"));
    }
    Ok(())
}

/// Smallest skip penalty that exceeds any possible total route cost.
///
/// A solution uses at most `nodes - 1 + vehicles` arcs, each no dearer than
/// the largest matrix entry. The result is capped so that summing every
/// penalty cannot overflow.
pub fn derived_skip_penalty(matrix: &CostMatrix, num_vehicles: usize) -> i64 {
    let n = matrix.size();
    let bound = matrix.max_entry() as i128 * (n + num_vehicles) as i128 + 1;
    bound.min(penalty_cap(n) as i128) as i64
}

/// Rejects matrices the solver cannot price.
///
/// Entries must be non-negative, and the derived skip penalty must fit under
/// the overflow cap. The second condition bounds every route cost and every
/// penalized objective well inside `i64`.
pub fn check_costs(matrix: &CostMatrix, num_vehicles: usize) -> Result<()> {
    if let Some((i, j, cost)) = matrix.first_negative() {
        return Err(RoutingError::invalid(format!(
            "cost matrix entry ({i}, {j}) is negative: {cost}"
        )));
    }
    let n = matrix.size();
    let bound = matrix.max_entry() as i128 * (n + num_vehicles) as i128 + 1;
    if bound > penalty_cap(n) as i128 {
        return Err(RoutingError::invalid(format!(
            "cost matrix entries up to {} are too large for {n} locations \
             and {num_vehicles} vehicles",
            matrix.max_entry()
        )));
    }
    Ok(())
}

fn penalty_cap(num_nodes: usize) -> i64 {
    i64::MAX / (4 * (num_nodes as i64 + 1))
}

/// Builds a [`RoutingModel`] from demands, capacities, and a cost matrix.
///
/// Every non-depot node becomes optional at the skip penalty unless marked
/// required.
///
/// # Examples
///
/// ```
/// use dispatch_routing::distance::CostMatrix;
/// use dispatch_routing::problem::{ModelBuilder, NodeKind};
///
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0, 4, 6],
///     vec![4, 0, 3],
///     vec![6, 3, 0],
/// ]).unwrap();
/// let model = ModelBuilder::new(vec![0, 50, 50], vec![60])
///     .with_matrix(matrix)
///     .build()
///     .unwrap();
/// assert_eq!(model.num_nodes(), 3);
/// // max entry 6 × (3 nodes + 1 vehicle) + 1
/// assert_eq!(model.kind(1), NodeKind::Optional { penalty: 25 });
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    demands: Vec<i64>,
    capacities: Vec<i64>,
    matrix: Option<CostMatrix>,
    penalty: PenaltyPolicy,
    required: Vec<usize>,
}

impl ModelBuilder {
    /// Starts a model with node demands (index 0 = depot) and vehicle capacities.
    pub fn new(demands: Vec<i64>, capacities: Vec<i64>) -> Self {
        Self {
            demands,
            capacities,
            matrix: None,
            penalty: PenaltyPolicy::Derived,
            required: Vec::new(),
        }
    }

    /// Sets the arc cost matrix.
    pub fn with_matrix(mut self, matrix: CostMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Sets the skip penalty policy.
    pub fn with_penalty(mut self, policy: PenaltyPolicy) -> Self {
        self.penalty = policy;
        self
    }

    /// Marks `node` as required (it cannot be dropped).
    pub fn require(mut self, node: usize) -> Self {
        self.required.push(node);
        self
    }

    /// Validates the inputs and builds the model.
    pub fn build(self) -> Result<RoutingModel> {
        validate_input(&self.demands, &self.capacities)?;
        let n = self.demands.len();

        let matrix = self
            .matrix
            .ok_or_else(|| RoutingError::invalid("cost matrix missing"))?;
        if matrix.size() != n {
            return Err(RoutingError::invalid(format!(
                "cost matrix is {}x{} but there are {n} locations",
                matrix.size(),
                matrix.size()
            )));
        }
        check_costs(&matrix, self.capacities.len())?;
        if let Some(&node) = self.required.iter().find(|&&r| r == 0 || r >= n) {
            return Err(RoutingError::invalid(format!(
                "node {node} cannot be marked required"
            )));
        }

        let penalty = effective_penalty(self.penalty, &matrix, self.capacities.len());
        let kinds = (0..n)
            .map(|i| {
                if i == RoutingModel::DEPOT {
                    NodeKind::Depot
                } else if self.required.contains(&i) {
                    NodeKind::Required
                } else {
                    NodeKind::Optional { penalty }
                }
            })
            .collect();

        Ok(RoutingModel {
            matrix,
            demands: self.demands,
            kinds,
            capacities: self.capacities,
        })
    }
}

fn effective_penalty(policy: PenaltyPolicy, matrix: &CostMatrix, num_vehicles: usize) -> i64 {
    let derived = derived_skip_penalty(matrix, num_vehicles);
    match policy {
        PenaltyPolicy::Derived => derived,
        PenaltyPolicy::Fixed(p) if p > derived => p.min(penalty_cap(matrix.size())),
        PenaltyPolicy::Fixed(p) => {
            warn!(
                configured = p,
                raised_to = derived,
                "skip penalty does not exceed the maximum route cost, raising it"
            );
            derived
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix3() -> CostMatrix {
        CostMatrix::from_rows(vec![vec![0, 10, 20], vec![10, 0, 15], vec![20, 15, 0]])
            .expect("valid")
    }

    #[test]
    fn test_fewer_than_two_locations() {
        let err = ModelBuilder::new(vec![0], vec![10])
            .with_matrix(CostMatrix::new(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidInput(_)));
    }

    #[test]
    fn test_depot_with_demand() {
        let err = validate_input(&[5, 1], &[10]).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidInput(_)));
    }

    #[test]
    fn test_negative_demand() {
        assert!(matches!(
            validate_input(&[0, -1], &[10]),
            Err(RoutingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_negative_capacity() {
        assert!(matches!(
            validate_input(&[0, 1], &[10, -1]),
            Err(RoutingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_no_vehicles_is_infeasible() {
        assert!(matches!(
            validate_input(&[0, 1], &[]),
            Err(RoutingError::Infeasible(_))
        ));
    }

    #[test]
    fn test_matrix_mismatch() {
        let err = ModelBuilder::new(vec![0, 1], vec![10])
            .with_matrix(matrix3())
            .build()
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_matrix() {
        let err = ModelBuilder::new(vec![0, 1], vec![10]).build().unwrap_err();
        assert!(matches!(err, RoutingError::InvalidInput(_)));
    }

    #[test]
    fn test_derived_penalty_exceeds_any_route_cost() {
        let m = matrix3();
        let p = derived_skip_penalty(&m, 2);
        // 20 × (3 + 2) + 1
        assert_eq!(p, 101);
        // worst case: every possible arc at max cost
        assert!(p > m.max_entry() * (m.size() as i64 - 1 + 2));
    }

    #[test]
    fn test_derived_penalty_is_capped() {
        let mut m = CostMatrix::new(2);
        m.set(0, 1, i64::MAX / 2);
        let p = derived_skip_penalty(&m, 1);
        assert!(p > 0);
        assert!(p.checked_mul(3).is_some());
    }

    #[test]
    fn test_negative_cost_rejected() {
        let matrix = CostMatrix::from_data(3, vec![0, -50, -50, -50, 0, 0, -50, 0, 0])
            .expect("3x3");
        let err = ModelBuilder::new(vec![0, 1, 1], vec![10])
            .with_matrix(matrix)
            .build()
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidInput(_)));
    }

    #[test]
    fn test_huge_costs_rejected() {
        let matrix = CostMatrix::from_data(3, vec![i64::MAX / 2; 9]).expect("3x3");
        let err = ModelBuilder::new(vec![0, 1, 1], vec![10])
            .with_matrix(matrix)
            .build()
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidInput(_)));
    }

    #[test]
    fn test_largest_accepted_costs_keep_penalty_above_routes() {
        // largest entry whose derived penalty still fits under the cap
        let (n, m) = (3usize, 1usize);
        let max = (penalty_cap(n) - 1) / (n + m) as i64;
        let matrix = CostMatrix::from_data(n, vec![max; n * n]).expect("3x3");
        let model = ModelBuilder::new(vec![0, 1, 1], vec![10])
            .with_matrix(matrix.clone())
            .build()
            .expect("valid");
        assert_eq!(model.penalty(1), max * (n + m) as i64 + 1);
        assert!(model.penalty(1) > max * (n as i64 - 1 + m as i64));
        assert!(check_costs(&matrix, m).is_ok());
    }

    #[test]
    fn test_fixed_penalty_raised() {
        let model = ModelBuilder::new(vec![0, 1, 1], vec![10])
            .with_matrix(matrix3())
            .with_penalty(PenaltyPolicy::Fixed(5))
            .build()
            .expect("valid");
        assert_eq!(model.penalty(1), 81);
    }

    #[test]
    fn test_fixed_penalty_kept() {
        let model = ModelBuilder::new(vec![0, 1, 1], vec![10])
            .with_matrix(matrix3())
            .with_penalty(PenaltyPolicy::Fixed(1_000_000))
            .build()
            .expect("valid");
        assert_eq!(model.penalty(2), 1_000_000);
    }

    #[test]
    fn test_required_nodes() {
        let model = ModelBuilder::new(vec![0, 1, 1], vec![10])
            .with_matrix(matrix3())
            .require(2)
            .build()
            .expect("valid");
        assert_eq!(model.kind(0), NodeKind::Depot);
        assert!(model.kind(1).is_optional());
        assert_eq!(model.kind(2), NodeKind::Required);
        assert_eq!(model.penalty(2), 0);
    }

    #[test]
    fn test_depot_cannot_be_required() {
        let err = ModelBuilder::new(vec![0, 1], vec![10])
            .with_matrix(CostMatrix::new(2))
            .require(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidInput(_)));
    }
}
