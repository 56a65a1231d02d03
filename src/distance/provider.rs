//! Cost matrix providers.
//!
//! The solver only needs an n×n integer matrix for an ordered list of
//! coordinates. Where it comes from (road network, great-circle estimate,
//! precomputed table) is up to the [`MatrixProvider`] implementation.

use tracing::debug;

use super::CostMatrix;
use crate::error::{Result, RoutingError};
use crate::models::Coordinates;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Source of travel-cost matrices.
pub trait MatrixProvider: Send + Sync {
    /// Returns the n×n cost matrix for `coordinates`, in the given order.
    fn matrix(&self, coordinates: &[Coordinates]) -> Result<CostMatrix>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Fetches a matrix and checks that it covers every coordinate.
///
/// An undersized or oversized table, or one with negative entries, is
/// reported as [`RoutingError::MatrixUnavailable`], never silently repaired.
pub fn fetch_matrix(
    provider: &dyn MatrixProvider,
    coordinates: &[Coordinates],
) -> Result<CostMatrix> {
    debug!(
        provider = provider.name(),
        locations = coordinates.len(),
        "fetching cost matrix"
    );
    let matrix = provider.matrix(coordinates)?;
    if matrix.size() != coordinates.len() {
        return Err(RoutingError::matrix(format!(
            "{} returned a {}x{} matrix for {} locations",
            provider.name(),
            matrix.size(),
            matrix.size(),
            coordinates.len()
        )));
    }
    if let Some((i, j, cost)) = matrix.first_negative() {
        return Err(RoutingError::matrix(format!(
            "{} returned negative cost {cost} from location {i} to {j}",
            provider.name()
        )));
    }
    Ok(matrix)
}

/// Great-circle distance between two points, in metres.
pub fn haversine_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Offline provider: haversine distance × road coefficient, rounded to metres.
///
/// # Examples
///
/// ```
/// use dispatch_routing::distance::{HaversineProvider, MatrixProvider};
/// use dispatch_routing::models::Coordinates;
///
/// let provider = HaversineProvider::default();
/// let m = provider
///     .matrix(&[Coordinates::new(13.38, 52.51), Coordinates::new(13.39, 52.52)])
///     .unwrap();
/// assert_eq!(m.get(0, 0), 0);
/// assert!(m.get(0, 1) > 1_000);
/// assert_eq!(m.get(0, 1), m.get(1, 0));
/// ```
#[derive(Debug, Clone)]
pub struct HaversineProvider {
    road_coefficient: f64,
}

impl Default for HaversineProvider {
    fn default() -> Self {
        Self {
            road_coefficient: 1.3,
        }
    }
}

impl HaversineProvider {
    /// Creates a provider with a custom straight-line → road coefficient.
    pub fn with_road_coefficient(road_coefficient: f64) -> Self {
        Self { road_coefficient }
    }
}

impl MatrixProvider for HaversineProvider {
    fn matrix(&self, coordinates: &[Coordinates]) -> Result<CostMatrix> {
        if let Some(i) = coordinates.iter().position(|c| !c.is_valid()) {
            return Err(RoutingError::matrix(format!(
                "coordinates at index {i} are out of range"
            )));
        }
        let n = coordinates.len();
        let mut m = CostMatrix::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = haversine_distance(&coordinates[i], &coordinates[j])
                    * self.road_coefficient;
                let d = d.round() as i64;
                m.set(i, j, d);
                m.set(j, i, d);
            }
        }
        Ok(m)
    }

    fn name(&self) -> &str {
        "haversine"
    }
}

/// Provider returning a precomputed matrix, whatever the coordinates.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    matrix: CostMatrix,
}

impl StaticProvider {
    /// Wraps a precomputed matrix.
    pub fn new(matrix: CostMatrix) -> Self {
        Self { matrix }
    }
}

impl MatrixProvider for StaticProvider {
    fn matrix(&self, _coordinates: &[Coordinates]) -> Result<CostMatrix> {
        Ok(self.matrix.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
