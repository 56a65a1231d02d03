//! Dense integer cost matrix.

use crate::error::{Result, RoutingError};

/// A dense n×n matrix of directed, non-negative travel costs stored in
/// row-major order.
///
/// # Examples
///
/// ```
/// use dispatch_routing::distance::CostMatrix;
///
/// let m = CostMatrix::from_rows(vec![
///     vec![0, 5, 8],
///     vec![5, 0, 3],
///     vec![9, 3, 0],
/// ]).unwrap();
/// assert_eq!(m.get(2, 0), 9);
/// assert_eq!(m.size(), 3);
/// assert_eq!(m.max_entry(), 9);
/// assert!(!m.is_symmetric());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    data: Vec<i64>,
    size: usize,
}

impl CostMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Creates a matrix from rows.
    ///
    /// Fails with [`RoutingError::InvalidInput`] if the rows do not form a
    /// square matrix or any entry is negative.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(RoutingError::invalid(format!(
                    "cost matrix row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            if let Some(j) = row.iter().position(|&c| c < 0) {
                return Err(RoutingError::invalid(format!(
                    "cost matrix entry ({i}, {j}) is negative"
                )));
            }
            data.extend(row);
        }
        Ok(Self { data, size })
    }

    /// Creates a matrix from an explicit row-major grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the cost of travelling from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the cost of travelling from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, cost: i64) {
        self.data[from * self.size + to] = cost;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Largest entry, 0 for an empty matrix.
    pub fn max_entry(&self) -> i64 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// First negative entry in row-major order, as `(from, to, cost)`.
    pub fn first_negative(&self) -> Option<(usize, usize, i64)> {
        self.data
            .iter()
            .position(|&c| c < 0)
            .map(|k| (k / self.size, k % self.size, self.data[k]))
    }

    /// Returns `true` if `get(i, j) == get(j, i)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| ((i + 1)..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Extracts the matrix restricted to `indices`, in that order.
    ///
    /// Entry `(a, b)` of the result is `get(indices[a], indices[b])`.
    pub fn submatrix(&self, indices: &[usize]) -> Self {
        let size = indices.len();
        let mut data = Vec::with_capacity(size * size);
        for &i in indices {
            data.extend(indices.iter().map(|&j| self.get(i, j)));
        }
        Self { data, size }
    }
}
