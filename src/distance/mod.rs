//! Travel cost matrices and the providers that produce them.
//!
//! - [`CostMatrix`] — dense integer matrix consumed by the solver
//! - [`MatrixProvider`] — adapter boundary to road-network services
//! - [`HaversineProvider`], [`StaticProvider`] — offline providers
//! - [`OsrmConfig`], [`parse_table`] — OSRM table service (fetch behind the `osrm` feature)

mod matrix;
mod osrm;
mod provider;

pub use matrix::CostMatrix;
#[cfg(feature = "osrm")]
pub use osrm::OsrmProvider;
pub use osrm::{parse_table, OsrmConfig};
pub use provider::{
    fetch_matrix, haversine_distance, HaversineProvider, MatrixProvider, StaticProvider,
};
