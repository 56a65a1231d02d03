//! # dispatch-routing
//!
//! Capacitated vehicle routing with soft node dropping and multi-trip
//! dispatch. Each trip is solved by cheapest insertion, best-improvement
//! local search, and guided local search under a time budget; locations that
//! do not fit are re-dispatched in later trips.
//!
//! ## Modules
//!
//! - [`api`] — Request/response types and the end-to-end [`api::solve`]
//! - [`config`] — Solver options
//! - [`models`] — Locations, vehicles, routes, per-round solutions
//! - [`distance`] — Cost matrix and matrix providers (haversine, static, OSRM)
//! - [`problem`] — Routing model builder with skip penalties
//! - [`evaluation`] — Route cost, move deltas, feasibility checks
//! - [`constructive`] — Cheapest-insertion construction
//! - [`local_search`] — Relocate, swap, 2-opt and dropped-node moves
//! - [`search`] — Search engine with guided local search and clocks
//! - [`dispatch`] — Multi-trip rounds and index remapping
//! - [`assembly`] — Trip routes over original indices
//! - [`error`] — Error type
//!
//! ## Features
//!
//! - `parallel` — evaluate neighborhoods across routes with rayon
//! - `osrm` — [`distance::OsrmProvider`] over the OSRM table service

pub mod api;
pub mod assembly;
pub mod config;
pub mod constructive;
pub mod dispatch;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod problem;
pub mod search;

pub use api::{solve, SolveRequest, SolveResponse};
pub use config::SolverConfig;
pub use error::{Result, RoutingError};
