//! Route cost, load, and feasibility evaluation.
//!
//! The delta helpers are shared by construction and local search so that a
//! move's cost change is computed the same way everywhere.

mod delta;
mod evaluator;

pub use delta::{insertion_delta, removal_delta, replacement_delta, route_cost, ArcCost};
pub use evaluator::{RouteEvaluator, Violation};
