//! Routing model built for each dispatch round.
//!
//! [`ModelBuilder`] validates the round's inputs and produces a
//! [`RoutingModel`]: arc costs, a demand lookup, per-vehicle capacities, and
//! one skip term ([`NodeKind`]) per non-depot node.

mod builder;
mod model;

pub use builder::{check_costs, derived_skip_penalty, validate_input, ModelBuilder};
pub use model::{NodeKind, RoutingModel};
