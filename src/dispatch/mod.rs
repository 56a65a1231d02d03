//! Multi-trip dispatch over rounds of the search.

mod dispatcher;
mod index_map;

pub use dispatcher::{DispatchOutcome, MultiTripDispatcher, RoundSummary, StopReason};
pub use index_map::IndexMap;
