//! Search over one routing model.
//!
//! - [`SearchEngine`] — construction + local search + guided escape
//! - [`GuidedLocalSearch`] — arc penalties and augmented costs
//! - [`Clock`] — time source for budgets ([`SystemClock`], [`VirtualClock`])

mod clock;
mod engine;
mod gls;

pub use clock::{Clock, SystemClock, VirtualClock};
pub use engine::{SearchEngine, SearchOutcome, SearchPhase, SearchStatus};
pub use gls::{AugmentedCost, GuidedLocalSearch};
