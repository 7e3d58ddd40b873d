//! Triangular arbitrage engine.
//!
//! Two pure stages: [`build_cycles`] enumerates triangular cycles from the
//! venue's market list once per refresh, and [`compute_surface_rates`]
//! prices one cycle against a snapshot of best bid/ask quotes. Neither holds
//! state, so both can run concurrently over different inputs.

mod cycles;
mod error;
mod surface;

pub use cycles::build_cycles;
pub use error::ArbitrageError;
pub use surface::compute_surface_rates;
#[cfg(test)]
pub use surface::{INFINITE, Side, Topology, safe_divide};
