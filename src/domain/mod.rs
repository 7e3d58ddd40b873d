//! Domain models for triangular arbitrage.

mod cycle;
mod market;
mod opportunity;
mod snapshot;
mod surface;
mod ticker;

pub use cycle::Cycle;
pub use market::Market;
pub use opportunity::Opportunity;
pub use snapshot::PriceSnapshot;
#[cfg(test)]
pub use snapshot::{ask_key, bid_key};
pub use surface::{Direction, SurfaceRates, SurfaceResult, SwapDirection, SwapStep};
pub use ticker::{MarketInfo, Ticker};
