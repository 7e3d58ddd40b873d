//! Running totals across scans.

use rust_decimal::Decimal;

/// Running totals across scans.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub scans: u64,
    pub failed_scans: u64,
    pub cycles_evaluated: u64,
    pub opportunities_detected: u64,
    /// Highest arbitrage rate seen in any direction, profitable or not.
    pub best_rate: Option<Decimal>,
}
