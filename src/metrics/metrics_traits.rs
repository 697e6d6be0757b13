use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::ledger::Transaction;
use crate::metrics::metrics_model::{BehaviorMetrics, InvestorType};

/// Optional collaborator supplying price history for FOMO detection.
///
/// Implementations resolve any I/O before `compute` is called; this trait
/// answers from already-fetched data.
pub trait PriceHistoryProviderTrait: Send + Sync {
    /// Fractional price change of `instrument_id` over the `lookback`
    /// window ending at `at`. `None` when no history covers the window.
    fn run_up(
        &self,
        instrument_id: &str,
        at: DateTime<Utc>,
        lookback: Duration,
    ) -> Option<Decimal>;
}

/// Trait defining the contract for behavioral metric computation.
pub trait MetricsEngineTrait: Send + Sync {
    fn compute(
        &self,
        ledger: &[Transaction],
        capital: Option<Decimal>,
    ) -> Result<BehaviorMetrics>;

    fn classify(&self, metrics: &BehaviorMetrics) -> Vec<InvestorType>;
}
