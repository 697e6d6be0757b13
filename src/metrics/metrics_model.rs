use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::metrics::metrics_constants::*;

/// Behavioral metrics for one investor, computed from the transaction
/// ledger alone. Immutable value; every field is a deterministic function
/// of the inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorMetrics {
    pub investor_id: String,

    /// Quantity-weighted mean holding period of closed lots, in days.
    pub avg_holding_period_days: Decimal,
    /// Traded notional relative to capital, as a percentage.
    pub turnover_rate: Decimal,
    /// Fraction of closed lots with positive realized P&L.
    pub win_rate: Decimal,
    /// Mean winning-lot P&L over mean losing-lot loss; 0 when either side is empty.
    pub win_loss_ratio: Decimal,
    /// Fraction of losing lots held past the normal horizon before closing.
    pub loss_delay_rate: Decimal,
    /// Buys executed right after a sharp run-up, per the price-history
    /// collaborator; 0 without one.
    pub fomo_purchase_count: u32,
    /// Per-sector share of total traded notional. Sums to 1 for a non-empty
    /// ledger; empty map otherwise.
    pub sector_concentration: HashMap<String, Decimal>,
    /// Population standard deviation of per-transaction notional over its
    /// mean. Dispersion proxy; real price-series volatility needs a market
    /// data collaborator.
    pub portfolio_volatility: Decimal,
    /// Largest peak-to-trough decline of cumulative realized P&L, in
    /// currency units.
    pub max_drawdown: Decimal,
    /// 1 minus the share of capital deployed, clamped to [0, 1]. `None`
    /// when the caller supplied no capital figure; rules reading it do not
    /// fire then.
    pub cash_ratio: Option<Decimal>,

    pub total_trades: usize,
    /// Mean per-transaction notional.
    pub avg_trade_size: Decimal,
    /// Sum of closed-lot realized P&L.
    pub realized_pnl: Decimal,
    pub closed_lot_count: usize,
}

/// Qualitative labels derived from the metrics by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestorType {
    ShortTermTrader,
    LossAverse,
    FomoProne,
    Aggressive,
    Balanced,
}

impl InvestorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestorType::ShortTermTrader => "short_term_trader",
            InvestorType::LossAverse => "loss_averse",
            InvestorType::FomoProne => "fomo_prone",
            InvestorType::Aggressive => "aggressive",
            InvestorType::Balanced => "balanced",
        }
    }
}

/// Tuning knobs for metric derivation and investor classification.
#[derive(Debug, Clone)]
pub struct BehaviorThresholds {
    /// Days after which a losing lot's exit counts as delayed.
    pub normal_horizon_days: i64,
    /// Average holding period marking a short-term trader.
    pub short_holding_days: Decimal,
    /// Fractional run-up that makes a purchase chased.
    pub fomo_run_up: Decimal,
    /// Window before a purchase inspected for a run-up.
    pub fomo_lookback: Duration,
    /// Chased purchases tolerated before the FOMO label applies.
    pub fomo_count_target: u32,
    /// Loss-delay rate marking loss aversion.
    pub loss_delay: Decimal,
    /// Dispersion level marking an aggressive portfolio.
    pub high_volatility: Decimal,
    /// Single-sector share considered concentrated.
    pub sector_concentration: Decimal,
    /// Cash floor as a share of capital.
    pub min_cash_ratio: Decimal,
}

impl Default for BehaviorThresholds {
    fn default() -> Self {
        BehaviorThresholds {
            normal_horizon_days: NORMAL_HOLDING_HORIZON_DAYS,
            short_holding_days: SHORT_HOLDING_DAYS,
            fomo_run_up: FOMO_RUN_UP,
            fomo_lookback: Duration::days(FOMO_LOOKBACK_DAYS),
            fomo_count_target: FOMO_COUNT_TARGET,
            loss_delay: LOSS_DELAY_THRESHOLD,
            high_volatility: HIGH_VOLATILITY_THRESHOLD,
            sector_concentration: SECTOR_CONCENTRATION_THRESHOLD,
            min_cash_ratio: MIN_CASH_RATIO,
        }
    }
}
