use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Behavioral thresholds
///
/// Default values behind `BehaviorThresholds`. Callers with their own
/// product tuning override the struct, not these.

/// Holding horizon separating a "normal" exit from a delayed loss realization
pub const NORMAL_HOLDING_HORIZON_DAYS: i64 = 30;

/// Average holding period below which trading counts as short-term
pub const SHORT_HOLDING_DAYS: Decimal = dec!(7);

/// Fractional price run-up that marks a purchase as chased
pub const FOMO_RUN_UP: Decimal = dec!(0.05);

/// Window before a purchase inspected for a run-up
pub const FOMO_LOOKBACK_DAYS: i64 = 1;

/// Chased purchases per analysis period considered acceptable
pub const FOMO_COUNT_TARGET: u32 = 5;

/// Share of losing lots held past the horizon that signals loss aversion
pub const LOSS_DELAY_THRESHOLD: Decimal = dec!(0.3);

/// Notional-dispersion level above which the portfolio counts as volatile
pub const HIGH_VOLATILITY_THRESHOLD: Decimal = dec!(0.15);

/// Single-sector share of traded notional considered concentrated
pub const SECTOR_CONCENTRATION_THRESHOLD: Decimal = dec!(0.3);

/// Minimum share of capital kept as cash
pub const MIN_CASH_RATIO: Decimal = dec!(0.1);
