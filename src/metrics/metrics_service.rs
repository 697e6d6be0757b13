use log::debug;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::DECIMAL_PRECISION;
use crate::errors::{Result, ValidationError};
use crate::ledger::{TradeSide, Transaction};
use crate::metrics::lot_matcher::{ClosedLot, LotBook};
use crate::metrics::metrics_model::{BehaviorMetrics, BehaviorThresholds, InvestorType};
use crate::metrics::metrics_traits::{MetricsEngineTrait, PriceHistoryProviderTrait};

/// Computes behavioral metrics from one investor's transaction ledger.
///
/// Stateless; collaborators are injected at construction. Every metric is a
/// pure function of the ledger, the capital figure, and the price history,
/// so concurrent `compute` calls need no coordination.
#[derive(Clone)]
pub struct MetricsEngine {
    thresholds: BehaviorThresholds,
    price_history: Option<Arc<dyn PriceHistoryProviderTrait>>,
}

impl MetricsEngine {
    pub fn new(
        thresholds: BehaviorThresholds,
        price_history: Option<Arc<dyn PriceHistoryProviderTrait>>,
    ) -> Self {
        Self {
            thresholds,
            price_history,
        }
    }

    /// Computes the metrics snapshot for `ledger`.
    ///
    /// Never fails for a well-formed (possibly empty) ledger. Malformed
    /// records fail the whole call with the offending input index; nothing
    /// is skipped or coerced.
    pub fn compute(
        &self,
        ledger: &[Transaction],
        capital: Option<Decimal>,
    ) -> Result<BehaviorMetrics> {
        if let Some(capital) = capital {
            if !capital.is_sign_positive() || capital.is_zero() {
                return Err(ValidationError::NonPositiveCapital { capital }.into());
            }
        }

        let mut entries: Vec<(&Transaction, TradeSide)> = Vec::with_capacity(ledger.len());
        for (index, transaction) in ledger.iter().enumerate() {
            let side = transaction.validate(index)?;
            entries.push((transaction, side));
        }

        if entries.is_empty() {
            debug!("Empty ledger; returning default metrics");
            return Ok(BehaviorMetrics::default());
        }

        let investor_id = entries[0].0.investor_id.clone();
        debug!(
            "Computing behavior metrics for investor {} over {} transactions",
            investor_id,
            entries.len()
        );

        // Defensive ordering: stable sort by timestamp, ties keep input order.
        entries.sort_by_key(|(transaction, _)| transaction.timestamp);

        let mut book = LotBook::new();
        for (transaction, side) in &entries {
            book.apply(transaction, *side);
        }
        let closed = book.closed();

        let total_trades = ledger.len();
        let total_notional: Decimal = ledger.iter().map(|t| t.notional()).sum();
        let avg_trade_size = total_notional / Decimal::from(total_trades as u64);

        let turnover_denominator = capital.unwrap_or(total_notional);
        let turnover_rate = if turnover_denominator.is_zero() {
            Decimal::ZERO
        } else {
            total_notional / turnover_denominator * dec!(100)
        };

        let mut sector_notional: HashMap<String, Decimal> = HashMap::new();
        for transaction in ledger {
            *sector_notional
                .entry(transaction.sector.clone())
                .or_insert(Decimal::ZERO) += transaction.notional();
        }
        let sector_concentration: HashMap<String, Decimal> = sector_notional
            .into_iter()
            .map(|(sector, notional)| {
                (sector, (notional / total_notional).round_dp(DECIMAL_PRECISION))
            })
            .collect();

        let matched_quantity: Decimal = closed.iter().map(|lot| lot.quantity).sum();
        let avg_holding_period_days = if matched_quantity.is_zero() {
            Decimal::ZERO
        } else {
            closed
                .iter()
                .map(|lot| lot.holding_period_days() * lot.quantity)
                .sum::<Decimal>()
                / matched_quantity
        };

        let wins: Vec<&ClosedLot> = closed
            .iter()
            .filter(|lot| lot.realized_pnl() > Decimal::ZERO)
            .collect();
        let losses: Vec<&ClosedLot> = closed
            .iter()
            .filter(|lot| lot.realized_pnl() < Decimal::ZERO)
            .collect();

        let win_rate = if closed.is_empty() {
            Decimal::ZERO
        } else {
            Decimal::from(wins.len() as u64) / Decimal::from(closed.len() as u64)
        };

        let win_loss_ratio = if wins.is_empty() || losses.is_empty() {
            Decimal::ZERO
        } else {
            let avg_win: Decimal = wins.iter().map(|lot| lot.realized_pnl()).sum::<Decimal>()
                / Decimal::from(wins.len() as u64);
            let avg_loss: Decimal = losses
                .iter()
                .map(|lot| lot.realized_pnl().abs())
                .sum::<Decimal>()
                / Decimal::from(losses.len() as u64);
            avg_win / avg_loss
        };

        let normal_horizon = Decimal::from(self.thresholds.normal_horizon_days);
        let loss_delay_rate = if losses.is_empty() {
            Decimal::ZERO
        } else {
            let delayed = losses
                .iter()
                .filter(|lot| lot.holding_period_days() > normal_horizon)
                .count();
            Decimal::from(delayed as u64) / Decimal::from(losses.len() as u64)
        };

        let realized_pnl: Decimal = closed.iter().map(|lot| lot.realized_pnl()).sum();
        let max_drawdown = Self::calculate_max_drawdown(closed);
        let portfolio_volatility = Self::calculate_notional_dispersion(ledger, total_notional);
        let fomo_purchase_count = self.count_fomo_purchases(&entries);

        let cash_ratio = capital.map(|capital| {
            let deployed = book.open_long_notional();
            (Decimal::ONE - deployed / capital).clamp(Decimal::ZERO, Decimal::ONE)
        });

        Ok(BehaviorMetrics {
            investor_id,
            avg_holding_period_days: avg_holding_period_days.round_dp(DECIMAL_PRECISION),
            turnover_rate: turnover_rate.round_dp(DECIMAL_PRECISION),
            win_rate: win_rate.round_dp(DECIMAL_PRECISION),
            win_loss_ratio: win_loss_ratio.round_dp(DECIMAL_PRECISION),
            loss_delay_rate: loss_delay_rate.round_dp(DECIMAL_PRECISION),
            fomo_purchase_count,
            sector_concentration,
            portfolio_volatility: portfolio_volatility.round_dp(DECIMAL_PRECISION),
            max_drawdown: max_drawdown.round_dp(DECIMAL_PRECISION),
            cash_ratio: cash_ratio.map(|ratio| ratio.round_dp(DECIMAL_PRECISION)),
            total_trades,
            avg_trade_size: avg_trade_size.round_dp(DECIMAL_PRECISION),
            realized_pnl: realized_pnl.round_dp(DECIMAL_PRECISION),
            closed_lot_count: closed.len(),
        })
    }

    /// Threshold labels for the investor behind a metrics snapshot.
    pub fn classify(&self, metrics: &BehaviorMetrics) -> Vec<InvestorType> {
        let mut types = Vec::new();

        if metrics.closed_lot_count > 0
            && metrics.avg_holding_period_days < self.thresholds.short_holding_days
        {
            types.push(InvestorType::ShortTermTrader);
        }
        if metrics.loss_delay_rate > self.thresholds.loss_delay {
            types.push(InvestorType::LossAverse);
        }
        if metrics.fomo_purchase_count > self.thresholds.fomo_count_target {
            types.push(InvestorType::FomoProne);
        }
        if metrics.portfolio_volatility > self.thresholds.high_volatility {
            types.push(InvestorType::Aggressive);
        }

        if types.is_empty() {
            types.push(InvestorType::Balanced);
        }
        types
    }

    fn count_fomo_purchases(&self, entries: &[(&Transaction, TradeSide)]) -> u32 {
        let provider = match &self.price_history {
            Some(provider) => provider,
            None => {
                debug!("No price history provider; FOMO purchase count degrades to 0");
                return 0;
            }
        };

        entries
            .iter()
            .filter(|(_, side)| *side == TradeSide::Buy)
            .filter(|(transaction, _)| {
                provider
                    .run_up(
                        &transaction.instrument_id,
                        transaction.timestamp,
                        self.thresholds.fomo_lookback,
                    )
                    .map(|run_up| run_up > self.thresholds.fomo_run_up)
                    .unwrap_or(false)
            })
            .count() as u32
    }

    /// Largest peak-to-trough decline of cumulative realized P&L, walking
    /// closures in chronological order.
    fn calculate_max_drawdown(closed: &[ClosedLot]) -> Decimal {
        let mut cumulative = Decimal::ZERO;
        let mut peak = Decimal::ZERO;
        let mut max_drawdown = Decimal::ZERO;

        for lot in closed {
            cumulative += lot.realized_pnl();
            peak = peak.max(cumulative);
            max_drawdown = max_drawdown.max(peak - cumulative);
        }

        max_drawdown
    }

    /// Population standard deviation of per-transaction notional over its
    /// mean. Stands in for price-series volatility, which would need a
    /// market data collaborator.
    fn calculate_notional_dispersion(ledger: &[Transaction], total_notional: Decimal) -> Decimal {
        if ledger.len() < 2 {
            return Decimal::ZERO;
        }

        let count = Decimal::from(ledger.len() as u64);
        let mean = total_notional / count;
        if mean.is_zero() {
            return Decimal::ZERO;
        }

        let sum_squared_diff: Decimal = ledger
            .iter()
            .map(|transaction| {
                let diff = transaction.notional() - mean;
                diff * diff
            })
            .sum();

        let variance = sum_squared_diff / count;
        variance.sqrt().unwrap_or(Decimal::ZERO) / mean
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(BehaviorThresholds::default(), None)
    }
}

impl MetricsEngineTrait for MetricsEngine {
    fn compute(
        &self,
        ledger: &[Transaction],
        capital: Option<Decimal>,
    ) -> Result<BehaviorMetrics> {
        MetricsEngine::compute(self, ledger, capital)
    }

    fn classify(&self, metrics: &BehaviorMetrics) -> Vec<InvestorType> {
        MetricsEngine::classify(self, metrics)
    }
}
