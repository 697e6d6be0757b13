use lazy_static::lazy_static;
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::metrics::BehaviorMetrics;

lazy_static! {
    static ref TEMPLATE_PLACEHOLDER: Regex = Regex::new(r"\{([a-z_]+)\}").unwrap();
}

/// Scalar metric addressable by rule conditions and message templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    AvgHoldingPeriodDays,
    TurnoverRate,
    WinRate,
    WinLossRatio,
    LossDelayRate,
    FomoPurchaseCount,
    PortfolioVolatility,
    MaxDrawdown,
    CashRatio,
    SectorConcentrationMax,
    TotalTrades,
    AvgTradeSize,
    RealizedPnl,
    ClosedLotCount,
}

impl MetricField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricField::AvgHoldingPeriodDays => "avg_holding_period_days",
            MetricField::TurnoverRate => "turnover_rate",
            MetricField::WinRate => "win_rate",
            MetricField::WinLossRatio => "win_loss_ratio",
            MetricField::LossDelayRate => "loss_delay_rate",
            MetricField::FomoPurchaseCount => "fomo_purchase_count",
            MetricField::PortfolioVolatility => "portfolio_volatility",
            MetricField::MaxDrawdown => "max_drawdown",
            MetricField::CashRatio => "cash_ratio",
            MetricField::SectorConcentrationMax => "sector_concentration_max",
            MetricField::TotalTrades => "total_trades",
            MetricField::AvgTradeSize => "avg_trade_size",
            MetricField::RealizedPnl => "realized_pnl",
            MetricField::ClosedLotCount => "closed_lot_count",
        }
    }

    /// Reads this field from a metrics snapshot. `None` only for
    /// `cash_ratio` when no capital figure was supplied; a threshold
    /// condition on it does not fire then.
    pub fn value_in(&self, metrics: &BehaviorMetrics) -> Option<Decimal> {
        match self {
            MetricField::AvgHoldingPeriodDays => Some(metrics.avg_holding_period_days),
            MetricField::TurnoverRate => Some(metrics.turnover_rate),
            MetricField::WinRate => Some(metrics.win_rate),
            MetricField::WinLossRatio => Some(metrics.win_loss_ratio),
            MetricField::LossDelayRate => Some(metrics.loss_delay_rate),
            MetricField::FomoPurchaseCount => Some(Decimal::from(metrics.fomo_purchase_count)),
            MetricField::PortfolioVolatility => Some(metrics.portfolio_volatility),
            MetricField::MaxDrawdown => Some(metrics.max_drawdown),
            MetricField::CashRatio => metrics.cash_ratio,
            MetricField::SectorConcentrationMax => Some(
                metrics
                    .sector_concentration
                    .values()
                    .copied()
                    .max()
                    .unwrap_or(Decimal::ZERO),
            ),
            MetricField::TotalTrades => Some(Decimal::from(metrics.total_trades as u64)),
            MetricField::AvgTradeSize => Some(metrics.avg_trade_size),
            MetricField::RealizedPnl => Some(metrics.realized_pnl),
            MetricField::ClosedLotCount => Some(Decimal::from(metrics.closed_lot_count as u64)),
        }
    }
}

impl FromStr for MetricField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg_holding_period_days" => Ok(MetricField::AvgHoldingPeriodDays),
            "turnover_rate" => Ok(MetricField::TurnoverRate),
            "win_rate" => Ok(MetricField::WinRate),
            "win_loss_ratio" => Ok(MetricField::WinLossRatio),
            "loss_delay_rate" => Ok(MetricField::LossDelayRate),
            "fomo_purchase_count" => Ok(MetricField::FomoPurchaseCount),
            "portfolio_volatility" => Ok(MetricField::PortfolioVolatility),
            "max_drawdown" => Ok(MetricField::MaxDrawdown),
            "cash_ratio" => Ok(MetricField::CashRatio),
            "sector_concentration_max" => Ok(MetricField::SectorConcentrationMax),
            "total_trades" => Ok(MetricField::TotalTrades),
            "avg_trade_size" => Ok(MetricField::AvgTradeSize),
            "realized_pnl" => Ok(MetricField::RealizedPnl),
            "closed_lot_count" => Ok(MetricField::ClosedLotCount),
            _ => Err(format!("Unknown metric field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Equal,
}

impl Comparator {
    pub fn compare(&self, value: Decimal, threshold: Decimal) -> bool {
        match self {
            Comparator::GreaterThan => value > threshold,
            Comparator::GreaterOrEqual => value >= threshold,
            Comparator::LessThan => value < threshold,
            Comparator::LessOrEqual => value <= threshold,
            Comparator::Equal => value == threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Warning,
    GoalSetting,
    HabitCorrection,
}

/// Infallible predicate escape hatch for conditions a field/comparator/
/// threshold triple cannot express. Must be free of side effects; the same
/// metrics snapshot may be evaluated concurrently for many investors.
pub type RulePredicate = Arc<dyn Fn(&BehaviorMetrics) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum RuleCondition {
    Threshold {
        field: MetricField,
        comparator: Comparator,
        threshold: Decimal,
    },
    Predicate(RulePredicate),
}

impl RuleCondition {
    pub fn is_met(&self, metrics: &BehaviorMetrics) -> bool {
        match self {
            RuleCondition::Threshold {
                field,
                comparator,
                threshold,
            } => field
                .value_in(metrics)
                .map(|value| comparator.compare(value, *threshold))
                .unwrap_or(false),
            RuleCondition::Predicate(predicate) => predicate(metrics),
        }
    }
}

impl fmt::Debug for RuleCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCondition::Threshold {
                field,
                comparator,
                threshold,
            } => f
                .debug_struct("Threshold")
                .field("field", field)
                .field("comparator", comparator)
                .field("threshold", threshold)
                .finish(),
            RuleCondition::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Declarative coaching rule. Immutable once registered; evaluated
/// independently of every other rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    pub action_type: ActionType,
    pub condition: RuleCondition,
    /// Plain `{field}` placeholders over metric field names.
    pub message_template: String,
    pub recommendation: Value,
    pub expected_impact: Value,
    /// Whether the recommendation can be executed through the brokerage.
    pub executable: bool,
}

/// One triggered rule, rendered for the investor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingAction {
    pub action_id: String,
    pub action_type: ActionType,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub recommendation: Value,
    pub expected_impact: Value,
    pub executable: bool,
}

/// Metric field names referenced by a template's placeholders, in order of
/// appearance. Unknown names are returned as-is for the caller to reject.
pub(crate) fn template_fields(template: &str) -> Vec<&str> {
    TEMPLATE_PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
        .collect()
}

/// Substitutes metric values into a validated template.
pub(crate) fn render_template(template: &str, metrics: &BehaviorMetrics) -> String {
    TEMPLATE_PLACEHOLDER
        .replace_all(template, |caps: &Captures| match MetricField::from_str(&caps[1]) {
            Ok(field) => format_metric(field.value_in(metrics)),
            // Unreachable for registered rules; leave the placeholder visible
            // rather than guessing.
            Err(_) => caps[0].to_string(),
        })
        .into_owned()
}

fn format_metric(value: Option<Decimal>) -> String {
    value
        .unwrap_or(Decimal::ZERO)
        .round_dp(DISPLAY_DECIMAL_PRECISION)
        .normalize()
        .to_string()
}
