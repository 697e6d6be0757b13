use rust_decimal_macros::dec;
use serde_json::json;
use std::str::FromStr;

use crate::rules::rules_errors::RuleDefinitionError;
use crate::rules::rules_model::{
    template_fields, ActionType, Comparator, MetricField, Priority, Rule, RuleCondition,
};

/// Holds the validated, ordered rule set.
///
/// Validation happens here, at registration: a rule whose template
/// references an unknown metric field, or whose id collides, is rejected
/// and never stored. Evaluation order is registration order.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the standard coaching rule set.
    pub fn with_default_rules() -> Result<Self, RuleDefinitionError> {
        let mut registry = Self::new();
        for rule in default_rules() {
            registry.register(rule)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, rule: Rule) -> Result<(), RuleDefinitionError> {
        if rule.id.trim().is_empty() {
            return Err(RuleDefinitionError::EmptyRuleId);
        }
        if self.rules.iter().any(|existing| existing.id == rule.id) {
            return Err(RuleDefinitionError::DuplicateRuleId { rule_id: rule.id });
        }
        for field in template_fields(&rule.message_template) {
            if MetricField::from_str(field).is_err() {
                return Err(RuleDefinitionError::UnknownTemplateField {
                    rule_id: rule.id.clone(),
                    field: field.to_string(),
                });
            }
        }

        self.rules.push(rule);
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The standard coaching rules: turnover, holding period and FOMO checks,
/// plus sector-concentration and cash-floor guards.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "R-001".to_string(),
            title: "Excessive turnover".to_string(),
            priority: Priority::High,
            action_type: ActionType::Warning,
            condition: RuleCondition::Threshold {
                field: MetricField::TurnoverRate,
                comparator: Comparator::GreaterThan,
                threshold: dec!(60),
            },
            message_template:
                "Turnover of {turnover_rate}% is far above a healthy pace. Slow down before the next trade."
                    .to_string(),
            recommendation: json!({
                "cashRatio": 0.2,
                "tradingSuspensionDays": 3
            }),
            expected_impact: json!({
                "turnoverReduction": -30.0,
                "costSaving": 0.04
            }),
            executable: true,
        },
        Rule {
            id: "R-002".to_string(),
            title: "Short-term trading pattern".to_string(),
            priority: Priority::High,
            action_type: ActionType::GoalSetting,
            condition: RuleCondition::Threshold {
                field: MetricField::AvgHoldingPeriodDays,
                comparator: Comparator::LessThan,
                threshold: dec!(7),
            },
            message_template:
                "An average holding period of {avg_holding_period_days} days is very short. Aim for at least a week."
                    .to_string(),
            recommendation: json!({
                "minHoldingDays": 7,
                "stopLoss": -0.07,
                "takeProfit": 0.15
            }),
            expected_impact: json!({
                "holdingPeriodIncrease": 50.0,
                "winRateImprovement": 20.0
            }),
            executable: true,
        },
        Rule {
            id: "R-003".to_string(),
            title: "Chasing rallies".to_string(),
            priority: Priority::Medium,
            action_type: ActionType::HabitCorrection,
            condition: RuleCondition::Threshold {
                field: MetricField::FomoPurchaseCount,
                comparator: Comparator::GreaterThan,
                threshold: dec!(10),
            },
            message_template:
                "{fomo_purchase_count} purchases came right after sharp run-ups. Add a cooling-off period."
                    .to_string(),
            recommendation: json!({
                "coolingPeriodHours": 24,
                "priceAlertThreshold": 0.03
            }),
            expected_impact: json!({
                "fomoReduction": -50.0,
                "entryPriceImprovement": 3.0
            }),
            executable: false,
        },
        Rule {
            id: "R-004".to_string(),
            title: "Concentrated portfolio".to_string(),
            priority: Priority::Medium,
            action_type: ActionType::Warning,
            condition: RuleCondition::Threshold {
                field: MetricField::SectorConcentrationMax,
                comparator: Comparator::GreaterThan,
                threshold: dec!(0.3),
            },
            message_template:
                "A single sector makes up {sector_concentration_max} of traded value. Spread new buys across sectors."
                    .to_string(),
            recommendation: json!({
                "maxSectorWeight": 0.3
            }),
            expected_impact: json!({
                "volatilityReduction": -10.0
            }),
            executable: true,
        },
        Rule {
            id: "R-005".to_string(),
            title: "Cash buffer too thin".to_string(),
            priority: Priority::Low,
            action_type: ActionType::GoalSetting,
            condition: RuleCondition::Threshold {
                field: MetricField::CashRatio,
                comparator: Comparator::LessThan,
                threshold: dec!(0.1),
            },
            message_template:
                "Cash is only {cash_ratio} of capital. Keep a buffer for drawdowns.".to_string(),
            recommendation: json!({
                "minCashRatio": 0.1
            }),
            expected_impact: json!({
                "drawdownReduction": -5.0
            }),
            executable: false,
        },
    ]
}
