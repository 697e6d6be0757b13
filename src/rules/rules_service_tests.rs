#[cfg(test)]
mod tests {
    use crate::metrics::BehaviorMetrics;
    use crate::rules::rules_errors::RuleDefinitionError;
    use crate::rules::rules_model::{
        ActionType, Comparator, MetricField, Priority, Rule, RuleCondition,
    };
    use crate::rules::rules_registry::RuleRegistry;
    use crate::rules::rules_service::RuleEngine;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn threshold_rule(
        id: &str,
        field: MetricField,
        comparator: Comparator,
        threshold: Decimal,
        template: &str,
    ) -> Rule {
        Rule {
            id: id.to_string(),
            title: format!("Rule {}", id),
            priority: Priority::High,
            action_type: ActionType::Warning,
            condition: RuleCondition::Threshold {
                field,
                comparator,
                threshold,
            },
            message_template: template.to_string(),
            recommendation: json!({}),
            expected_impact: json!({}),
            executable: false,
        }
    }

    fn metrics_with_turnover(turnover_rate: Decimal) -> BehaviorMetrics {
        BehaviorMetrics {
            turnover_rate,
            ..Default::default()
        }
    }

    #[test]
    fn threshold_is_a_strict_inequality() {
        let mut registry = RuleRegistry::new();
        registry
            .register(threshold_rule(
                "R-T",
                MetricField::TurnoverRate,
                Comparator::GreaterThan,
                dec!(60),
                "Turnover of {turnover_rate}% is too high.",
            ))
            .unwrap();
        let engine = RuleEngine::new();

        let actions = engine.evaluate(&metrics_with_turnover(dec!(61)), &registry);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].description, "Turnover of 61% is too high.");
        assert!(actions[0].action_id.starts_with("R-T-"));
        assert_eq!(actions[0].action_id.len(), "R-T-".len() + 8);

        let actions = engine.evaluate(&metrics_with_turnover(dec!(60)), &registry);
        assert!(actions.is_empty());
    }

    #[test]
    fn no_matches_returns_empty_list() {
        let engine = RuleEngine::new();
        let actions = engine.evaluate(&BehaviorMetrics::default(), &RuleRegistry::new());
        assert!(actions.is_empty());

        let mut registry = RuleRegistry::new();
        registry
            .register(threshold_rule(
                "R-T",
                MetricField::TurnoverRate,
                Comparator::GreaterThan,
                dec!(60),
                "Too high.",
            ))
            .unwrap();
        let actions = engine.evaluate(&BehaviorMetrics::default(), &registry);
        assert!(actions.is_empty());
    }

    #[test]
    fn unknown_template_field_is_rejected_at_registration() {
        let mut registry = RuleRegistry::new();
        registry
            .register(threshold_rule(
                "R-OK",
                MetricField::TurnoverRate,
                Comparator::GreaterThan,
                dec!(60),
                "Turnover {turnover_rate}%.",
            ))
            .unwrap();

        let err = registry
            .register(threshold_rule(
                "R-BAD",
                MetricField::WinRate,
                Comparator::LessThan,
                dec!(0.5),
                "Your {wim_rate} slipped.",
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            RuleDefinitionError::UnknownTemplateField { ref field, .. } if field == "wim_rate"
        ));

        // The bad rule was never stored; the valid one still evaluates.
        assert_eq!(registry.len(), 1);
        let engine = RuleEngine::new();
        let actions = engine.evaluate(&metrics_with_turnover(dec!(70)), &registry);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title, "Rule R-OK");
    }

    #[test]
    fn duplicate_and_empty_ids_are_rejected() {
        let mut registry = RuleRegistry::new();
        registry
            .register(threshold_rule(
                "R-1",
                MetricField::TurnoverRate,
                Comparator::GreaterThan,
                dec!(60),
                "Too high.",
            ))
            .unwrap();

        let err = registry
            .register(threshold_rule(
                "R-1",
                MetricField::WinRate,
                Comparator::LessThan,
                dec!(0.5),
                "Low.",
            ))
            .unwrap_err();
        assert!(matches!(err, RuleDefinitionError::DuplicateRuleId { .. }));

        let err = registry
            .register(threshold_rule(
                "  ",
                MetricField::WinRate,
                Comparator::LessThan,
                dec!(0.5),
                "Low.",
            ))
            .unwrap_err();
        assert!(matches!(err, RuleDefinitionError::EmptyRuleId));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn actions_come_out_in_registration_order() {
        let mut registry = RuleRegistry::new();
        registry
            .register(threshold_rule(
                "R-LOW",
                MetricField::TurnoverRate,
                Comparator::GreaterThan,
                dec!(10),
                "Over ten.",
            ))
            .unwrap();
        registry
            .register(threshold_rule(
                "R-HIGH",
                MetricField::TurnoverRate,
                Comparator::GreaterThan,
                dec!(50),
                "Over fifty.",
            ))
            .unwrap();

        let engine = RuleEngine::new();
        let actions = engine.evaluate(&metrics_with_turnover(dec!(70)), &registry);
        assert_eq!(actions.len(), 2);
        assert!(actions[0].action_id.starts_with("R-LOW-"));
        assert!(actions[1].action_id.starts_with("R-HIGH-"));
    }

    #[test]
    fn cash_ratio_rule_is_excluded_without_capital() {
        let mut registry = RuleRegistry::new();
        registry
            .register(threshold_rule(
                "R-CASH",
                MetricField::CashRatio,
                Comparator::LessThan,
                dec!(0.1),
                "Cash is {cash_ratio} of capital.",
            ))
            .unwrap();
        let engine = RuleEngine::new();

        let actions = engine.evaluate(&BehaviorMetrics::default(), &registry);
        assert!(actions.is_empty());

        let metrics = BehaviorMetrics {
            cash_ratio: Some(dec!(0.05)),
            ..Default::default()
        };
        let actions = engine.evaluate(&metrics, &registry);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].description, "Cash is 0.05 of capital.");
    }

    #[test]
    fn predicate_conditions_are_supported() {
        let mut registry = RuleRegistry::new();
        registry
            .register(Rule {
                id: "R-PRED".to_string(),
                title: "Churning at a loss".to_string(),
                priority: Priority::High,
                action_type: ActionType::Warning,
                condition: RuleCondition::Predicate(Arc::new(|metrics: &BehaviorMetrics| {
                    metrics.turnover_rate > dec!(50) && metrics.win_rate < dec!(0.4)
                })),
                message_template: "High turnover with a win rate of {win_rate}.".to_string(),
                recommendation: json!({}),
                expected_impact: json!({}),
                executable: false,
            })
            .unwrap();
        let engine = RuleEngine::new();

        let metrics = BehaviorMetrics {
            turnover_rate: dec!(80),
            win_rate: dec!(0.3),
            ..Default::default()
        };
        assert_eq!(engine.evaluate(&metrics, &registry).len(), 1);

        let metrics = BehaviorMetrics {
            turnover_rate: dec!(80),
            win_rate: dec!(0.6),
            ..Default::default()
        };
        assert!(engine.evaluate(&metrics, &registry).is_empty());
    }

    #[test]
    fn default_rules_fire_on_their_trigger_metrics() {
        let registry = RuleRegistry::with_default_rules().unwrap();
        let engine = RuleEngine::new();

        let metrics = BehaviorMetrics {
            turnover_rate: dec!(80),
            avg_holding_period_days: dec!(3.5),
            fomo_purchase_count: 15,
            sector_concentration: HashMap::from([("Tech".to_string(), dec!(0.2))]),
            ..Default::default()
        };
        let actions = engine.evaluate(&metrics, &registry);
        let ids: Vec<&str> = actions
            .iter()
            .map(|action| action.action_id.rsplit_once('-').map_or("", |(id, _)| id))
            .collect();
        assert_eq!(ids, vec!["R-001", "R-002", "R-003"]);
        assert_eq!(actions[0].priority, Priority::High);
        assert_eq!(actions[2].action_type, ActionType::HabitCorrection);
        assert!(actions[0].executable);
        assert!(!actions[2].executable);
    }
}
