use log::debug;
use uuid::Uuid;

use crate::constants::ACTION_ID_SUFFIX_LEN;
use crate::metrics::BehaviorMetrics;
use crate::rules::rules_model::{render_template, CoachingAction, Rule};
use crate::rules::rules_registry::RuleRegistry;
use crate::rules::rules_traits::RuleEngineTrait;

/// Evaluates a registered rule set against a metrics snapshot.
///
/// Stateless and total: every rule is checked independently in
/// registration order against the same immutable snapshot, and a run with
/// no matches returns an empty list, never an error. Callers wanting a
/// priority ordering re-sort the result themselves.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        RuleEngine
    }

    pub fn evaluate(
        &self,
        metrics: &BehaviorMetrics,
        registry: &RuleRegistry,
    ) -> Vec<CoachingAction> {
        let mut actions = Vec::new();
        for rule in registry.rules() {
            if rule.condition.is_met(metrics) {
                debug!(
                    "Rule {} triggered for investor {}",
                    rule.id, metrics.investor_id
                );
                actions.push(build_action(rule, metrics));
            }
        }
        actions
    }
}

fn build_action(rule: &Rule, metrics: &BehaviorMetrics) -> CoachingAction {
    let suffix = Uuid::new_v4().simple().to_string();
    CoachingAction {
        action_id: format!("{}-{}", rule.id, &suffix[..ACTION_ID_SUFFIX_LEN]),
        action_type: rule.action_type,
        priority: rule.priority,
        title: rule.title.clone(),
        description: render_template(&rule.message_template, metrics),
        recommendation: rule.recommendation.clone(),
        expected_impact: rule.expected_impact.clone(),
        executable: rule.executable,
    }
}

impl RuleEngineTrait for RuleEngine {
    fn evaluate(
        &self,
        metrics: &BehaviorMetrics,
        registry: &RuleRegistry,
    ) -> Vec<CoachingAction> {
        RuleEngine::evaluate(self, metrics, registry)
    }
}
