use crate::metrics::BehaviorMetrics;
use crate::rules::rules_model::CoachingAction;
use crate::rules::rules_registry::RuleRegistry;

/// Trait defining the contract for coaching rule evaluation.
pub trait RuleEngineTrait: Send + Sync {
    fn evaluate(&self, metrics: &BehaviorMetrics, registry: &RuleRegistry)
        -> Vec<CoachingAction>;
}
