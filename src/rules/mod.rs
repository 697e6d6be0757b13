pub(crate) mod rules_errors;
pub(crate) mod rules_model;
pub(crate) mod rules_registry;
pub(crate) mod rules_service;
pub(crate) mod rules_traits;

#[cfg(test)]
mod rules_service_tests;

pub use rules_errors::RuleDefinitionError;
pub use rules_model::{
    ActionType, CoachingAction, Comparator, MetricField, Priority, Rule, RuleCondition,
    RulePredicate,
};
pub use rules_registry::{default_rules, RuleRegistry};
pub use rules_service::RuleEngine;
pub use rules_traits::RuleEngineTrait;
