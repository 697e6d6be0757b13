use thiserror::Error;

/// Rejection of a rule at registration time. Evaluation never sees a rule
/// that failed these checks, which keeps `evaluate` total.
#[derive(Debug, Error)]
pub enum RuleDefinitionError {
    #[error("rule '{rule_id}': message template references unknown metric field '{field}'")]
    UnknownTemplateField { rule_id: String, field: String },

    #[error("rule '{rule_id}' is already registered")]
    DuplicateRuleId { rule_id: String },

    #[error("rule id cannot be empty")]
    EmptyRuleId,
}

impl From<RuleDefinitionError> for String {
    fn from(error: RuleDefinitionError) -> Self {
        error.to_string()
    }
}
