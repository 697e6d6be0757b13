use rust_decimal::Decimal;
use thiserror::Error;

use crate::rules::RuleDefinitionError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the coaching core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Rule definition rejected: {0}")]
    RuleDefinition(#[from] RuleDefinitionError),
}

/// Malformed ledger input. The offending record is identified by its index
/// in the ledger as supplied by the caller, before any sorting.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("transaction {index} ({id}): quantity must be positive, got {quantity}")]
    NonPositiveQuantity {
        index: usize,
        id: String,
        quantity: Decimal,
    },

    #[error("transaction {index} ({id}): price must be positive, got {price}")]
    NonPositivePrice {
        index: usize,
        id: String,
        price: Decimal,
    },

    #[error("transaction {index} ({id}): unknown trade side '{side}'")]
    UnknownSide {
        index: usize,
        id: String,
        side: String,
    },

    #[error("capital must be positive, got {capital}")]
    NonPositiveCapital { capital: Decimal },
}
