use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::ValidationError;

/// One executed trade, as delivered by the transaction source.
///
/// The side arrives as a loosely-typed string and is parsed when the ledger
/// is consumed; the notional is always derived from quantity and price,
/// never read from the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub sector: String,
    pub side: String,
    pub timestamp: DateTime<Utc>,
    pub quantity: Decimal,
    pub price: Decimal,
}

impl Transaction {
    /// Traded value of this record: quantity times price.
    pub fn notional(&self) -> Decimal {
        self.quantity * self.price
    }

    /// Validates the record and resolves its side. `index` is the record's
    /// position in the ledger as supplied by the caller.
    pub fn validate(&self, index: usize) -> Result<TradeSide, ValidationError> {
        if !self.quantity.is_sign_positive() || self.quantity.is_zero() {
            return Err(ValidationError::NonPositiveQuantity {
                index,
                id: self.id.clone(),
                quantity: self.quantity,
            });
        }
        if !self.price.is_sign_positive() || self.price.is_zero() {
            return Err(ValidationError::NonPositivePrice {
                index,
                id: self.id.clone(),
                price: self.price,
            });
        }
        TradeSide::from_str(&self.side).map_err(|_| ValidationError::UnknownSide {
            index,
            id: self.id.clone(),
            side: self.side.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        use crate::ledger::ledger_constants::*;
        match self {
            TradeSide::Buy => TRADE_SIDE_BUY,
            TradeSide::Sell => TRADE_SIDE_SELL,
        }
    }
}

impl FromStr for TradeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use crate::ledger::ledger_constants::*;
        match s {
            s if s == TRADE_SIDE_BUY => Ok(TradeSide::Buy),
            s if s == TRADE_SIDE_SELL => Ok(TradeSide::Sell),
            _ => Err(format!("Unknown trade side: {}", s)),
        }
    }
}
