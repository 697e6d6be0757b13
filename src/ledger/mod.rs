pub(crate) mod ledger_constants;
pub(crate) mod ledger_model;

pub use ledger_constants::*;
pub use ledger_model::{Transaction, TradeSide};
