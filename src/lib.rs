pub mod constants;
pub mod errors;
pub mod ledger;
pub mod metrics;
pub mod rules;

pub use errors::{Error, Result, ValidationError};
pub use ledger::*;
pub use metrics::*;
pub use rules::*;
