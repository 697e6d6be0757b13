pub(crate) mod lot_matcher;
pub(crate) mod metrics_constants;
pub(crate) mod metrics_model;
pub(crate) mod metrics_service;
pub(crate) mod metrics_traits;


pub use lot_matcher::{ClosedLot, LotBook, LotSide, OpenLot};
pub use metrics_constants::*;
pub use metrics_model::{BehaviorMetrics, BehaviorThresholds, InvestorType};
pub use metrics_service::MetricsEngine;
pub use metrics_traits::{MetricsEngineTrait, PriceHistoryProviderTrait};
