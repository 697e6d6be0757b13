/// Trade sides
///
/// The side of an executed trade as delivered by the transaction source.

/// Purchase of an instrument. Opens or extends a long position.
pub const TRADE_SIDE_BUY: &str = "BUY";

/// Disposal of an instrument. Reduces a long position, or opens a short one
/// when it exceeds the open quantity.
pub const TRADE_SIDE_SELL: &str = "SELL";
