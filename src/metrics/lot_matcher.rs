use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use crate::constants::SECONDS_PER_DAY;
use crate::ledger::{TradeSide, Transaction};

/// Direction of an open or closed lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LotSide {
    Long,
    Short,
}

/// An open quantity of one instrument, waiting to be offset by opposing
/// trades in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenLot {
    pub side: LotSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub opened_at: DateTime<Utc>,
}

/// One fully or partially matched portion of a lot. For long lots the entry
/// is the buy price and the exit the sell price; for short lots the roles
/// swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedLot {
    pub instrument_id: String,
    pub side: LotSide,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub quantity: Decimal,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
}

impl ClosedLot {
    pub fn realized_pnl(&self) -> Decimal {
        match self.side {
            LotSide::Long => (self.exit_price - self.entry_price) * self.quantity,
            LotSide::Short => (self.entry_price - self.exit_price) * self.quantity,
        }
    }

    pub fn holding_period_days(&self) -> Decimal {
        Decimal::from((self.closed_at - self.opened_at).num_seconds())
            / Decimal::from(SECONDS_PER_DAY)
    }
}

/// Per-instrument FIFO lot book.
///
/// A buy first covers open short lots, then opens a long lot for the rest;
/// a sell consumes long lots front to back and opens a short lot for any
/// excess. An instrument's queue therefore only ever holds lots of one side
/// at a time. Closed lots accumulate in the order the closures happen, which
/// is chronological when the ledger is applied in timestamp order.
#[derive(Debug, Default)]
pub struct LotBook {
    open: HashMap<String, VecDeque<OpenLot>>,
    closed: Vec<ClosedLot>,
}

impl LotBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one validated trade to the book.
    pub fn apply(&mut self, transaction: &Transaction, side: TradeSide) {
        let lot_side = match side {
            TradeSide::Buy => LotSide::Long,
            TradeSide::Sell => LotSide::Short,
        };

        let queue = self
            .open
            .entry(transaction.instrument_id.clone())
            .or_default();

        let mut remaining = transaction.quantity;
        while remaining > Decimal::ZERO {
            match queue.front_mut() {
                Some(front) if front.side != lot_side => {
                    let matched = front.quantity.min(remaining);
                    self.closed.push(ClosedLot {
                        instrument_id: transaction.instrument_id.clone(),
                        side: front.side,
                        opened_at: front.opened_at,
                        closed_at: transaction.timestamp,
                        quantity: matched,
                        entry_price: front.price,
                        exit_price: transaction.price,
                    });
                    front.quantity -= matched;
                    remaining -= matched;
                    if front.quantity <= Decimal::ZERO {
                        queue.pop_front();
                    }
                }
                _ => break,
            }
        }

        if remaining > Decimal::ZERO {
            if lot_side == LotSide::Short {
                warn!(
                    "Sell {} exceeds open quantity for {} by {}. Opening a short lot for the excess.",
                    transaction.id, transaction.instrument_id, remaining
                );
            }
            queue.push_back(OpenLot {
                side: lot_side,
                quantity: remaining,
                price: transaction.price,
                opened_at: transaction.timestamp,
            });
        }
    }

    /// Closed-lot records in closure order.
    pub fn closed(&self) -> &[ClosedLot] {
        &self.closed
    }

    /// Entry cost of long lots still open: the capital currently deployed.
    pub fn open_long_notional(&self) -> Decimal {
        self.open
            .values()
            .flatten()
            .filter(|lot| lot.side == LotSide::Long)
            .map(|lot| lot.quantity * lot.price)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn txn(id: &str, day: i64, instrument: &str, side: &str, quantity: Decimal, price: Decimal) -> Transaction {
        Transaction {
            id: id.to_string(),
            investor_id: "inv-1".to_string(),
            instrument_id: instrument.to_string(),
            sector: "Tech".to_string(),
            side: side.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(day),
            quantity,
            price,
        }
    }

    #[test]
    fn round_trip_produces_one_closed_lot() {
        let mut book = LotBook::new();
        book.apply(&txn("t1", 0, "AAA", "BUY", dec!(10), dec!(100)), TradeSide::Buy);
        book.apply(&txn("t2", 7, "AAA", "SELL", dec!(10), dec!(120)), TradeSide::Sell);

        let closed = book.closed();
        assert_eq!(closed.len(), 1);
        let lot = &closed[0];
        assert_eq!(lot.side, LotSide::Long);
        assert_eq!(lot.quantity, dec!(10));
        assert_eq!(lot.entry_price, dec!(100));
        assert_eq!(lot.exit_price, dec!(120));
        assert_eq!(lot.realized_pnl(), dec!(200));
        assert_eq!(lot.holding_period_days(), dec!(7));
        assert_eq!(book.open_long_notional(), Decimal::ZERO);
    }

    #[test]
    fn sell_consumes_lots_in_fifo_order() {
        let mut book = LotBook::new();
        book.apply(&txn("t1", 0, "AAA", "BUY", dec!(10), dec!(100)), TradeSide::Buy);
        book.apply(&txn("t2", 1, "AAA", "BUY", dec!(10), dec!(110)), TradeSide::Buy);
        book.apply(&txn("t3", 5, "AAA", "SELL", dec!(15), dec!(120)), TradeSide::Sell);

        let closed = book.closed();
        assert_eq!(closed.len(), 2);
        assert_eq!(closed[0].entry_price, dec!(100));
        assert_eq!(closed[0].quantity, dec!(10));
        assert_eq!(closed[1].entry_price, dec!(110));
        assert_eq!(closed[1].quantity, dec!(5));
        // 5 units of the second lot remain deployed
        assert_eq!(book.open_long_notional(), dec!(550));
    }

    #[test]
    fn oversell_opens_short_lot_covered_symmetrically() {
        let mut book = LotBook::new();
        book.apply(&txn("t1", 0, "AAA", "BUY", dec!(5), dec!(100)), TradeSide::Buy);
        book.apply(&txn("t2", 2, "AAA", "SELL", dec!(8), dec!(110)), TradeSide::Sell);
        book.apply(&txn("t3", 4, "AAA", "BUY", dec!(3), dec!(90)), TradeSide::Buy);

        let closed = book.closed();
        assert_eq!(closed.len(), 2);

        // The long portion closes against the sell.
        assert_eq!(closed[0].side, LotSide::Long);
        assert_eq!(closed[0].quantity, dec!(5));
        assert_eq!(closed[0].realized_pnl(), dec!(50));

        // The excess became a short lot, covered by the later buy at a profit.
        assert_eq!(closed[1].side, LotSide::Short);
        assert_eq!(closed[1].quantity, dec!(3));
        assert_eq!(closed[1].entry_price, dec!(110));
        assert_eq!(closed[1].exit_price, dec!(90));
        assert_eq!(closed[1].realized_pnl(), dec!(60));
        assert_eq!(book.open_long_notional(), Decimal::ZERO);
    }

    #[test]
    fn instruments_are_tracked_independently() {
        let mut book = LotBook::new();
        book.apply(&txn("t1", 0, "AAA", "BUY", dec!(10), dec!(100)), TradeSide::Buy);
        book.apply(&txn("t2", 1, "BBB", "BUY", dec!(4), dec!(50)), TradeSide::Buy);
        book.apply(&txn("t3", 3, "AAA", "SELL", dec!(10), dec!(90)), TradeSide::Sell);

        assert_eq!(book.closed().len(), 1);
        assert_eq!(book.closed()[0].instrument_id, "AAA");
        assert_eq!(book.open_long_notional(), dec!(200));
    }
}
