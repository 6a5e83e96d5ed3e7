//! Enumeration types for the BlockEx Trade API.
//!
//! Each enum appears on the wire in two shapes: a string value in query
//! parameters (`Limit`, `Bid`, ...) and an integer code in order payloads.
//! `as_str` gives the query form; serde handles the integer form.

use std::fmt;

use serde_repr::{Deserialize_repr, Serialize_repr};

/// Execution style of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum OrderType {
    /// Execute at the given price or better
    Limit = 1,
    /// Execute immediately at the current market price
    Market = 2,
    /// Becomes a market order when the stop price is reached
    Stop = 3,
}

impl OrderType {
    /// Query-string value for this order type.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "Limit",
            OrderType::Market => "Market",
            OrderType::Stop => "Stop",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of a trade: bid (buy) or ask (sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum OfferType {
    /// Buy side
    Bid = 1,
    /// Sell side
    Ask = 2,
}

impl OfferType {
    /// Query-string value for this offer type.
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferType::Bid => "Bid",
            OfferType::Ask => "Ask",
        }
    }
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum OrderStatus {
    /// Accepted but not yet on the book
    Pending = 10,
    /// Placement failed
    Failed = 15,
    /// Live on the book
    Placed = 20,
    /// Rejected by the venue
    Rejected = 30,
    /// Cancelled by the trader
    Cancelled = 40,
    /// Some quantity executed, remainder still working
    PartiallyExecuted = 50,
    /// Fully executed
    Executed = 60,
}

impl OrderStatus {
    /// Numeric wire code, as used in the comma-separated status filter.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Returns `true` if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Failed
                | OrderStatus::Rejected
                | OrderStatus::Cancelled
                | OrderStatus::Executed
        )
    }

    /// Returns `true` if the order can still (partially) execute.
    pub fn is_working(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Placed | OrderStatus::PartiallyExecuted
        )
    }
}
