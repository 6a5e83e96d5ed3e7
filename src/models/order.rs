//! Order models and wire-format coercions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OfferType, OrderStatus, OrderType};

/// An order as returned by the venue.
///
/// The venue serializes the order identifier as a string and decimal
/// quantities as either strings or bare numbers; deserialization coerces
/// them into numeric types without a detour through binary floats, so
/// `"13.40"` stays exactly 13.40.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Venue-assigned order identifier
    #[serde(rename = "orderID", with = "string_or_int")]
    pub order_id: i64,
    /// Limit/stop price
    pub price: Decimal,
    /// Quantity at placement time
    pub initial_quantity: Decimal,
    /// Remaining quantity
    pub quantity: Decimal,
    /// Creation time reported by the venue
    pub date_created: DateTime<Utc>,
    /// Side of the book
    pub offer_type: OfferType,
    /// Execution style
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Instrument the order trades
    #[serde(rename = "instrumentID")]
    pub instrument_id: i64,
    /// Executed trades, present when the query asked for executions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trades: Option<Vec<serde_json::Value>>,
}

/// Parameters for placing a new order.
///
/// # Example
///
/// ```
/// use blockex_rs::models::{NewOrder, OfferType, OrderType};
/// use rust_decimal_macros::dec;
///
/// let order = NewOrder::limit(OfferType::Bid, 14, dec!(5.20), dec!(1.0));
/// assert_eq!(order.order_type, OrderType::Limit);
/// ```
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Side of the book
    pub offer_type: OfferType,
    /// Execution style
    pub order_type: OrderType,
    /// Instrument to trade
    pub instrument_id: i64,
    /// Price
    pub price: Decimal,
    /// Quantity
    pub quantity: Decimal,
}

impl NewOrder {
    /// Convenience constructor for a limit order.
    pub fn limit(
        offer_type: OfferType,
        instrument_id: i64,
        price: Decimal,
        quantity: Decimal,
    ) -> Self {
        Self {
            offer_type,
            order_type: OrderType::Limit,
            instrument_id,
            price,
            quantity,
        }
    }

    /// Convenience constructor for a market order.
    pub fn market(
        offer_type: OfferType,
        instrument_id: i64,
        price: Decimal,
        quantity: Decimal,
    ) -> Self {
        Self {
            offer_type,
            order_type: OrderType::Market,
            instrument_id,
            price,
            quantity,
        }
    }
}

/// Venue identifiers arrive as JSON strings but are integral. Accept both
/// forms and serialize back as a string, matching the wire format.
mod string_or_int {
    use std::fmt;

    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        struct StringOrInt;

        impl Visitor<'_> for StringOrInt {
            type Value = i64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a string holding one")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
                Ok(v)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
                i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
                v.parse()
                    .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(StringOrInt)
    }
}
