//! Financial instrument models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tradeable instrument, as configured for a trader or a partner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Venue instrument identifier
    pub id: i64,
    /// Human-readable description
    pub description: String,
    /// Short name of the pair
    pub name: String,
    /// Currency being bid for (for Bitcoin/Euro this is the Bitcoin)
    #[serde(rename = "baseCurrencyID")]
    pub base_currency_id: i64,
    /// Currency paid with (for Bitcoin/Euro this is the Euro)
    #[serde(rename = "quoteCurrencyID")]
    pub quote_currency_id: i64,
    /// Minimum amount accepted for an order; smaller orders are rejected
    pub min_order_amount: Decimal,
    /// Commission fee when trading this instrument, a fraction in [0, 1]
    pub commission_fee_percent: Decimal,
}
