//! Orders service for order placement and management.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{NewOrder, OfferType, Order, OrderStatus, OrderType};
use crate::Result;

/// Service for order operations.
///
/// # Example
///
/// ```no_run
/// use blockex_rs::models::{NewOrder, OfferType};
/// use rust_decimal_macros::dec;
///
/// # async fn example(client: blockex_rs::BlockExClient) -> blockex_rs::Result<()> {
/// // Place a limit bid
/// let order = NewOrder::limit(OfferType::Bid, 14, dec!(5.20), dec!(1.0));
/// client.orders().create(&order).await?;
///
/// // List what is working on the book
/// let orders = client.orders().list(None).await?;
/// for order in &orders {
///     println!("{}: {} @ {}", order.order_id, order.quantity, order.price);
/// }
/// # Ok(())
/// # }
/// ```
pub struct OrdersService {
    inner: Arc<ClientInner>,
}

/// Optional filters for listing the trader's orders.
#[derive(Debug, Default, Clone)]
pub struct OrdersQuery {
    /// Restrict to one instrument
    pub instrument_id: Option<i64>,
    /// Restrict to one execution style
    pub order_type: Option<OrderType>,
    /// Restrict to one side of the book
    pub offer_type: Option<OfferType>,
    /// Restrict to these statuses
    pub status: Option<Vec<OrderStatus>>,
    /// Load executed trades for each order
    pub load_executions: Option<bool>,
    /// Maximum number of items returned (venue default 100)
    pub max_count: Option<i32>,
}

impl OrdersQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.instrument_id {
            pairs.push(("instrumentID", id.to_string()));
        }
        if let Some(order_type) = self.order_type {
            pairs.push(("orderType", order_type.as_str().to_string()));
        }
        if let Some(offer_type) = self.offer_type {
            pairs.push(("offerType", offer_type.as_str().to_string()));
        }
        if let Some(statuses) = &self.status {
            pairs.push(("status", status_codes(statuses)));
        }
        if let Some(load) = self.load_executions {
            pairs.push(("loadExecutions", load.to_string()));
        }
        if let Some(max) = self.max_count {
            pairs.push(("maxCount", max.to_string()));
        }
        pairs
    }
}

/// Optional filters for the public market order book query.
#[derive(Debug, Default, Clone)]
pub struct MarketOrdersQuery {
    /// Restrict to one execution style
    pub order_type: Option<OrderType>,
    /// Restrict to one side of the book
    pub offer_type: Option<OfferType>,
    /// Restrict to these statuses
    pub status: Option<Vec<OrderStatus>>,
    /// Maximum number of items returned (venue default 100)
    pub max_count: Option<i32>,
}

impl MarketOrdersQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(order_type) = self.order_type {
            pairs.push(("orderType", order_type.as_str().to_string()));
        }
        if let Some(offer_type) = self.offer_type {
            pairs.push(("offerType", offer_type.as_str().to_string()));
        }
        if let Some(statuses) = &self.status {
            pairs.push(("status", status_codes(statuses)));
        }
        if let Some(max) = self.max_count {
            pairs.push(("maxCount", max.to_string()));
        }
        pairs
    }
}

impl OrdersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List the trader's orders with optional filters.
    pub async fn list(&self, query: Option<OrdersQuery>) -> Result<Vec<Order>> {
        let pairs = query.unwrap_or_default().to_pairs();
        let query_string = serde_html_form::to_string(&pairs)?;
        self.inner
            .get(&format!("api/orders/get?{query_string}"))
            .await
    }

    /// Market orders for an instrument. This is a public endpoint keyed by
    /// the partner API identifier; no authentication round-trip happens.
    pub async fn market(
        &self,
        instrument_id: i64,
        query: Option<MarketOrdersQuery>,
    ) -> Result<Vec<Order>> {
        let mut pairs = vec![
            ("apiID", self.inner.session.credentials().client_id().to_string()),
            ("instrumentID", instrument_id.to_string()),
        ];
        pairs.extend(query.unwrap_or_default().to_pairs());
        let query_string = serde_html_form::to_string(&pairs)?;
        self.inner
            .get_public(&format!("api/orders/getMarketOrders?{query_string}"))
            .await
    }

    /// Place an order.
    pub async fn create(&self, order: &NewOrder) -> Result<()> {
        let pairs = [
            ("offerType", order.offer_type.as_str().to_string()),
            ("orderType", order.order_type.as_str().to_string()),
            ("instrumentID", order.instrument_id.to_string()),
            ("price", order.price.to_string()),
            ("quantity", order.quantity.to_string()),
        ];
        let query_string = serde_html_form::to_string(&pairs)?;
        self.inner
            .post(&format!("api/orders/create?{query_string}"))
            .await
    }

    /// Cancel a specific order.
    pub async fn cancel(&self, order_id: i64) -> Result<()> {
        let query_string = serde_html_form::to_string(&[("orderID", order_id)])?;
        self.inner
            .post(&format!("api/orders/cancel?{query_string}"))
            .await
    }

    /// Cancel all the trader's orders for an instrument.
    pub async fn cancel_all(&self, instrument_id: i64) -> Result<()> {
        let query_string = serde_html_form::to_string(&[("instrumentID", instrument_id)])?;
        self.inner
            .post(&format!("api/orders/cancelall?{query_string}"))
            .await
    }
}

/// Comma-separated numeric codes for a status filter.
fn status_codes(statuses: &[OrderStatus]) -> String {
    statuses
        .iter()
        .map(|status| status.code().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
