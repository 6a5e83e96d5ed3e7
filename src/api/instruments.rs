//! Instruments service for instrument metadata.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::Instrument;
use crate::Result;

/// Service for instrument metadata operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: blockex_rs::BlockExClient) -> blockex_rs::Result<()> {
/// let instruments = client.instruments().trader().await?;
/// for instrument in &instruments {
///     println!("{} (min order {})", instrument.name, instrument.min_order_amount);
/// }
/// # Ok(())
/// # }
/// ```
pub struct InstrumentsService {
    inner: Arc<ClientInner>,
}

impl InstrumentsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Instruments available to the authenticated trader.
    pub async fn trader(&self) -> Result<Vec<Instrument>> {
        self.inner.get("api/orders/traderinstruments").await
    }

    /// Instruments available to the partner. This is a public endpoint
    /// keyed by the partner API identifier; no authentication round-trip
    /// happens.
    pub async fn partner(&self) -> Result<Vec<Instrument>> {
        let query_string = serde_html_form::to_string(&[(
            "apiID",
            self.inner.session.credentials().client_id(),
        )])?;
        self.inner
            .get_public(&format!("api/orders/partnerinstruments?{query_string}"))
            .await
    }
}
