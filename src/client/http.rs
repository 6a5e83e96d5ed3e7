//! HTTP client implementation for the BlockEx Trade API.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::api::{InstrumentsService, OrdersService};
use crate::auth::{Credentials, RawResponse, Session};
use crate::{Error, Result};

use super::config::ClientConfig;

/// The main client for interacting with the BlockEx Trade API.
///
/// The client provides access to the endpoint services and owns the
/// [`Session`] that keeps authorized calls supplied with a valid bearer
/// token. Calls through the services may therefore log the trader in (or
/// back in) as a side effect; see [`Session::execute_authorized`].
///
/// # Example
///
/// ```no_run
/// use blockex_rs::{BlockExClient, Credentials};
///
/// # async fn example() -> blockex_rs::Result<()> {
/// let credentials = Credentials::new(
///     "https://api.blockex.example/",
///     "your-api-id",
///     "username",
///     "password",
/// )?;
/// let client = BlockExClient::new(credentials)?;
///
/// // Login happens lazily on the first authorized call
/// let instruments = client.instruments().trader().await?;
/// println!("{} instruments available", instruments.len());
/// # Ok(())
/// # }
/// ```
pub struct BlockExClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) session: Session,
    pub(crate) http: reqwest::Client,
    pub(crate) config: ClientConfig,
}

impl BlockExClient {
    /// Create a client with the default configuration.
    ///
    /// No network traffic happens here; the session logs in lazily on the
    /// first authorized call, or eagerly via [`login`](Self::login).
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a client with a custom transport configuration.
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        let session = Session::with_http_client(credentials, http.clone());

        Ok(Self {
            inner: Arc::new(ClientInner {
                session,
                http,
                config,
            }),
        })
    }

    /// Log in eagerly, returning the issued access token.
    pub async fn login(&self) -> Result<String> {
        self.inner.session.login().await
    }

    /// Log out and clear the held token. A no-op when not logged in.
    pub async fn logout(&self) -> Result<()> {
        self.inner.session.logout().await
    }

    /// Get the orders service.
    pub fn orders(&self) -> OrdersService {
        OrdersService::new(self.inner.clone())
    }

    /// Get the instruments service.
    pub fn instruments(&self) -> InstrumentsService {
        InstrumentsService::new(self.inner.clone())
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }
}

impl Clone for BlockExClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for BlockExClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockExClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

impl ClientInner {
    fn endpoint(&self, path_and_query: &str) -> Result<Url> {
        self.session.credentials().endpoint(path_and_query)
    }

    /// Authorized GET decoding the JSON body on success.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = self.endpoint(path_and_query)?;
        let response = self.session.execute_authorized(Method::GET, url).await?;
        decode(response)
    }

    /// Authorized POST where only the status matters.
    pub(crate) async fn post(&self, path_and_query: &str) -> Result<()> {
        let url = self.endpoint(path_and_query)?;
        let response = self.session.execute_authorized(Method::POST, url).await?;
        expect_success(response)
    }

    /// Public GET: no bearer header, no re-authentication protocol.
    pub(crate) async fn get_public<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = self.endpoint(path_and_query)?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        decode(RawResponse { status, body })
    }
}

fn decode<T: DeserializeOwned>(response: RawResponse) -> Result<T> {
    if response.is_success() {
        Ok(serde_json::from_value(response.body)?)
    } else {
        Err(api_error(response))
    }
}

fn expect_success(response: RawResponse) -> Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(api_error(response))
    }
}

fn api_error(response: RawResponse) -> Error {
    Error::Api {
        status: response.status.as_u16(),
        message: response.error_message(),
        body: response.body,
    }
}
