//! HTTP client and service layer for the BlockEx Trade API.
//!
//! This module provides the main entry point [`BlockExClient`] for
//! interacting with the API.
//!
//! # Example
//!
//! ```no_run
//! use blockex_rs::{BlockExClient, Credentials};
//!
//! # async fn example() -> blockex_rs::Result<()> {
//! let credentials = Credentials::new(
//!     "https://api.blockex.example/",
//!     "your-api-id",
//!     "username",
//!     "password",
//! )?;
//! let client = BlockExClient::new(credentials)?;
//!
//! let orders = client.orders().list(None).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;

pub use config::ClientConfig;
pub use http::BlockExClient;
pub(crate) use http::ClientInner;
