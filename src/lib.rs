//! # blockex-rs
//!
//! A Rust client for the BlockEx Trade API.
//!
//! This crate provides access to a BlockEx trading venue: trader
//! authentication, instrument metadata, market order books, and order
//! placement and cancellation.
//!
//! ## Features
//!
//! - **Authentication**: OAuth password-grant login with transparent
//!   token lifecycle management - expired or server-side-invalidated
//!   tokens are replaced automatically, with a single retry per call
//! - **Order Management**: place, cancel, and list orders with typed
//!   filters
//! - **Instrument Metadata**: trader and partner instrument catalogs
//! - **Type Safety**: decimal prices and quantities that survive the
//!   wire format exactly, closed enum sets validated at the boundary
//! - **Async-first**: built on Tokio and reqwest
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blockex_rs::{BlockExClient, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> blockex_rs::Result<()> {
//!     let credentials = Credentials::new(
//!         "https://api.blockex.example/",
//!         "your-api-id",
//!         "username",
//!         "password",
//!     )?;
//!     let client = BlockExClient::new(credentials)?;
//!
//!     // The client logs in lazily; this call authenticates first
//!     let instruments = client.instruments().trader().await?;
//!     println!("Found {} instruments", instruments.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Order Placement
//!
//! ```rust,no_run
//! use blockex_rs::models::{NewOrder, OfferType, OrderStatus};
//! use blockex_rs::api::OrdersQuery;
//! use blockex_rs::{BlockExClient, Credentials};
//! use rust_decimal_macros::dec;
//!
//! #[tokio::main]
//! async fn main() -> blockex_rs::Result<()> {
//!     let credentials = Credentials::new(
//!         "https://api.blockex.example/",
//!         "your-api-id",
//!         "username",
//!         "password",
//!     )?;
//!     let client = BlockExClient::new(credentials)?;
//!
//!     // Place a limit bid
//!     let order = NewOrder::limit(OfferType::Bid, 14, dec!(5.20), dec!(1.0));
//!     client.orders().create(&order).await?;
//!
//!     // List what is working
//!     let query = OrdersQuery {
//!         instrument_id: Some(14),
//!         status: Some(vec![OrderStatus::Placed]),
//!         ..Default::default()
//!     };
//!     for order in client.orders().list(Some(query)).await? {
//!         println!("order {} working at {}", order.order_id, order.price);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Session Behavior
//!
//! One [`Session`] (and thus one [`BlockExClient`]) corresponds to one
//! credential set. Every private endpoint call goes through the
//! authorized-request protocol: a missing or expired token triggers a
//! login before dispatch, and a server-side authorization rejection
//! triggers exactly one re-login and one retry. Calls that read data may
//! therefore update the stored token as a side effect. The session can be
//! shared across tasks; concurrent calls needing authentication perform a
//! single login between them.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{Credentials, RawResponse, Session};
pub use client::{BlockExClient, ClientConfig};
pub use error::{Error, Result};

// Transport types that appear in the public API
pub use reqwest::{Method, StatusCode};
pub use url::Url;

/// Prelude module for convenient imports.
///
/// ```rust
/// use blockex_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{MarketOrdersQuery, OrdersQuery};
    pub use crate::auth::{Credentials, RawResponse, Session};
    pub use crate::client::{BlockExClient, ClientConfig};
    pub use crate::error::{Error, Result};
    pub use crate::models::{Instrument, NewOrder, OfferType, Order, OrderStatus, OrderType};
}
