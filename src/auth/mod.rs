//! Authentication and session management for the BlockEx Trade API.
//!
//! The venue issues a single bearer token per login (OAuth password
//! grant). [`Session`] owns the credentials, the current token and its
//! expiry, and wraps every private endpoint call in the re-authentication
//! protocol: log in lazily when the token is absent or expired, and on a
//! server-side authorization rejection log in again and retry the call
//! exactly once.
//!
//! ```no_run
//! use blockex_rs::{Credentials, Session};
//!
//! # async fn example() -> blockex_rs::Result<()> {
//! let credentials = Credentials::new(
//!     "https://api.blockex.example/",
//!     "your-api-id",
//!     "username",
//!     "password",
//! )?;
//!
//! let session = Session::new(credentials);
//! let _token = session.login().await?;
//! # Ok(())
//! # }
//! ```

mod session;

pub use session::{Credentials, RawResponse, Session};
