//! # marketplace-client
//!
//! Client for the Waviate Flow marketplace API.
//!
//! ## Overview
//!
//! Every remote operation goes through one endpoint as a JSON envelope:
//!
//! ```text
//! POST <endpoint>
//! Content-Type: application/json
//!
//! {"func": "<operation>", "args": { ... }}
//! ```
//!
//! Listing and search calls are memoized: an identical call (same `func`,
//! same serialized `args`) made within 60 seconds of a successful one is
//! answered from memory without touching the network. Unsuccessful responses
//! and errors are never cached.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marketplace_client::{MarketplaceClientBuilder, SearchMode, Tab};
//!
//! #[tokio::main]
//! async fn main() -> marketplace_client::Result<()> {
//!     let client = MarketplaceClientBuilder::new()
//!         .endpoint("https://api.example.com/marketplace")
//!         .build()?;
//!
//!     let popular = client.browse(Tab::Popular).await?;
//!     let sorting = client.search("sort", SearchMode::Name).await?;
//!     println!("{} popular, {} matching", popular.len(), sorting.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder, request memoizer and typed operations |
//! | [`cache`] | Response cache, cache keys, clocks |
//! | [`transport`] | HTTP POST of the RPC envelope |
//! | [`types`] | Envelope, entries, tabs and search modes |

pub mod cache;
pub mod client;
pub mod transport;
pub mod types;

pub use client::{MarketplaceClient, MarketplaceClientBuilder, RequestMemoizer};
pub use types::{Entry, Listing, RpcResponse, SearchMode, Tab};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

pub mod error;
pub use error::{Error, ErrorContext};
