//! Marketplace API client.
//!
//! Keep the public surface small: build a [`MarketplaceClient`] with
//! [`MarketplaceClientBuilder`], then use the typed operations (`login`,
//! `browse`, `search`, `list_by_creator`) or the raw `call` / `fetch_memoized`.

pub mod builder;
pub mod core;
mod market;
pub mod memo;

pub use builder::MarketplaceClientBuilder;
pub use core::MarketplaceClient;
pub use memo::RequestMemoizer;
