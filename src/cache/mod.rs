//! Response caching: a keyed, time-boxed store of successful responses.
//!
//! # Response Caching Module
//!
//! Repeated identical calls inside the memoization window (60 seconds by
//! default) are answered from memory instead of the network.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ResponseCache`] | The store: entries, TTL, clock and hit/miss counters |
//! | [`CacheKey`] | `"<func>:<json args>"` key derived from a call |
//! | [`KeyMode`] | Whether argument object keys are sorted before keying |
//! | [`Clock`] | Injectable time source ([`SystemClock`], [`ManualClock`]) |
//!
//! ## Semantics
//!
//! - Only successful (2xx) responses are stored.
//! - Expiry is checked lazily when a key is read; nothing is swept or evicted.
//! - Storage grows for the lifetime of the cache.
//!
//! ## Example
//!
//! ```rust
//! use marketplace_client::cache::{CacheKey, KeyMode, ResponseCache};
//! use serde_json::json;
//!
//! let cache = ResponseCache::new();
//! let key = CacheKey::derive("listPopularEntries", &json!({}), KeyMode::AsGiven)?;
//! cache.store(key.clone(), json!({"items": []}), cache.now())?;
//! assert!(cache.get_fresh(&key, cache.now())?.is_some());
//! # Ok::<(), marketplace_client::Error>(())
//! ```

mod clock;
mod key;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{CacheKey, KeyMode};
pub use store::{CacheEntry, CacheStats, ResponseCache, DEFAULT_TTL};
