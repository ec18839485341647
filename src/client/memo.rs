use crate::cache::ResponseCache;
use crate::transport::HttpTransport;
use crate::types::call::RpcCall;
use crate::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Cache-aside wrapper around a single `POST {func, args}` call.
///
/// Identical calls inside the cache window are answered from the
/// [`ResponseCache`] without any network access. Concurrent identical misses
/// are not coalesced: each one fetches, and the last successful store wins.
/// The cache is bound to the first endpoint used; calls to any other endpoint
/// fail with a configuration error instead of reading its entries.
#[derive(Clone)]
pub struct RequestMemoizer {
    transport: Arc<HttpTransport>,
    cache: Arc<ResponseCache>,
}

impl RequestMemoizer {
    pub fn new(transport: Arc<HttpTransport>, cache: Arc<ResponseCache>) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Returns the response body for `func(args)`, from cache when fresh.
    ///
    /// Non-success responses are returned as-is and never stored. Transport
    /// failures and unparsable bodies propagate as errors, also uncached.
    pub async fn fetch_memoized<A>(&self, endpoint: &str, func: &str, args: &A) -> Result<Value>
    where
        A: Serialize + ?Sized,
    {
        self.cache.bind_endpoint(endpoint)?;
        let args = serde_json::to_value(args)?;
        let key = self.cache.key_for(func, &args)?;
        let now = self.cache.now();

        if let Some(data) = self.cache.get_fresh(&key, now)? {
            debug!(func, "cache hit");
            return Ok(data);
        }
        debug!(func, "cache miss");

        let response = self
            .transport
            .post_call(endpoint, &RpcCall::new(func, &args))
            .await?;

        if response.is_success() {
            self.cache.store(key, response.body.clone(), now)?;
        } else {
            debug!(func, status = response.status, "not caching unsuccessful response");
            self.cache.record_skipped_failure();
        }
        Ok(response.body)
    }
}
