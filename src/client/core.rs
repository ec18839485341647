use crate::cache::ResponseCache;
use crate::client::memo::RequestMemoizer;
use crate::transport::HttpTransport;
use crate::types::call::{RpcCall, RpcResponse};
use crate::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Client for one marketplace API endpoint.
///
/// Owns the HTTP transport and a handle to the response cache. Cloning is
/// cheap and clones share both.
#[derive(Clone)]
pub struct MarketplaceClient {
    pub(crate) endpoint: String,
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) memoizer: RequestMemoizer,
}

impl MarketplaceClient {
    pub(crate) fn new(endpoint: String, transport: Arc<HttpTransport>, cache: Arc<ResponseCache>) -> Self {
        let memoizer = RequestMemoizer::new(transport.clone(), cache);
        Self {
            endpoint,
            transport,
            memoizer,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        self.memoizer.cache()
    }

    pub fn memoizer(&self) -> &RequestMemoizer {
        &self.memoizer
    }

    /// Issue `func(args)` without consulting or filling the cache.
    pub async fn call<A>(&self, func: &str, args: &A) -> Result<RpcResponse>
    where
        A: Serialize + ?Sized,
    {
        let args = serde_json::to_value(args)?;
        debug!(func, "uncached call");
        self.transport
            .post_call(&self.endpoint, &RpcCall::new(func, &args))
            .await
    }

    /// Issue `func(args)` through the response cache.
    pub async fn fetch_memoized<A>(&self, func: &str, args: &A) -> Result<Value>
    where
        A: Serialize + ?Sized,
    {
        self.memoizer
            .fetch_memoized(&self.endpoint, func, args)
            .await
    }
}
