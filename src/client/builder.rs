use crate::cache::{Clock, KeyMode, ResponseCache, DEFAULT_TTL};
use crate::client::core::MarketplaceClient;
use crate::transport::{HttpTransport, TransportConfig};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Builder for [`MarketplaceClient`].
///
/// Unset options fall back to the environment:
/// - `MARKETPLACE_API_URL` for the endpoint (required one way or the other)
/// - `MARKETPLACE_CACHE_TTL_MS` for the cache window (default 60 000)
/// - `MARKETPLACE_HTTP_*` / `MARKETPLACE_PROXY_URL`, see [`TransportConfig::from_env`]
pub struct MarketplaceClientBuilder {
    endpoint: Option<String>,
    transport: Option<TransportConfig>,
    cache: Option<Arc<ResponseCache>>,
    cache_ttl: Option<Duration>,
    clock: Option<Arc<dyn Clock>>,
    key_mode: KeyMode,
}

impl MarketplaceClientBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            transport: None,
            cache: None,
            cache_ttl: None,
            clock: None,
            key_mode: KeyMode::default(),
        }
    }

    /// URL every call is POSTed to.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.transport = Some(config);
        self
    }

    /// Use an existing cache instead of creating one, so several clients
    /// share entries. Overrides `cache_ttl`, `clock` and `key_mode`.
    ///
    /// A cache serves one endpoint; `build` fails if `cache` is already
    /// bound to a different one.
    pub fn shared_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Time source for cache expiry. Tests pass a [`crate::cache::ManualClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Opt in to sorting argument object keys before keying.
    ///
    /// This changes key equality: calls whose arguments differ only in key
    /// order share one cache entry.
    pub fn key_mode(mut self, mode: KeyMode) -> Self {
        self.key_mode = mode;
        self
    }

    pub fn build(self) -> Result<MarketplaceClient> {
        let endpoint = match self.endpoint {
            Some(e) => e,
            None => std::env::var("MARKETPLACE_API_URL").map_err(|_| {
                Error::configuration_with_context(
                    "no marketplace endpoint configured",
                    ErrorContext::new()
                        .with_field_path("endpoint")
                        .with_details("set it on the builder or via MARKETPLACE_API_URL")
                        .with_source("client_builder"),
                )
            })?,
        };
        validate_endpoint(&endpoint)?;

        let transport_config = self.transport.unwrap_or_else(TransportConfig::from_env);
        let transport = Arc::new(HttpTransport::new(&transport_config)?);

        let cache = match self.cache {
            Some(cache) => cache,
            None => {
                let ttl = self.cache_ttl.or_else(ttl_from_env).unwrap_or(DEFAULT_TTL);
                let mut cache = ResponseCache::new().with_ttl(ttl).with_key_mode(self.key_mode);
                if let Some(clock) = self.clock {
                    cache = cache.with_clock(clock);
                }
                Arc::new(cache)
            }
        };
        cache.bind_endpoint(&endpoint)?;

        debug!(
            endpoint = %endpoint,
            ttl_ms = cache.ttl().as_millis() as u64,
            timeout_secs = transport_config.timeout.as_secs(),
            "marketplace client ready"
        );
        Ok(MarketplaceClient::new(endpoint, transport, cache))
    }
}

impl Default for MarketplaceClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn ttl_from_env() -> Option<Duration> {
    std::env::var("MARKETPLACE_CACHE_TTL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let invalid = |details: String| {
        Error::configuration_with_context(
            "invalid marketplace endpoint",
            ErrorContext::new()
                .with_field_path("endpoint")
                .with_details(details)
                .with_source("client_builder"),
        )
    };
    let url = Url::parse(endpoint).map_err(|e| invalid(format!("'{}': {}", endpoint, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    #[test]
    fn test_rejects_bad_endpoints() {
        for bad in ["not a url", "ftp://example.com/api", ""] {
            let err = MarketplaceClientBuilder::new().endpoint(bad).build().err();
            assert!(
                matches!(err, Some(Error::Configuration { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_defaults() {
        let client = MarketplaceClientBuilder::new()
            .endpoint("https://api.example.com/rpc")
            .transport_config(TransportConfig::default())
            .cache_ttl(DEFAULT_TTL)
            .build()
            .unwrap();
        assert_eq!(client.endpoint(), "https://api.example.com/rpc");
        assert_eq!(client.cache().ttl(), Duration::from_secs(60));
        assert_eq!(client.cache().key_mode(), KeyMode::AsGiven);
    }

    #[test]
    fn test_shared_cache_is_shared() {
        let cache = Arc::new(ResponseCache::new().with_clock(Arc::new(ManualClock::new())));
        let build = |endpoint: &str| {
            MarketplaceClientBuilder::new()
                .endpoint(endpoint)
                .transport_config(TransportConfig::default())
                .shared_cache(cache.clone())
                .build()
        };
        let a = build("http://localhost:1/rpc").unwrap();
        let b = build("http://localhost:1/rpc").unwrap();
        assert!(Arc::ptr_eq(a.cache(), b.cache()));
        assert_eq!(cache.endpoint(), Some("http://localhost:1/rpc"));
    }

    #[test]
    fn test_shared_cache_rejects_other_endpoint() {
        let cache = Arc::new(ResponseCache::new());
        MarketplaceClientBuilder::new()
            .endpoint("http://localhost:1/a")
            .transport_config(TransportConfig::default())
            .shared_cache(cache.clone())
            .build()
            .unwrap();
        let err = MarketplaceClientBuilder::new()
            .endpoint("http://localhost:1/b")
            .transport_config(TransportConfig::default())
            .shared_cache(cache)
            .build()
            .err();
        assert!(matches!(err, Some(Error::Configuration { .. })));
    }
}
