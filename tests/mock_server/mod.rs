//! Mock marketplace API shared by the integration tests.

#![allow(dead_code)]

use marketplace_client::cache::{KeyMode, ManualClock};
use marketplace_client::transport::TransportConfig;
use marketplace_client::{MarketplaceClient, MarketplaceClientBuilder};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;

pub const RPC_PATH: &str = "/rpc";

/// A mock server plus the endpoint URL clients should POST to.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub endpoint: String,
    pub clock: Arc<ManualClock>,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let endpoint = format!("{}{}", server.url(), RPC_PATH);
        Self {
            server,
            endpoint,
            clock: Arc::new(ManualClock::new()),
        }
    }

    /// Client on the fixture's manual clock.
    pub fn client(&self) -> MarketplaceClient {
        self.builder().build().expect("client should build")
    }

    pub fn client_with_key_mode(&self, mode: KeyMode) -> MarketplaceClient {
        self.builder()
            .key_mode(mode)
            .build()
            .expect("client should build")
    }

    pub fn builder(&self) -> MarketplaceClientBuilder {
        MarketplaceClientBuilder::new()
            .endpoint(self.endpoint.clone())
            .transport_config(TransportConfig {
                timeout: Duration::from_secs(5),
                ..TransportConfig::default()
            })
            .clock(self.clock.clone())
    }

    /// Expect exactly `hits` POSTs whose body is `request_body`, answering each
    /// with `status` and `response_body`.
    pub async fn mock_rpc(
        &mut self,
        request_body: &str,
        status: usize,
        response_body: &str,
        hits: usize,
    ) -> Mock {
        self.server
            .mock("POST", RPC_PATH)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Exact(request_body.to_string()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(response_body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Expect exactly `hits` POSTs of any body.
    pub async fn mock_any(&mut self, status: usize, response_body: &str, hits: usize) -> Mock {
        self.server
            .mock("POST", RPC_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(response_body)
            .expect(hits)
            .create_async()
            .await
    }
}

pub const POPULAR_BODY: &str = r#"{"items":[{"id":"e1","name":"Gaussian Blur","author":"ada","tags":["image","fx"]},{"id":"e2","name":"Sort List"}]}"#;
