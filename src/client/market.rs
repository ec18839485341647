//! Typed marketplace operations on top of the raw RPC calls.

use crate::client::core::MarketplaceClient;
use crate::types::browse::{SearchMode, Tab};
use crate::types::call::func;
use crate::types::entry::Listing;
use crate::Result;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Serialize)]
struct LoginArgs<'a> {
    email: &'a str,
    password: &'a str,
}

impl MarketplaceClient {
    /// Log in and return the API's reply untouched.
    ///
    /// Never cached. Nothing from the reply is stored by the client.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value> {
        info!("logging in");
        let response = self
            .call(func::LOGIN_USER, &LoginArgs { email, password })
            .await?;
        Ok(response.body)
    }

    /// Entries for a front-page tab.
    pub async fn browse(&self, tab: Tab) -> Result<Listing> {
        let body = self.fetch_memoized(tab.func(), &json!({})).await?;
        Listing::from_body(&body)
    }

    /// Search entries by name, tag, or creator.
    pub async fn search(&self, query: &str, mode: SearchMode) -> Result<Listing> {
        let body = self.fetch_memoized(mode.func(), &mode.args(query)).await?;
        Listing::from_body(&body)
    }

    pub async fn list_by_creator(&self, creator_id: &str) -> Result<Listing> {
        self.search(creator_id, SearchMode::User).await
    }
}
