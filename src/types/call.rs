use serde::Serialize;
use serde_json::Value;

/// Remote operation names understood by the marketplace API.
pub mod func {
    pub const LOGIN_USER: &str = "loginUser";
    pub const LIST_POPULAR_ENTRIES: &str = "listPopularEntries";
    pub const LIST_NEW_ENTRIES: &str = "listNewEntries";
    pub const LIST_RANDOM_ENTRIES: &str = "listRandomEntries";
    pub const SEARCH_ENTRIES: &str = "searchEntries";
    pub const LIST_ENTRIES_BY_CREATOR: &str = "listEntriesByCreator";
}

/// The `{"func": ..., "args": ...}` request envelope.
///
/// Field order is part of the wire format: `func` is always written first.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RpcCall<'a> {
    pub func: &'a str,
    pub args: &'a Value,
}

impl<'a> RpcCall<'a> {
    pub fn new(func: &'a str, args: &'a Value) -> Self {
        Self { func, args }
    }
}

/// Status and parsed body of one RPC round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub status: u16,
    pub body: Value,
}

impl RpcResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
