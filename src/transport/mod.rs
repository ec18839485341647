//! HTTP transport for the `{func, args}` RPC envelope.
//!
//! This is the only module that performs network I/O. It never retries and
//! never interprets the response status; both are left to the callers.

mod http;

pub use http::{HttpTransport, TransportConfig, TransportError};
