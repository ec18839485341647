//! Wire and domain types: the RPC envelope, marketplace entries, and the
//! browse/search selectors.

pub mod browse;
pub mod call;
pub mod entry;

pub use browse::{SearchMode, Tab};
pub use call::{func, RpcCall, RpcResponse};
pub use entry::{Entry, Listing};
