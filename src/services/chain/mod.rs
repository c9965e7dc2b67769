//! Chain data access: RPC transport, wire decoding, and cached reads
//!
//! Three layers, bottom up: [`rpc`] speaks JSON-RPC 2.0 to the node,
//! [`types`] decodes node-native payloads into typed records, and
//! [`reader`] fronts both with per-entity TTL caching and stale fallback.

pub mod reader;
pub mod rpc;
pub mod types;

pub use reader::{ChainReader, ReaderStats};
pub use rpc::{ChainQuery, NodeRpcClient};
pub use types::{BalanceRecord, DomainRecord, OperatorRecord, OperatorStatus};
