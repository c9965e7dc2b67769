//! Infrastructure layer module
//!
//! This module contains infrastructure concerns that sit beneath the chain
//! services: the in-memory TTL cache backing read-through node access, and
//! telemetry initialization for host applications.

pub mod cache;
pub mod telemetry;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheMetrics, EntityKind, TtlCache};
