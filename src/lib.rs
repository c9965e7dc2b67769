//! AI3 Staking Core Library
//!
//! Chain-data access and derivation layer for the AI3 staking portal. The
//! portal UI (wallet connection, forms, presentation components) consumes this
//! crate for everything that touches on-chain numbers: fixed-point conversion
//! between 18-decimal integer balances ("shannons") and display units,
//! share-price-derived position values, and TTL-cached reads of operator,
//! balance, and domain records from a remote node.
//!
//! # Architecture Overview
//!
//! The library is organized using Clean Architecture principles:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Services Layer                          │
//! │  ┌──────────────┐  ┌──────────────┐                        │
//! │  │ ChainReader  │  │  Portfolio   │                        │
//! │  └──────────────┘  └──────────────┘                        │
//! └─────────────────────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Infrastructure Layer                       │
//! │  ┌──────────────┐  ┌──────────────┐                        │
//! │  │  TTL Cache   │  │  Telemetry   │                        │
//! │  └──────────────┘  └──────────────┘                        │
//! └─────────────────────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Core Layer                             │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │  Types  │ │  Errors │ │  Units  │ │ Config  │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Features
//!
//! - **Exact Arithmetic**: all shannon math is arbitrary-precision integer;
//!   floats appear only at the final display boundary
//! - **Read-Through Caching**: per-entity-kind TTLs with stale-on-error
//!   fallback for resilient display
//! - **Tolerant Decoding**: accepts both structured and primitive wire shapes
//!   from the remote node
//! - **Position Derivation**: shares × share-price valuation and portfolio
//!   summaries ready for presentation
//!
//! # Usage
//!
//! ```rust,no_run
//! use ai3_staking_core::{
//!     config::ChainConfig,
//!     services::chain::{ChainReader, NodeRpcClient},
//! };
//! use ai3_staking_core::core::types::OperatorId;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ChainConfig::from_env()?;
//!     let client = NodeRpcClient::new(&config)?;
//!     let reader = ChainReader::new(Arc::new(client));
//!     let operator = reader.read_operator(OperatorId(1)).await?;
//!     println!("total stake: {}", operator.current_total_stake);
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// Core modules - Domain layer containing value objects and pure arithmetic
pub mod core;

// Configuration management - Environment-sourced endpoint configuration
pub mod config;

// Infrastructure layer - Caching and telemetry
pub mod infrastructure;

// Services layer - Chain access and portfolio derivation
pub mod services;

// Re-export commonly used types for convenience
pub use crate::config::ChainConfig;
pub use crate::core::{
    error::StakingError,
    result::StakingResult,
    types::{AccountAddress, Amount, DomainId, OperatorId, SharePrice, Shares},
};
pub use services::chain::ChainReader;
pub use services::portfolio::{Position, PortfolioSummary};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Token denomination constants
pub mod units {
    use primitive_types::U256;

    /// Number of decimal places in the on-chain representation
    pub const DECIMALS: u32 = 18;

    /// Shannons per whole AI3 token (10^18)
    pub const SHANNONS_PER_AI3: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

    /// Ticker symbol used by display formatting
    pub const TOKEN_SYMBOL: &str = "AI3";

    /// Default number of fractional digits shown by the UI
    pub const DEFAULT_DISPLAY_PLACES: u32 = 4;

    /// Basis points in 100%
    pub const BASIS_POINTS_DENOMINATOR: u16 = 10_000;
}
