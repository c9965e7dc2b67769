//! Service layer: chain access and portfolio derivation
//!
//! [`chain`] owns everything that touches the node: transport, decoding,
//! caching. [`portfolio`] is pure computation over the records chain
//! access returns.

pub mod chain;
pub mod portfolio;

pub use chain::{
    BalanceRecord, ChainQuery, ChainReader, DomainRecord, NodeRpcClient, OperatorRecord,
    OperatorStatus, ReaderStats,
};
pub use portfolio::{
    compute_portfolio_summary, compute_position, PendingDeposit, PendingWithdrawal,
    PortfolioSummary, Position, PositionStatus,
};
