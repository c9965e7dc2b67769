//! Position valuation and portfolio aggregation
//!
//! Pure derivation over chain records: given an operator's pool state and a
//! nominator's share count, compute what the stake is worth today, classify
//! the position's lifecycle stage, and roll a set of positions up into a
//! portfolio summary. Everything here is integer math in shannons; display
//! formatting stays in [`crate::core::units`].

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::core::types::{Amount, BlockNumber, EpochIndex, OperatorId, SharePrice, Shares, Timestamp};
use crate::core::units;
use crate::services::chain::OperatorRecord;

/// A deposit waiting for its epoch to begin earning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDeposit {
    /// Amount staked, in shannons
    pub amount: Amount,
    /// Epoch at which the deposit converts to shares
    pub effective_epoch: EpochIndex,
}

/// A withdrawal in its unlock period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingWithdrawal {
    /// Amount being withdrawn, in shannons
    pub amount: Amount,
    /// Block at which the funds unlock
    pub unlock_block: BlockNumber,
}

/// Lifecycle stage of a staking position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    /// Shares held and earning
    Active,
    /// Deposits made but no shares converted yet
    Pending,
    /// At least one withdrawal is in flight
    Withdrawing,
}

impl std::fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Withdrawing => "withdrawing",
        };
        write!(f, "{}", s)
    }
}

/// A nominator's stake with a single operator, valued at current share price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Operator the stake is nominated to
    pub operator_id: OperatorId,
    /// Current value of the held shares, in shannons
    pub position_value: Amount,
    /// Storage fee fund contribution, in shannons
    pub storage_fee_deposit: Amount,
    /// Deposits not yet converted to shares
    pub pending_deposits: Vec<PendingDeposit>,
    /// Withdrawals in their unlock period
    pub pending_withdrawals: Vec<PendingWithdrawal>,
    /// Lifecycle stage
    pub status: PositionStatus,
    /// When the underlying chain records were read
    pub last_updated: Timestamp,
}

impl Position {
    /// Total amount currently unlocking across all pending withdrawals
    pub fn total_withdrawing(&self) -> Amount {
        self.pending_withdrawals
            .iter()
            .fold(Amount::ZERO, |acc, w| acc.saturating_add(w.amount))
    }

    /// Total amount deposited but not yet earning
    pub fn total_pending_deposits(&self) -> Amount {
        self.pending_deposits
            .iter()
            .fold(Amount::ZERO, |acc, d| acc.saturating_add(d.amount))
    }
}

/// Whole-portfolio rollup across every operator a nominator stakes with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of all position values, in shannons
    pub total_value: Amount,
    /// Positions currently holding shares
    pub active_positions: usize,
    /// Sum of storage fee fund contributions, in shannons
    pub total_storage_fee: Amount,
    /// Deposits awaiting conversion, across all positions
    pub pending_deposit_count: usize,
    /// Withdrawals in flight, across all positions
    pub pending_withdrawal_count: usize,
    /// Lifetime earnings; requires deposit history the chain does not
    /// expose per account, so this is not yet computable
    pub total_earned: Option<Amount>,
}

/// Value a nominator's stake with one operator
///
/// The share price comes from the operator's pool (`total_stake /
/// total_shares`); `share_price_override` stands in when the pool has no
/// shares outstanding, as right after epoch transitions. With no price from
/// either source the held shares are valued at zero rather than failing;
/// pending amounts and status still come through.
#[instrument(skip_all, fields(operator = %operator.id))]
pub fn compute_position(
    operator: &OperatorRecord,
    user_shares: Shares,
    storage_fee_deposit: Amount,
    pending_deposits: Vec<PendingDeposit>,
    pending_withdrawals: Vec<PendingWithdrawal>,
    share_price_override: Option<SharePrice>,
) -> Position {
    let price = operator.share_price().or(share_price_override);
    let position_value = match price {
        Some(price) => units::mul_shares_by_price(user_shares, price),
        None => Amount::ZERO,
    };

    let status = if !pending_withdrawals.is_empty() {
        PositionStatus::Withdrawing
    } else if user_shares.is_zero() && !pending_deposits.is_empty() {
        PositionStatus::Pending
    } else {
        PositionStatus::Active
    };

    Position {
        operator_id: operator.id,
        position_value,
        storage_fee_deposit,
        pending_deposits,
        pending_withdrawals,
        status,
        last_updated: Timestamp::now(),
    }
}

/// Roll positions up into a single portfolio view
///
/// All sums are saturating integer additions in shannons; nothing here can
/// overflow short of amounts near `U256::MAX`, and nothing rounds.
pub fn compute_portfolio_summary(positions: &[Position]) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        total_value: Amount::ZERO,
        active_positions: 0,
        total_storage_fee: Amount::ZERO,
        pending_deposit_count: 0,
        pending_withdrawal_count: 0,
        total_earned: None,
    };

    for position in positions {
        summary.total_value = summary.total_value.saturating_add(position.position_value);
        summary.total_storage_fee = summary
            .total_storage_fee
            .saturating_add(position.storage_fee_deposit);
        summary.pending_deposit_count += position.pending_deposits.len();
        summary.pending_withdrawal_count += position.pending_withdrawals.len();
        if position.status == PositionStatus::Active {
            summary.active_positions += 1;
        }
    }

    summary
}
