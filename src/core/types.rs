//! Core type definitions and value objects for the domain model
//!
//! This module contains strongly-typed wrappers around primitive types
//! to ensure type safety and prevent invalid states in the domain model.
//! All on-chain quantities are arbitrary-precision integers; nothing here
//! touches floating point.

use chrono::{DateTime, Utc};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier of a staking operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperatorId(pub u64);

impl OperatorId {
    /// Get the inner numeric value
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OperatorId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier of a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DomainId(pub u32);

impl DomainId {
    /// Get the inner numeric value
    pub fn into_inner(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DomainId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Chain account address (SS58-encoded)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    /// Create a new account address with validation
    pub fn new(address: String) -> Result<Self, crate::core::error::StakingError> {
        crate::core::validation::validate_account_address(&address)
            .map_err(|e| crate::core::error::StakingError::validation(e.to_string()))?;
        Ok(Self(address))
    }

    /// Create without validation (use with caution)
    pub fn new_unchecked(address: String) -> Self {
        Self(address)
    }

    /// Get the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the inner string value
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountAddress {
    type Err = crate::core::error::StakingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// On-chain token amount in shannons (10^-18 AI3), always non-negative
///
/// Backed by a 256-bit integer so that balances and intermediate products
/// never lose precision the way 64-bit floats do above 2^53.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(pub U256);

impl Amount {
    /// The zero amount
    pub const ZERO: Self = Self(U256::zero());

    /// Create from a raw 256-bit value
    pub fn new(value: U256) -> Self {
        Self(value)
    }

    /// Create from a u64 shannon count
    pub fn from_u64(value: u64) -> Self {
        Self(U256::from(value))
    }

    /// Create from a u128 shannon count
    pub fn from_u128(value: u128) -> Self {
        Self(U256::from(value))
    }

    /// Parse from a decimal integer string, e.g. `"1000000000000000000"`
    pub fn from_dec_str(s: &str) -> Result<Self, crate::core::error::StakingError> {
        use crate::core::result::ResultExt;

        U256::from_dec_str(s.trim())
            .map(Self)
            .map_decode_err(None, || format!("Invalid amount string '{}'", s.trim()))
    }

    /// Get the inner 256-bit value
    pub fn into_inner(self) -> U256 {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Saturating addition
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction (floors at zero, amounts are never negative)
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Nominator share count for an operator pool
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Shares(pub U256);

impl Shares {
    /// The zero share count
    pub const ZERO: Self = Self(U256::zero());

    /// Create from a raw 256-bit value
    pub fn new(value: U256) -> Self {
        Self(value)
    }

    /// Create from a u64 share count
    pub fn from_u64(value: u64) -> Self {
        Self(U256::from(value))
    }

    /// Parse from a decimal integer string
    pub fn from_dec_str(s: &str) -> Result<Self, crate::core::error::StakingError> {
        Amount::from_dec_str(s).map(|a| Self(a.0))
    }

    /// Get the inner 256-bit value
    pub fn into_inner(self) -> U256 {
        self.0
    }

    /// Check if the share count is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Shares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value per share, scaled by 10^18 like every other amount
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SharePrice(pub U256);

impl SharePrice {
    /// Create from a raw 256-bit value
    pub fn new(value: U256) -> Self {
        Self(value)
    }

    /// Get the inner 256-bit value
    pub fn into_inner(self) -> U256 {
        self.0
    }

    /// Check if the price is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for SharePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp wrapper for consistent time handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp for the current moment
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a DateTime<Utc>
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Get the inner DateTime<Utc> value
    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// Get seconds since Unix epoch
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }

    /// Get milliseconds since Unix epoch
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Get duration since another timestamp
    pub fn duration_since(&self, other: Timestamp) -> chrono::Duration {
        self.0 - other.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

/// Block height on the consensus chain
pub type BlockNumber = u64;

/// Epoch index within a domain
pub type EpochIndex = u32;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operator_id_round_trip() {
        let id = OperatorId(42);
        let parsed = OperatorId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_account_address() {
        let valid = "sucQo7ot2qpn3GqitsqCZCMTu1Jmh2T9Rg9nAWxgPCGDNEo4X";
        let addr = AccountAddress::new(valid.to_string()).unwrap();
        assert_eq!(addr.as_str(), valid);

        assert!(AccountAddress::new("bad!addr".to_string()).is_err());
        assert!(AccountAddress::new("short".to_string()).is_err());
    }

    #[test]
    fn test_amount_parsing() {
        let amount = Amount::from_dec_str("1000000000000000000").unwrap();
        assert_eq!(amount, Amount::from_u64(1_000_000_000_000_000_000));

        assert!(Amount::from_dec_str("not a number").is_err());
        assert!(Amount::from_dec_str("-5").is_err());
    }

    #[test]
    fn test_amount_arithmetic() {
        let a = Amount::from_u64(100);
        let b = Amount::from_u64(30);

        assert_eq!(a.saturating_add(b), Amount::from_u64(130));
        assert_eq!(a.saturating_sub(b), Amount::from_u64(70));
        // Never goes negative
        assert_eq!(b.saturating_sub(a), Amount::ZERO);
        assert!(Amount::ZERO.is_zero());
    }

    #[test]
    fn test_amount_beyond_u64() {
        // 10^30 shannons, far above what u64 or f64 can represent exactly
        let big = Amount::from_dec_str("1000000000000000000000000000000").unwrap();
        assert!(!big.is_zero());
        assert_eq!(big.to_string(), "1000000000000000000000000000000");
    }

    #[test]
    fn test_timestamp_ordering() {
        let earlier = Timestamp::from_datetime(Utc::now());
        let later = Timestamp::from_datetime(earlier.into_inner() + chrono::Duration::seconds(5));
        assert!(later > earlier);
        assert_eq!(later.duration_since(earlier), chrono::Duration::seconds(5));
    }
}
