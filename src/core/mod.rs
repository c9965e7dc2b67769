//! Core domain layer containing value objects, pure arithmetic, and domain rules
//!
//! This module defines the fundamental building blocks of the staking core.
//! It contains error types, result definitions, strongly-typed identifiers
//! and amounts, and the fixed-point unit conversion that everything display-
//! facing goes through.
//!
//! # Design Principles
//!
//! 1. **Independence**: the core does not depend on the RPC or cache layers
//! 2. **Immutability**: value objects are immutable
//! 3. **Exactness**: amounts are arbitrary-precision integers end to end;
//!    floating point exists only past the display boundary and is one-way
//! 4. **Type Safety**: operator ids, amounts, and shares are distinct types

pub mod error;
pub mod result;
pub mod types;
pub mod units;

// Re-export commonly used types
pub use error::{ErrorKind, StakingError};
pub use result::StakingResult;
pub use types::*;

/// Domain constants and business rules
pub mod domain {
    use std::time::Duration;

    /// Staking domain rules
    pub mod staking {
        /// Maximum nomination tax an operator can declare, in basis points
        pub const MAX_NOMINATION_TAX_BPS: u16 = 10_000;

        /// Share prices and stakes are scaled by 10^18
        pub const FIXED_POINT_DECIMALS: u32 = 18;
    }

    /// Performance and timing domain rules
    pub mod performance {
        use super::*;

        /// Request timeout for node RPC calls
        pub const RPC_TIMEOUT: Duration = Duration::from_secs(10);

        /// Maximum number of retries for a failed node query
        pub const MAX_RPC_RETRIES: u32 = 2;
    }
}

/// Domain validation rules and helpers
pub mod validation {
    use anyhow::{anyhow, Result};

    /// Validate a chain account address format (SS58, base58 alphabet)
    pub fn validate_account_address(address: &str) -> Result<()> {
        if address.len() < 32 || address.len() > 66 {
            return Err(anyhow!("Invalid address length: {}", address.len()));
        }

        if !address.chars().all(|c| {
            matches!(c, '1'..='9' | 'A'..='H' | 'J'..='N' | 'P'..='Z' | 'a'..='k' | 'm'..='z')
        }) {
            return Err(anyhow!("Invalid base58 characters in address"));
        }

        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_constants() {
        assert_eq!(domain::staking::FIXED_POINT_DECIMALS, 18);
        assert!(domain::performance::RPC_TIMEOUT.as_secs() > 0);
    }

    #[test]
    fn test_validation_functions() {
        assert!(validation::validate_account_address(
            "sucQo7ot2qpn3GqitsqCZCMTu1Jmh2T9Rg9nAWxgPCGDNEo4X"
        )
        .is_ok());
        assert!(validation::validate_account_address("invalid").is_err());
        assert!(validation::validate_account_address("has 0 and O and l inside!!").is_err());
    }
}
