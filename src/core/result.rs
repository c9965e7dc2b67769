//! Result type definitions and error-context helpers
//!
//! This module provides the crate-wide result alias and an extension trait
//! for attaching typed context when converting foreign errors at module
//! boundaries.

use crate::core::error::StakingError;

/// Staking core result type alias
///
/// This is the primary result type used throughout the crate. It wraps the
/// standard `Result<T, E>` with the crate's [`StakingError`] type.
///
/// # Examples
///
/// ```rust
/// use ai3_staking_core::core::result::StakingResult;
/// use ai3_staking_core::core::error::StakingError;
///
/// fn example_function() -> StakingResult<String> {
///     Ok("Success".to_string())
/// }
///
/// fn failing_function() -> StakingResult<()> {
///     Err(StakingError::validation("Invalid input"))
/// }
/// ```
pub type StakingResult<T> = std::result::Result<T, StakingError>;

/// Extension trait for `Result` to provide additional utility methods
pub trait ResultExt<T> {
    /// Map an error to a configuration error, keeping the cause in the message
    fn map_config_err<F>(self, f: F) -> StakingResult<T>
    where
        F: FnOnce() -> String;

    /// Map an error to a decode error with field context
    fn map_decode_err<F>(self, field: Option<String>, f: F) -> StakingResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn map_config_err<F>(self, f: F) -> StakingResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| StakingError::config(format!("{}: {}", f(), e)))
    }

    fn map_decode_err<F>(self, field: Option<String>, f: F) -> StakingResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let mut error = StakingError::decode(format!("{}: {}", f(), e));
            if let StakingError::Decode { field: fld, .. } = &mut error {
                *fld = field;
            }
            error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_err_keeps_cause() {
        let result: Result<(), &str> = Err("port out of range");
        let staking_result = result.map_config_err(|| "Failed to load settings".to_string());

        match staking_result.unwrap_err() {
            StakingError::Config { message, .. } => {
                assert!(message.contains("Failed to load settings"));
                assert!(message.contains("port out of range"));
            }
            other => panic!("expected Config, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_err_carries_field() {
        let result: Result<(), &str> = Err("boom");
        let staking_result =
            result.map_decode_err(Some("currentTotalStake".to_string()), || {
                "bad amount".to_string()
            });

        match staking_result.unwrap_err() {
            StakingError::Decode { field, .. } => {
                assert_eq!(field.as_deref(), Some("currentTotalStake"));
            }
            other => panic!("expected Decode, got {:?}", other),
        }
    }
}
