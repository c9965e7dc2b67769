//! Application error types and error handling utilities
//!
//! This module defines the structured error system for the staking core.
//! It provides typed error variants, error categories, and utilities for
//! error propagation and handling throughout the crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type that encompasses all failures the staking core can surface
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum StakingError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<StakingError>>,
    },

    /// Network and RPC communication errors
    #[error("Network error: {message}")]
    Network {
        /// Human-readable description
        message: String,
        /// Endpoint that failed, if known
        endpoint: Option<String>,
        /// Number of attempts made before giving up
        retry_count: u32,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<StakingError>>,
    },

    /// Remote query failed and no cached fallback exists.
    ///
    /// This is the only error the read path lets propagate to display code;
    /// transient failures with a cached value degrade to stale data instead.
    #[error("Chain unavailable: no cached {entity} for key {key}")]
    ChainUnavailable {
        /// Entity kind that was requested (operator, balance, domain)
        entity: String,
        /// Key that was requested
        key: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<StakingError>>,
    },

    /// Wire response could not be decoded into the expected record shape
    #[error("Decode error: {message}")]
    Decode {
        /// Human-readable description
        message: String,
        /// Field that failed to decode, if known
        field: Option<String>,
    },

    /// Validation errors on caller-supplied input
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description
        message: String,
        /// Field that failed validation, if known
        field: Option<String>,
        /// Offending value, if known
        value: Option<String>,
    },

    /// Timeout errors
    #[error("Timeout error: {message}")]
    Timeout {
        /// Human-readable description
        message: String,
        /// Operation that timed out
        operation: String,
        /// Configured timeout in milliseconds
        duration_ms: u64,
    },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable description
        message: String,
        /// Component where the error occurred, if known
        component: Option<String>,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<StakingError>>,
    },
}

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Configuration and setup errors
    Configuration,
    /// Network and communication errors
    Network,
    /// Wire decoding errors
    Decoding,
    /// Validation and input errors
    Validation,
    /// Performance and timeout errors
    Performance,
    /// System and infrastructure errors
    System,
}

impl StakingError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            endpoint: None,
            retry_count: 0,
            source: None,
        }
    }

    /// Create a new network error pinned to an endpoint
    pub fn network_at<S: Into<String>>(message: S, endpoint: S, retry_count: u32) -> Self {
        Self::Network {
            message: message.into(),
            endpoint: Some(endpoint.into()),
            retry_count,
            source: None,
        }
    }

    /// Create a new chain-unavailable error for an entity/key pair
    pub fn chain_unavailable<S: Into<String>>(entity: S, key: S) -> Self {
        Self::ChainUnavailable {
            entity: entity.into(),
            key: key.into(),
            source: None,
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new decode error for a specific field
    pub fn decode_field<S: Into<String>>(message: S, field: S) -> Self {
        Self::Decode {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
            value: None,
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            component: None,
            source: None,
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S, operation: S, duration_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            operation: operation.into(),
            duration_ms,
        }
    }

    /// Get the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Configuration,
            Self::Network { .. } | Self::ChainUnavailable { .. } => ErrorKind::Network,
            Self::Decode { .. } => ErrorKind::Decoding,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Timeout { .. } => ErrorKind::Performance,
            Self::Internal { .. } => ErrorKind::System,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Get suggested retry delay in seconds
    pub fn retry_delay_seconds(&self) -> Option<u64> {
        match self {
            Self::Network { retry_count, .. } => {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                Some(2_u64.pow(*retry_count).min(60))
            }
            Self::Timeout { .. } => Some(5),
            _ => None,
        }
    }

    /// Add source error
    pub fn with_source(mut self, source: StakingError) -> Self {
        match &mut self {
            Self::Config { source: s, .. }
            | Self::Network { source: s, .. }
            | Self::ChainUnavailable { source: s, .. }
            | Self::Internal { source: s, .. } => {
                *s = Some(Box::new(source));
            }
            _ => {}
        }
        self
    }
}

impl From<anyhow::Error> for StakingError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<serde_json::Error> for StakingError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for StakingError {
    fn from(err: reqwest::Error) -> Self {
        Self::network(format!("HTTP request error: {}", err))
    }
}

impl From<url::ParseError> for StakingError {
    fn from(err: url::ParseError) -> Self {
        Self::config(format!("Invalid URL: {}", err))
    }
}

impl From<tokio::time::error::Elapsed> for StakingError {
    fn from(_err: tokio::time::error::Elapsed) -> Self {
        Self::timeout("Operation timed out".to_string(), "unknown".to_string(), 0)
    }
}
