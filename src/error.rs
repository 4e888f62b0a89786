//! Error types for the BTC gateway.
//!
//! Every operation of the gateway fails with exactly one of these variants.
//! Domain rejections are reported as-is to the caller; infrastructure
//! failures only come out of the storage and configuration layers.

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Authorization Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Caller is neither the owner nor a registered validator where one is required
    #[error("Not authorized")]
    NotAuthorized,

    // ═══════════════════════════════════════════════════════════════════
    // Deposit / Consensus Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Deposit hash already recorded, deposit already finalized, or validator already attested
    #[error("Already processed")]
    AlreadyProcessed,

    /// Signature bytes do not match the recorded attestation
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature bytes are malformed (wrong length or all-zero)
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    // ═══════════════════════════════════════════════════════════════════
    // Balance Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Balance (or bridged reserve) is lower than the requested amount
    #[error("Insufficient balance")]
    InsufficientBalance,

    // ═══════════════════════════════════════════════════════════════════
    // Circuit Breaker Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Wrong state for the requested transition, or the record is absent
    #[error("Invalid bridge status")]
    InvalidBridgeStatus,

    /// Value-moving operations are halted
    #[error("Bridge is paused")]
    BridgePaused,

    // ═══════════════════════════════════════════════════════════════════
    // Input Validation Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Amount outside the policy bounds
    #[error("Invalid amount")]
    InvalidAmount,

    /// Validator account failed the address-safety check
    #[error("Invalid validator address")]
    InvalidValidatorAddress,

    /// Recipient account failed the address-safety check
    #[error("Invalid recipient address")]
    InvalidRecipientAddress,

    /// Bitcoin public key is malformed (wrong length or all-zero)
    #[error("Invalid BTC address")]
    InvalidBtcAddress,

    /// Transaction hash is malformed (wrong length or all-zero)
    #[error("Invalid transaction hash")]
    InvalidTxHash,

    // ═══════════════════════════════════════════════════════════════════
    // Infrastructure Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Arithmetic overflow in a ledger update
    #[error("Arithmetic overflow in {operation}")]
    Overflow {
        /// Operation that overflowed
        operation: String,
    },

    /// Configuration is missing or inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Lock acquisition failed
    #[error("Failed to acquire lock")]
    Lock,

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Returns true if the error came from storage, encoding or configuration
    /// rather than from a rejected precondition
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Error::Overflow { .. }
                | Error::Config(_)
                | Error::Serialization(_)
                | Error::Deserialization(_)
                | Error::Lock
                | Error::Storage(_)
        )
    }

    /// Returns the error code for external systems
    pub fn code(&self) -> u32 {
        match self {
            // Authorization errors: 1xxx
            Error::NotAuthorized => 1001,

            // Deposit / consensus errors: 2xxx
            Error::AlreadyProcessed => 2001,
            Error::InvalidSignature => 2002,
            Error::InvalidSignatureFormat => 2003,

            // Balance errors: 3xxx
            Error::InsufficientBalance => 3001,

            // Circuit breaker errors: 4xxx
            Error::InvalidBridgeStatus => 4001,
            Error::BridgePaused => 4002,

            // Input validation errors: 5xxx
            Error::InvalidAmount => 5001,
            Error::InvalidValidatorAddress => 5002,
            Error::InvalidRecipientAddress => 5003,
            Error::InvalidBtcAddress => 5004,
            Error::InvalidTxHash => 5005,

            // Infrastructure errors: 9xxx
            Error::Overflow { .. } => 9001,
            Error::Config(_) => 9002,
            Error::Serialization(_) => 9003,
            Error::Deserialization(_) => 9004,
            Error::Lock => 9005,
            Error::Storage(_) => 9006,
        }
    }
}
