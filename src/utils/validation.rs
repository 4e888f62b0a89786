//! Input validation utilities for the gateway.
//!
//! Shape checks applied to watcher- and caller-supplied inputs before any
//! ledger state is touched. Each check maps to one distinct error.

use crate::error::{Error, Result};
use crate::utils::crypto::{AccountId, BtcPublicKey, TxHash, ValidatorSignature};

// ═══════════════════════════════════════════════════════════════════════════════
// AMOUNT VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Validate that an amount lies within `[min, max]`
pub fn validate_amount(amount: u64, min: u64, max: u64) -> Result<()> {
    if amount < min || amount > max {
        return Err(Error::InvalidAmount);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// BYTE-SHAPE VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Validate a transaction hash is not the all-zero sentinel
pub fn validate_tx_hash(hash: &TxHash) -> Result<()> {
    if hash.is_zero() {
        return Err(Error::InvalidTxHash);
    }
    Ok(())
}

/// Validate a Bitcoin public key is not all-zero
pub fn validate_btc_pubkey(key: &BtcPublicKey) -> Result<()> {
    if key.is_zero() {
        return Err(Error::InvalidBtcAddress);
    }
    Ok(())
}

/// Validate a signature is not all-zero.
///
/// This is a format check only; no cryptographic verification happens here.
pub fn validate_signature_format(signature: &ValidatorSignature) -> Result<()> {
    if signature.is_zero() {
        return Err(Error::InvalidSignatureFormat);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS SAFETY
// ═══════════════════════════════════════════════════════════════════════════════

/// Whether `addr` may be trusted as a validator or credited as a recipient.
///
/// The account must be well formed and must be neither the owner nor the
/// gateway's own identity.
pub fn is_safe_address(addr: &AccountId, owner: &AccountId, bridge_identity: &AccountId) -> bool {
    addr.is_well_formed() && addr != owner && addr != bridge_identity
}

/// Address-safety check for validator registry updates
pub fn validate_validator_address(
    addr: &AccountId,
    owner: &AccountId,
    bridge_identity: &AccountId,
) -> Result<()> {
    if !is_safe_address(addr, owner, bridge_identity) {
        return Err(Error::InvalidValidatorAddress);
    }
    Ok(())
}

/// Address-safety check for credited recipients
pub fn validate_recipient_address(
    addr: &AccountId,
    owner: &AccountId,
    bridge_identity: &AccountId,
) -> Result<()> {
    if !is_safe_address(addr, owner, bridge_identity) {
        return Err(Error::InvalidRecipientAddress);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::{MAX_DEPOSIT_AMOUNT, MIN_DEPOSIT_AMOUNT};

    fn owner() -> AccountId {
        AccountId::new("owner")
    }

    fn bridge() -> AccountId {
        AccountId::new("gateway.bridge")
    }

    #[test]
    fn test_validate_amount_bounds() {
        let (min, max) = (MIN_DEPOSIT_AMOUNT, MAX_DEPOSIT_AMOUNT);
        assert!(validate_amount(min, min, max).is_ok());
        assert!(validate_amount(max, min, max).is_ok());
        assert_eq!(validate_amount(min - 1, min, max), Err(Error::InvalidAmount));
        assert_eq!(validate_amount(max + 1, min, max), Err(Error::InvalidAmount));
        assert_eq!(validate_amount(50, min, max), Err(Error::InvalidAmount));
    }

    #[test]
    fn test_validate_tx_hash() {
        assert!(validate_tx_hash(&TxHash::new([0xaa; 32])).is_ok());
        assert_eq!(validate_tx_hash(&TxHash::zero()), Err(Error::InvalidTxHash));
    }

    #[test]
    fn test_validate_btc_pubkey() {
        assert!(validate_btc_pubkey(&BtcPublicKey::new([0x03; 33])).is_ok());
        assert_eq!(
            validate_btc_pubkey(&BtcPublicKey::new([0; 33])),
            Err(Error::InvalidBtcAddress)
        );
    }

    #[test]
    fn test_validate_signature_format() {
        assert!(validate_signature_format(&ValidatorSignature::new([0x30; 65])).is_ok());
        assert_eq!(
            validate_signature_format(&ValidatorSignature::new([0; 65])),
            Err(Error::InvalidSignatureFormat)
        );
    }

    #[test]
    fn test_address_safety() {
        assert!(is_safe_address(&AccountId::new("alice"), &owner(), &bridge()));
        assert!(!is_safe_address(&owner(), &owner(), &bridge()));
        assert!(!is_safe_address(&bridge(), &owner(), &bridge()));
        assert!(!is_safe_address(&AccountId::new("NOT VALID"), &owner(), &bridge()));
    }

    #[test]
    fn test_address_errors_are_distinct() {
        assert_eq!(
            validate_validator_address(&owner(), &owner(), &bridge()),
            Err(Error::InvalidValidatorAddress)
        );
        assert_eq!(
            validate_recipient_address(&owner(), &owner(), &bridge()),
            Err(Error::InvalidRecipientAddress)
        );
    }
}
