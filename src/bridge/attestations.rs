//! Signature audit log.
//!
//! One immutable entry per (deposit, validator). Entries are written only by
//! a successful confirmation and outlive the validator's registration.

use serde::{Deserialize, Serialize};

use crate::bridge::Bridge;
use crate::error::Result;
use crate::storage::backend::StorageBackend;
use crate::utils::crypto::{AccountId, TxHash, ValidatorSignature};

/// Composite key of the attestation table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttestationKey {
    /// Attested deposit
    pub tx_hash: TxHash,
    /// Attesting validator
    pub validator: AccountId,
}

impl AttestationKey {
    /// Create a new key
    pub fn new(tx_hash: TxHash, validator: AccountId) -> Self {
        Self { tx_hash, validator }
    }

    /// Table key: the fixed-width hash followed by the account bytes.
    ///
    /// The hash width is fixed, so every key has exactly one decomposition and
    /// a prefix scan on the hash lists every attestation of one deposit.
    pub fn storage_key(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.tx_hash.as_bytes().len() + self.validator.as_bytes().len());
        key.extend_from_slice(self.tx_hash.as_bytes());
        key.extend_from_slice(self.validator.as_bytes());
        key
    }
}

/// A validator's recorded vote for one deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// Signature as submitted; never verified against a key
    pub signature: ValidatorSignature,
    /// Host height when attested
    pub height: u64,
}

impl Attestation {
    /// Create a new attestation
    pub fn new(signature: ValidatorSignature, height: u64) -> Self {
        Self { signature, height }
    }

    /// Byte-for-byte comparison with a candidate signature
    pub fn matches(&self, signature: &ValidatorSignature) -> bool {
        self.signature == *signature
    }
}

impl<B: StorageBackend> Bridge<B> {
    /// Whether `validator` attested `tx_hash` with exactly `signature`.
    ///
    /// Compares against the audit log only; nothing is verified
    /// cryptographically.
    pub fn verify_signature(
        &self,
        tx_hash: &TxHash,
        validator: &AccountId,
        signature: &ValidatorSignature,
    ) -> Result<bool> {
        let key = AttestationKey::new(*tx_hash, validator.clone());
        Ok(self
            .store
            .load_attestation(&key)?
            .map_or(false, |attestation| attestation.matches(signature)))
    }

    /// Look up one attestation
    pub fn get_attestation(
        &self,
        tx_hash: &TxHash,
        validator: &AccountId,
    ) -> Result<Option<Attestation>> {
        self.store
            .load_attestation(&AttestationKey::new(*tx_hash, validator.clone()))
    }

    /// Every attestation recorded for a deposit
    pub fn attestations_for(&self, tx_hash: &TxHash) -> Result<Vec<(AccountId, Attestation)>> {
        self.store.load_attestations_for(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_layout() {
        let key = AttestationKey::new(TxHash::new([0xaa; 32]), AccountId::new("val-1"));
        let raw = key.storage_key();
        assert_eq!(&raw[..32], &[0xaa; 32]);
        assert_eq!(&raw[32..], b"val-1");
    }

    #[test]
    fn test_distinct_validators_distinct_keys() {
        let hash = TxHash::new([0xaa; 32]);
        let a = AttestationKey::new(hash, AccountId::new("val-1"));
        let b = AttestationKey::new(hash, AccountId::new("val-2"));
        assert_ne!(a, b);
        assert_ne!(a.storage_key(), b.storage_key());
    }

    #[test]
    fn test_attestation_matches() {
        let attestation = Attestation::new(ValidatorSignature::new([0x30; 65]), 7);
        assert!(attestation.matches(&ValidatorSignature::new([0x30; 65])));
        assert!(!attestation.matches(&ValidatorSignature::new([0x31; 65])));
    }
}
