//! Gateway state on top of a storage backend.
//!
//! [`BridgeStore`] maps the gateway's tables onto prefixed keys. Reads go
//! straight to the backend; writes are only ever staged into a
//! [`WriteBatch`] so the caller decides when they land.

use crate::bridge::attestations::{Attestation, AttestationKey};
use crate::bridge::deposits::DepositRecord;
use crate::error::{Error, Result};
use crate::storage::backend::{make_key, prefixes, StorageBackend, TypedStore, WriteBatch};
use crate::utils::constants::TX_HASH_LENGTH;
use crate::utils::crypto::{AccountId, TxHash};

const PAUSED_KEY: &[u8] = b"paused";
const TOTAL_BRIDGED_KEY: &[u8] = b"total_bridged";
const LAST_HEIGHT_KEY: &[u8] = b"last_height";

/// Typed access to the gateway's persisted tables
pub struct BridgeStore<B: StorageBackend> {
    store: TypedStore<B>,
}

impl<B: StorageBackend> BridgeStore<B> {
    /// Wrap a backend
    pub fn new(backend: B) -> Self {
        Self {
            store: TypedStore::new(backend),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DEPOSITS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Load a deposit record
    pub fn load_deposit(&self, tx_hash: &TxHash) -> Result<Option<DepositRecord>> {
        self.store.get(&make_key(prefixes::DEPOSIT, tx_hash.as_bytes()))
    }

    /// Stage a deposit record write
    pub fn stage_deposit(
        &self,
        batch: &mut WriteBatch,
        tx_hash: &TxHash,
        record: &DepositRecord,
    ) -> Result<()> {
        batch.put_typed(make_key(prefixes::DEPOSIT, tx_hash.as_bytes()), record)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Eligibility flag of an account; false if never registered
    pub fn is_validator(&self, account: &AccountId) -> Result<bool> {
        Ok(self
            .store
            .get::<bool>(&make_key(prefixes::VALIDATOR, account.as_bytes()))?
            .unwrap_or(false))
    }

    /// Stage an eligibility flag write
    pub fn stage_validator(
        &self,
        batch: &mut WriteBatch,
        account: &AccountId,
        eligible: bool,
    ) -> Result<()> {
        batch.put_typed(make_key(prefixes::VALIDATOR, account.as_bytes()), &eligible)
    }

    /// Accounts whose flag is set, sorted
    pub fn load_active_validators(&self) -> Result<Vec<AccountId>> {
        let mut validators = Vec::new();
        for key in self.store.list_prefix(prefixes::VALIDATOR)? {
            if self.store.get::<bool>(&key)?.unwrap_or(false) {
                validators.push(account_from_bytes(&key[prefixes::VALIDATOR.len()..])?);
            }
        }
        validators.sort();
        Ok(validators)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ATTESTATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Load one attestation
    pub fn load_attestation(&self, key: &AttestationKey) -> Result<Option<Attestation>> {
        self.store
            .get(&make_key(prefixes::ATTESTATION, &key.storage_key()))
    }

    /// Stage an attestation write
    pub fn stage_attestation(
        &self,
        batch: &mut WriteBatch,
        key: &AttestationKey,
        attestation: &Attestation,
    ) -> Result<()> {
        batch.put_typed(make_key(prefixes::ATTESTATION, &key.storage_key()), attestation)
    }

    /// Every attestation of one deposit, sorted by validator
    pub fn load_attestations_for(&self, tx_hash: &TxHash) -> Result<Vec<(AccountId, Attestation)>> {
        let prefix = make_key(prefixes::ATTESTATION, tx_hash.as_bytes());
        let mut attestations = Vec::new();

        for key in self.store.list_prefix(&prefix)? {
            if let Some(attestation) = self.store.get::<Attestation>(&key)? {
                let validator = account_from_bytes(&key[prefixes::ATTESTATION.len() + TX_HASH_LENGTH..])?;
                attestations.push((validator, attestation));
            }
        }

        attestations.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(attestations)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BALANCES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Balance of an account; zero if absent
    pub fn load_balance(&self, account: &AccountId) -> Result<u64> {
        Ok(self
            .store
            .get::<u64>(&make_key(prefixes::BALANCE, account.as_bytes()))?
            .unwrap_or(0))
    }

    /// Stage a balance write
    pub fn stage_balance(&self, batch: &mut WriteBatch, account: &AccountId, balance: u64) -> Result<()> {
        batch.put_typed(make_key(prefixes::BALANCE, account.as_bytes()), &balance)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SCALARS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Stored pause flag; false on a fresh store
    pub fn load_paused(&self) -> Result<bool> {
        self.load_scalar(PAUSED_KEY)
    }

    /// Stage a pause flag write
    pub fn stage_paused(&self, batch: &mut WriteBatch, paused: bool) -> Result<()> {
        batch.put_typed(make_key(prefixes::CONFIG, PAUSED_KEY), &paused)
    }

    /// Bridged total; zero on a fresh store
    pub fn load_total_bridged(&self) -> Result<u64> {
        self.load_scalar(TOTAL_BRIDGED_KEY)
    }

    /// Stage a bridged total write
    pub fn stage_total_bridged(&self, batch: &mut WriteBatch, total: u64) -> Result<()> {
        batch.put_typed(make_key(prefixes::CONFIG, TOTAL_BRIDGED_KEY), &total)
    }

    /// Last processed Bitcoin height; zero on a fresh store
    pub fn load_last_height(&self) -> Result<u64> {
        self.load_scalar(LAST_HEIGHT_KEY)
    }

    /// Stage a last processed height write
    pub fn stage_last_height(&self, batch: &mut WriteBatch, height: u64) -> Result<()> {
        batch.put_typed(make_key(prefixes::CONFIG, LAST_HEIGHT_KEY), &height)
    }

    fn load_scalar<T>(&self, name: &[u8]) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        Ok(self
            .store
            .get::<T>(&make_key(prefixes::CONFIG, name))?
            .unwrap_or_default())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // UTILITY METHODS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Apply staged writes in one backend call
    pub fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.store.commit(batch)
    }

    /// Flush the backend
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    /// Underlying backend
    pub fn backend(&self) -> &B {
        self.store.backend()
    }
}

fn account_from_bytes(bytes: &[u8]) -> Result<AccountId> {
    String::from_utf8(bytes.to_vec())
        .map(AccountId::new)
        .map_err(|e| Error::Deserialization(format!("Invalid account in key: {}", e)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::InMemoryStore;
    use crate::utils::crypto::{BtcPublicKey, ValidatorSignature};

    fn store() -> BridgeStore<InMemoryStore> {
        BridgeStore::new(InMemoryStore::new())
    }

    #[test]
    fn test_fresh_store_defaults() {
        let store = store();
        assert!(!store.load_paused().unwrap());
        assert_eq!(store.load_total_bridged().unwrap(), 0);
        assert_eq!(store.load_last_height().unwrap(), 0);
        assert_eq!(store.load_balance(&AccountId::new("nobody")).unwrap(), 0);
        assert!(!store.is_validator(&AccountId::new("nobody")).unwrap());
        assert!(store.load_deposit(&TxHash::new([1; 32])).unwrap().is_none());
    }

    #[test]
    fn test_staged_writes_invisible_until_commit() {
        let store = store();
        let account = AccountId::new("alice");

        let mut batch = WriteBatch::new();
        store.stage_balance(&mut batch, &account, 42).unwrap();
        store.stage_total_bridged(&mut batch, 42).unwrap();
        assert_eq!(store.load_balance(&account).unwrap(), 0);

        store.commit(batch).unwrap();
        assert_eq!(store.load_balance(&account).unwrap(), 42);
        assert_eq!(store.load_total_bridged().unwrap(), 42);
    }

    #[test]
    fn test_deposit_roundtrip() {
        let store = store();
        let hash = TxHash::new([7; 32]);
        let record = DepositRecord::new(
            250_000,
            AccountId::new("bob"),
            BtcPublicKey::new([2; 33]),
            9,
        );

        let mut batch = WriteBatch::new();
        store.stage_deposit(&mut batch, &hash, &record).unwrap();
        store.commit(batch).unwrap();

        assert_eq!(store.load_deposit(&hash).unwrap(), Some(record));
    }

    #[test]
    fn test_active_validators_skips_removed() {
        let store = store();
        let mut batch = WriteBatch::new();
        store.stage_validator(&mut batch, &AccountId::new("val-b"), true).unwrap();
        store.stage_validator(&mut batch, &AccountId::new("val-a"), true).unwrap();
        store.stage_validator(&mut batch, &AccountId::new("val-c"), false).unwrap();
        store.commit(batch).unwrap();

        assert_eq!(
            store.load_active_validators().unwrap(),
            vec![AccountId::new("val-a"), AccountId::new("val-b")]
        );
    }

    #[test]
    fn test_attestations_scoped_to_deposit() {
        let store = store();
        let first = TxHash::new([1; 32]);
        let second = TxHash::new([2; 32]);
        let attestation = Attestation::new(ValidatorSignature::new([9; 65]), 3);

        let mut batch = WriteBatch::new();
        for (hash, validator) in [(first, "val-2"), (first, "val-1"), (second, "val-1")] {
            let key = AttestationKey::new(hash, AccountId::new(validator));
            store.stage_attestation(&mut batch, &key, &attestation).unwrap();
        }
        store.commit(batch).unwrap();

        let listed = store.load_attestations_for(&first).unwrap();
        let validators: Vec<&str> = listed.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(validators, vec!["val-1", "val-2"]);
        assert_eq!(store.load_attestations_for(&second).unwrap().len(), 1);
    }
}
