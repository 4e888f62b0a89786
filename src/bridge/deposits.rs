//! Deposit ledger: the record of every observed Bitcoin deposit and the
//! operations that move it from `Pending` to `Processed`.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::bridge::attestations::{Attestation, AttestationKey};
use crate::bridge::balances::credit;
use crate::bridge::Bridge;
use crate::core::context::CallContext;
use crate::error::{Error, Result};
use crate::protocol::events::{
    BridgeEvent, ConfirmationsUpdatedEvent, DepositConfirmedEvent, DepositInitiatedEvent,
};
use crate::storage::backend::{StorageBackend, WriteBatch};
use crate::utils::crypto::{AccountId, BtcPublicKey, TxHash, ValidatorSignature};
use crate::utils::validation::{
    validate_amount, validate_btc_pubkey, validate_recipient_address, validate_signature_format,
    validate_tx_hash,
};

// ═══════════════════════════════════════════════════════════════════════════════
// DEPOSIT RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// Lifecycle position of a deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositStatus {
    /// No record exists for the hash
    Unseen,
    /// Recorded, waiting for confirmations and a validator attestation
    Pending {
        /// Confirmations last reported by the watcher
        confirmations: u64,
    },
    /// Finalized; the recipient has been credited
    Processed,
}

impl DepositStatus {
    /// Status of an optional record
    pub fn of(record: Option<&DepositRecord>) -> Self {
        record.map_or(DepositStatus::Unseen, DepositRecord::status)
    }
}

/// One observed Bitcoin deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    /// Amount in satoshis
    pub amount: u64,
    /// Host-chain account credited on confirmation
    pub recipient: AccountId,
    /// Set exactly once, by a successful confirmation
    pub processed: bool,
    /// Bitcoin confirmations reported by the watcher
    pub confirmations: u64,
    /// Host height at initiation
    pub created_at: u64,
    /// Sender's Bitcoin public key
    pub btc_sender: BtcPublicKey,
}

impl DepositRecord {
    /// New pending record with zero confirmations
    pub fn new(amount: u64, recipient: AccountId, btc_sender: BtcPublicKey, created_at: u64) -> Self {
        Self {
            amount,
            recipient,
            processed: false,
            confirmations: 0,
            created_at,
            btc_sender,
        }
    }

    /// Current lifecycle status
    pub fn status(&self) -> DepositStatus {
        if self.processed {
            DepositStatus::Processed
        } else {
            DepositStatus::Pending {
                confirmations: self.confirmations,
            }
        }
    }

    /// Whether the watcher has reported at least `required` confirmations
    pub fn has_confirmations(&self, required: u64) -> bool {
        self.confirmations >= required
    }

    /// Overwrite the confirmation count. Any value is accepted, including a
    /// lower one; processed records are frozen.
    pub fn set_confirmations(&mut self, confirmations: u64) -> Result<()> {
        if self.processed {
            return Err(Error::AlreadyProcessed);
        }
        self.confirmations = confirmations;
        Ok(())
    }

    /// Finalize the record
    pub fn mark_processed(&mut self) -> Result<()> {
        if self.processed {
            return Err(Error::AlreadyProcessed);
        }
        self.processed = true;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEPOSIT OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════════

impl<B: StorageBackend> Bridge<B> {
    /// Record a newly observed Bitcoin deposit.
    ///
    /// Called by a validator on behalf of the off-chain watcher. Checks run in
    /// a fixed order and the first failure is returned.
    pub fn initiate_deposit(
        &mut self,
        ctx: &CallContext,
        tx_hash: TxHash,
        amount: u64,
        recipient: AccountId,
        btc_sender: BtcPublicKey,
    ) -> Result<bool> {
        self.ensure_active()?;
        validate_amount(amount, self.config.params.min_amount, self.config.params.max_amount)?;
        self.require_validator(&ctx.caller)?;
        validate_tx_hash(&tx_hash)?;
        if self.store.load_deposit(&tx_hash)?.is_some() {
            return Err(Error::AlreadyProcessed);
        }
        validate_recipient_address(&recipient, &self.config.owner, &self.config.bridge_identity)?;
        validate_btc_pubkey(&btc_sender)?;

        let record = DepositRecord::new(amount, recipient.clone(), btc_sender, ctx.height);

        let mut batch = WriteBatch::new();
        self.store.stage_deposit(&mut batch, &tx_hash, &record)?;
        self.commit(
            batch,
            BridgeEvent::DepositInitiated(DepositInitiatedEvent {
                tx_hash,
                amount,
                recipient: recipient.clone(),
                btc_sender,
                validator: ctx.caller.clone(),
                block_height: ctx.height,
            }),
        )?;

        info!(
            tx_hash = %tx_hash,
            amount,
            recipient = %recipient,
            validator = %ctx.caller,
            "Deposit initiated"
        );
        Ok(true)
    }

    /// Overwrite the confirmation count of a pending deposit.
    ///
    /// Maintenance path for the off-chain watcher. The count is not required
    /// to grow, and the call is neither caller-restricted nor pause-gated.
    pub fn update_confirmations(
        &mut self,
        ctx: &CallContext,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<bool> {
        let mut record = self
            .store
            .load_deposit(&tx_hash)?
            .ok_or(Error::InvalidBridgeStatus)?;

        let previous = record.confirmations;
        record.set_confirmations(confirmations)?;
        if confirmations < previous {
            warn!(tx_hash = %tx_hash, previous, confirmations, "Confirmation count decreased");
        }

        let mut batch = WriteBatch::new();
        self.store.stage_deposit(&mut batch, &tx_hash, &record)?;
        self.commit(
            batch,
            BridgeEvent::ConfirmationsUpdated(ConfirmationsUpdatedEvent {
                tx_hash,
                previous,
                confirmations,
                reporter: ctx.caller.clone(),
                block_height: ctx.height,
            }),
        )?;

        Ok(true)
    }

    /// Attest to a deposit and finalize it.
    ///
    /// The first registered validator whose attestation passes every check
    /// finalizes the deposit: the attestation is logged, the record is marked
    /// processed, the recipient is credited and the bridged total grows, all
    /// in one batch. There is no quorum over attestations.
    pub fn confirm_deposit(
        &mut self,
        ctx: &CallContext,
        tx_hash: TxHash,
        signature: ValidatorSignature,
    ) -> Result<bool> {
        let mut record = self
            .store
            .load_deposit(&tx_hash)?
            .ok_or(Error::InvalidBridgeStatus)?;
        self.require_validator(&ctx.caller)?;
        self.ensure_active()?;
        validate_tx_hash(&tx_hash)?;
        validate_signature_format(&signature)?;
        if record.processed {
            return Err(Error::AlreadyProcessed);
        }
        if !record.has_confirmations(self.config.params.required_confirmations) {
            return Err(Error::InvalidBridgeStatus);
        }
        let key = AttestationKey::new(tx_hash, ctx.caller.clone());
        if self.store.load_attestation(&key)?.is_some() {
            return Err(Error::AlreadyProcessed);
        }

        let new_balance = credit(self.store.load_balance(&record.recipient)?, record.amount)?;
        let new_total = self
            .store
            .load_total_bridged()?
            .checked_add(record.amount)
            .ok_or_else(|| Error::Overflow {
                operation: "total_bridged".into(),
            })?;
        record.mark_processed()?;

        let mut batch = WriteBatch::new();
        self.store
            .stage_attestation(&mut batch, &key, &Attestation::new(signature, ctx.height))?;
        self.store.stage_deposit(&mut batch, &tx_hash, &record)?;
        self.store.stage_balance(&mut batch, &record.recipient, new_balance)?;
        self.store.stage_total_bridged(&mut batch, new_total)?;
        self.commit(
            batch,
            BridgeEvent::DepositConfirmed(DepositConfirmedEvent {
                tx_hash,
                amount: record.amount,
                recipient: record.recipient.clone(),
                validator: ctx.caller.clone(),
                block_height: ctx.height,
            }),
        )?;

        info!(
            tx_hash = %tx_hash,
            amount = record.amount,
            recipient = %record.recipient,
            validator = %ctx.caller,
            total_bridged = new_total,
            "Deposit confirmed"
        );
        Ok(true)
    }

    /// Look up a deposit record
    pub fn get_deposit(&self, tx_hash: &TxHash) -> Result<Option<DepositRecord>> {
        self.store.load_deposit(tx_hash)
    }

    /// Lifecycle status of a deposit
    pub fn get_deposit_status(&self, tx_hash: &TxHash) -> Result<DepositStatus> {
        Ok(DepositStatus::of(self.store.load_deposit(tx_hash)?.as_ref()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
