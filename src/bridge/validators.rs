//! Validator registry.
//!
//! Eligibility flags keyed by account. Removing a validator clears its flag
//! but leaves its attestations in the audit log.

use tracing::info;

use crate::bridge::Bridge;
use crate::core::context::CallContext;
use crate::error::Result;
use crate::protocol::events::{BridgeEvent, ValidatorChangedEvent};
use crate::storage::backend::{StorageBackend, WriteBatch};
use crate::utils::crypto::AccountId;
use crate::utils::validation::validate_validator_address;

impl<B: StorageBackend> Bridge<B> {
    /// Owner-only: register `validator`
    pub fn add_validator(&mut self, ctx: &CallContext, validator: AccountId) -> Result<bool> {
        self.set_validator(ctx, validator, true)
    }

    /// Owner-only: unregister `validator`
    pub fn remove_validator(&mut self, ctx: &CallContext, validator: AccountId) -> Result<bool> {
        self.set_validator(ctx, validator, false)
    }

    /// Whether `account` is currently eligible; false if never registered
    pub fn get_validator_status(&self, account: &AccountId) -> Result<bool> {
        self.store.is_validator(account)
    }

    /// Alias of [`Bridge::get_validator_status`]
    pub fn is_validator(&self, account: &AccountId) -> Result<bool> {
        self.get_validator_status(account)
    }

    /// Accounts currently flagged eligible
    pub fn active_validators(&self) -> Result<Vec<AccountId>> {
        self.store.load_active_validators()
    }

    fn set_validator(&mut self, ctx: &CallContext, validator: AccountId, eligible: bool) -> Result<bool> {
        self.require_owner(&ctx.caller)?;
        validate_validator_address(&validator, &self.config.owner, &self.config.bridge_identity)?;

        let mut batch = WriteBatch::new();
        self.store.stage_validator(&mut batch, &validator, eligible)?;
        self.commit(
            batch,
            BridgeEvent::ValidatorChanged(ValidatorChangedEvent {
                validator: validator.clone(),
                eligible,
                block_height: ctx.height,
            }),
        )?;

        info!(validator = %validator, eligible, "Validator registry updated");
        Ok(true)
    }
}
