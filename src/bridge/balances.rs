//! Balance ledger: credits from confirmed deposits and emergency recovery,
//! debits from withdrawals.

use tracing::{info, warn};

use crate::bridge::Bridge;
use crate::core::context::CallContext;
use crate::error::{Error, Result};
use crate::protocol::events::{BridgeEvent, EmergencyWithdrawalEvent, WithdrawalEvent};
use crate::storage::backend::{StorageBackend, WriteBatch};
use crate::utils::crypto::{AccountId, BtcPublicKey};
use crate::utils::validation::{validate_amount, validate_btc_pubkey, validate_recipient_address};

/// Balance after crediting `amount`
pub fn credit(balance: u64, amount: u64) -> Result<u64> {
    balance.checked_add(amount).ok_or_else(|| Error::Overflow {
        operation: "credit".into(),
    })
}

/// Balance after debiting `amount`; never negative
pub fn debit(balance: u64, amount: u64) -> Result<u64> {
    balance.checked_sub(amount).ok_or(Error::InsufficientBalance)
}

impl<B: StorageBackend> Bridge<B> {
    /// Debit the caller's bridged balance for a Bitcoin payout.
    ///
    /// Accounting only: the BTC transfer to `btc_recipient` happens outside
    /// the gateway, driven by the emitted withdrawal event.
    pub fn withdraw(
        &mut self,
        ctx: &CallContext,
        amount: u64,
        btc_recipient: BtcPublicKey,
    ) -> Result<bool> {
        self.ensure_active()?;
        let new_balance = debit(self.store.load_balance(&ctx.caller)?, amount)?;
        validate_amount(amount, self.config.params.min_amount, self.config.params.max_amount)?;
        validate_btc_pubkey(&btc_recipient)?;

        let total = self.store.load_total_bridged()?;
        let new_total = total.checked_sub(amount).unwrap_or_else(|| {
            // Reachable once emergency credits have been withdrawn
            warn!(total, amount, "Total bridged would underflow, saturating at zero");
            0
        });

        let mut batch = WriteBatch::new();
        self.store.stage_balance(&mut batch, &ctx.caller, new_balance)?;
        self.store.stage_total_bridged(&mut batch, new_total)?;
        self.commit(
            batch,
            BridgeEvent::Withdrawal(WithdrawalEvent {
                sender: ctx.caller.clone(),
                amount,
                btc_recipient,
                block_height: ctx.height,
            }),
        )?;

        info!(sender = %ctx.caller, amount, btc_recipient = %btc_recipient, "Withdrawal recorded");
        Ok(true)
    }

    /// Owner-only credit for recovering stranded funds. Works while paused.
    ///
    /// Checked against the bridged total, but the total itself is left
    /// unchanged.
    pub fn emergency_withdraw(
        &mut self,
        ctx: &CallContext,
        amount: u64,
        recipient: AccountId,
    ) -> Result<bool> {
        self.require_owner(&ctx.caller)?;
        if self.store.load_total_bridged()? < amount {
            return Err(Error::InsufficientBalance);
        }
        validate_recipient_address(&recipient, &self.config.owner, &self.config.bridge_identity)?;

        let current = self.store.load_balance(&recipient)?;
        let new_balance = match current.checked_add(amount) {
            Some(balance) if balance > current => balance,
            _ => return Err(Error::InvalidAmount),
        };

        let mut batch = WriteBatch::new();
        self.store.stage_balance(&mut batch, &recipient, new_balance)?;
        self.commit(
            batch,
            BridgeEvent::EmergencyWithdrawal(EmergencyWithdrawalEvent {
                owner: ctx.caller.clone(),
                recipient: recipient.clone(),
                amount,
                block_height: ctx.height,
            }),
        )?;

        warn!(recipient = %recipient, amount, "Emergency withdrawal executed");
        Ok(true)
    }

    /// Bridged balance of an account; zero if never credited
    pub fn get_balance(&self, account: &AccountId) -> Result<u64> {
        self.store.load_balance(account)
    }
}
