//! Access control: the owner gate and the validator gate.

use tracing::warn;

use crate::bridge::Bridge;
use crate::error::{Error, Result};
use crate::storage::backend::StorageBackend;
use crate::utils::crypto::AccountId;

impl<B: StorageBackend> Bridge<B> {
    /// Whether `account` is the deployment owner
    pub fn is_owner(&self, account: &AccountId) -> bool {
        *account == self.config.owner
    }

    /// Fail with `NotAuthorized` unless `caller` is the owner
    pub(crate) fn require_owner(&self, caller: &AccountId) -> Result<()> {
        if !self.is_owner(caller) {
            warn!(caller = %caller, "Rejected owner-only call");
            return Err(Error::NotAuthorized);
        }
        Ok(())
    }

    /// Fail with `NotAuthorized` unless `caller` is a registered validator
    pub(crate) fn require_validator(&self, caller: &AccountId) -> Result<()> {
        if !self.store.is_validator(caller)? {
            warn!(caller = %caller, "Rejected validator-only call");
            return Err(Error::NotAuthorized);
        }
        Ok(())
    }
}
