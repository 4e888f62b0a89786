//! Host-supplied call context.

use serde::{Deserialize, Serialize};

use crate::utils::crypto::AccountId;

/// What the host ledger tells the gateway about the current call.
///
/// `caller` comes from the host's transaction-origin primitive and is treated
/// as unforgeable. `height` is the host block height and is only used to
/// timestamp records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Authenticated caller
    pub caller: AccountId,
    /// Current host block height
    pub height: u64,
}

impl CallContext {
    /// Create a new call context
    pub fn new(caller: impl Into<AccountId>, height: u64) -> Self {
        Self {
            caller: caller.into(),
            height,
        }
    }
}
