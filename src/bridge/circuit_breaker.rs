//! Circuit breaker: the global pause gating every value-moving operation.
//!
//! `Active → Paused` via pause (allowed from either state), `Paused → Active`
//! via resume (only from `Paused`), and initialize re-arms to `Active`
//! unconditionally. Reads and emergency withdrawals ignore the breaker.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::bridge::Bridge;
use crate::core::context::CallContext;
use crate::error::{Error, Result};
use crate::protocol::events::{BridgeEvent, CircuitStateChangedEvent};
use crate::storage::backend::{StorageBackend, WriteBatch};

// ═══════════════════════════════════════════════════════════════════════════════
// CIRCUIT STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircuitState {
    /// Normal operation
    Active,
    /// Value movement halted
    Paused,
}

impl CircuitState {
    /// State for a stored pause flag
    pub fn from_paused(paused: bool) -> Self {
        if paused {
            CircuitState::Paused
        } else {
            CircuitState::Active
        }
    }

    /// Stored pause flag for this state
    pub fn is_paused(&self) -> bool {
        matches!(self, CircuitState::Paused)
    }

    /// Check if deposits, confirmations and withdrawals are allowed
    pub fn allows_value_transfer(&self) -> bool {
        matches!(self, CircuitState::Active)
    }

    /// Transition for a pause request; valid from any state
    pub fn pause(self) -> CircuitState {
        CircuitState::Paused
    }

    /// Transition for a resume request; only valid while paused
    pub fn resume(self) -> Result<CircuitState> {
        match self {
            CircuitState::Paused => Ok(CircuitState::Active),
            CircuitState::Active => Err(Error::InvalidBridgeStatus),
        }
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Active => write!(f, "active"),
            CircuitState::Paused => write!(f, "paused"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BREAKER OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════════

impl<B: StorageBackend> Bridge<B> {
    /// Current breaker state
    pub fn circuit_state(&self) -> Result<CircuitState> {
        Ok(CircuitState::from_paused(self.store.load_paused()?))
    }

    /// Fail with `BridgePaused` unless value movement is allowed
    pub(crate) fn ensure_active(&self) -> Result<()> {
        if !self.circuit_state()?.allows_value_transfer() {
            return Err(Error::BridgePaused);
        }
        Ok(())
    }

    /// Owner-only: re-arm the bridge to `Active` regardless of current state
    pub fn initialize_bridge(&mut self, ctx: &CallContext) -> Result<bool> {
        self.require_owner(&ctx.caller)?;
        let previous = self.circuit_state()?;
        self.set_circuit_state(ctx, previous, CircuitState::Active)?;
        info!(owner = %ctx.caller, previous = %previous, "Bridge initialized");
        Ok(true)
    }

    /// Owner-only: halt value movement. Pausing an already paused bridge succeeds.
    pub fn pause_bridge(&mut self, ctx: &CallContext) -> Result<bool> {
        self.require_owner(&ctx.caller)?;
        let previous = self.circuit_state()?;
        self.set_circuit_state(ctx, previous, previous.pause())?;
        warn!(owner = %ctx.caller, "Bridge paused");
        Ok(true)
    }

    /// Owner-only: resume a paused bridge
    pub fn resume_bridge(&mut self, ctx: &CallContext) -> Result<bool> {
        self.require_owner(&ctx.caller)?;
        let previous = self.circuit_state()?;
        let next = previous.resume()?;
        self.set_circuit_state(ctx, previous, next)?;
        info!(owner = %ctx.caller, "Bridge resumed");
        Ok(true)
    }

    fn set_circuit_state(
        &mut self,
        ctx: &CallContext,
        previous: CircuitState,
        next: CircuitState,
    ) -> Result<()> {
        let mut batch = WriteBatch::new();
        self.store.stage_paused(&mut batch, next.is_paused())?;
        self.commit(
            batch,
            BridgeEvent::CircuitStateChanged(CircuitStateChangedEvent {
                owner: ctx.caller.clone(),
                previous,
                current: next,
                block_height: ctx.height,
            }),
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_state_allows_transfer() {
        assert!(CircuitState::Active.allows_value_transfer());
        assert!(!CircuitState::Paused.allows_value_transfer());
    }

    #[test]
    fn test_pause_from_any_state() {
        assert_eq!(CircuitState::Active.pause(), CircuitState::Paused);
        assert_eq!(CircuitState::Paused.pause(), CircuitState::Paused);
    }

    #[test]
    fn test_resume_requires_paused() {
        assert_eq!(CircuitState::Paused.resume(), Ok(CircuitState::Active));
        assert_eq!(CircuitState::Active.resume(), Err(Error::InvalidBridgeStatus));
    }

    #[test]
    fn test_pause_flag_roundtrip() {
        for state in [CircuitState::Active, CircuitState::Paused] {
            assert_eq!(CircuitState::from_paused(state.is_paused()), state);
        }
    }
}
