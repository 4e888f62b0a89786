//! Bridge orchestrator.
//!
//! [`Bridge`] owns the gateway's store and exposes the public operation set.
//! The operations are grouped by concern:
//!
//! - [`access`]: owner and validator gates
//! - [`validators`]: validator registry
//! - [`circuit_breaker`]: initialize / pause / resume
//! - [`deposits`]: initiate, update confirmations, confirm
//! - [`attestations`]: signature audit log queries
//! - [`balances`]: withdraw, emergency withdraw, balances
//!
//! Every mutating operation checks all of its preconditions against the
//! store first, stages its writes in one [`WriteBatch`] and commits it with a
//! single backend call. A rejected operation leaves no trace.

pub mod access;
pub mod attestations;
pub mod balances;
pub mod circuit_breaker;
pub mod deposits;
pub mod validators;

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::core::config::BridgeConfig;
use crate::core::context::CallContext;
use crate::error::{Error, Result};
use crate::logging::log_event;
use crate::protocol::events::{BridgeEvent, EventLog, HeightUpdatedEvent};
use crate::storage::backend::{StorageBackend, WriteBatch};
use crate::storage::state::BridgeStore;

pub use attestations::{Attestation, AttestationKey};
pub use circuit_breaker::CircuitState;
pub use deposits::{DepositRecord, DepositStatus};

// ═══════════════════════════════════════════════════════════════════════════════
// BRIDGE STATUS
// ═══════════════════════════════════════════════════════════════════════════════

/// Snapshot returned by [`Bridge::get_bridge_status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeStatus {
    /// Circuit breaker state
    pub state: CircuitState,
    /// Sum of confirmed deposits minus withdrawals
    pub total_bridged: u64,
    /// Last Bitcoin block height reported as processed
    pub last_processed_height: u64,
}

impl BridgeStatus {
    /// Whether value movement is halted
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BRIDGE
// ═══════════════════════════════════════════════════════════════════════════════

/// One gateway instance: configuration, injected store and event log
pub struct Bridge<B: StorageBackend> {
    /// Persistent tables and scalars
    store: BridgeStore<B>,
    /// Deployment configuration
    config: BridgeConfig,
    /// Events emitted since the last [`Bridge::take_events`]
    event_log: EventLog,
}

impl<B: StorageBackend> Bridge<B> {
    /// Create a bridge over `backend`.
    ///
    /// Existing state in the backend is picked up as-is; a fresh backend
    /// starts active with no validators, deposits or balances.
    pub fn new(backend: B, config: BridgeConfig) -> Result<Self> {
        config.validate()?;
        info!(
            owner = %config.owner,
            identity = %config.bridge_identity,
            required_confirmations = config.params.required_confirmations,
            "Bridge opened"
        );
        Ok(Self {
            store: BridgeStore::new(backend),
            event_log: EventLog::with_capacity(config.event_log_capacity),
            config,
        })
    }

    /// Deployment configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Underlying store
    pub fn store(&self) -> &BridgeStore<B> {
        &self.store
    }

    /// Most recent events emitted since the last call.
    ///
    /// Bounded by `event_log_capacity`; every event is also forwarded to the
    /// tracing subscriber under [`crate::logging::EVENT_TARGET`].
    pub fn events(&self) -> &EventLog {
        &self.event_log
    }

    /// Drain the event log
    pub fn take_events(&mut self) -> EventLog {
        let fresh = EventLog::with_capacity(self.config.event_log_capacity);
        std::mem::replace(&mut self.event_log, fresh)
    }

    /// Flush the backend to persistent storage.
    ///
    /// A [`FileStore`](crate::storage::backend::FileStore) keeps committed
    /// writes in memory until this is called or the store is dropped. Drop
    /// does not run when the process aborts (including `panic = "abort"`
    /// builds), so hosts should either call this after each operation or open
    /// the store with `FileStore::with_flush_on_commit(true)`.
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    /// Apply staged writes, then forward and record the operation's event
    fn commit(&mut self, batch: WriteBatch, event: BridgeEvent) -> Result<()> {
        self.store.commit(batch)?;
        debug!(event = event.event_type(), "Committed");
        // The writes have landed; a forwarding failure must not undo the call.
        if let Err(e) = log_event(&event) {
            warn!(error = %e, event = event.event_type(), "Failed to forward event");
        }
        self.event_log.push(event);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // AGGREGATES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Circuit state and aggregate counters
    pub fn get_bridge_status(&self) -> Result<BridgeStatus> {
        Ok(BridgeStatus {
            state: self.circuit_state()?,
            total_bridged: self.store.load_total_bridged()?,
            last_processed_height: self.store.load_last_height()?,
        })
    }

    /// Sum of confirmed deposits minus withdrawals
    pub fn total_bridged(&self) -> Result<u64> {
        self.store.load_total_bridged()
    }

    /// Last Bitcoin block height reported as processed
    pub fn last_processed_height(&self) -> Result<u64> {
        self.store.load_last_height()
    }

    /// Validator-only: record the Bitcoin height the watcher has processed up to.
    ///
    /// Tracked for observability; nothing else depends on it. The height may
    /// not move backwards.
    pub fn update_last_processed_height(&mut self, ctx: &CallContext, height: u64) -> Result<bool> {
        self.require_validator(&ctx.caller)?;
        let previous = self.store.load_last_height()?;
        if height < previous {
            return Err(Error::InvalidBridgeStatus);
        }

        let mut batch = WriteBatch::new();
        self.store.stage_last_height(&mut batch, height)?;
        self.commit(
            batch,
            BridgeEvent::HeightUpdated(HeightUpdatedEvent {
                previous,
                height,
                reporter: ctx.caller.clone(),
                block_height: ctx.height,
            }),
        )?;
        Ok(true)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHARED BRIDGE
// ═══════════════════════════════════════════════════════════════════════════════

/// Thread-safe handle for hosts that dispatch calls from several threads.
///
/// Every mutation holds the write lock for the whole operation, so
/// operations are serialized exactly as the host ledger would serialize them.
pub struct SharedBridge<B: StorageBackend> {
    inner: Arc<RwLock<Bridge<B>>>,
}

impl<B: StorageBackend> Clone for SharedBridge<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: StorageBackend> SharedBridge<B> {
    /// Wrap a bridge
    pub fn new(bridge: Bridge<B>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(bridge)),
        }
    }

    /// Run a mutating operation under the exclusive lock
    pub fn write<R>(&self, op: impl FnOnce(&mut Bridge<B>) -> Result<R>) -> Result<R> {
        let mut bridge = self.inner.write().map_err(|_| Error::Lock)?;
        op(&mut bridge)
    }

    /// Run a query under the shared lock
    pub fn read<R>(&self, query: impl FnOnce(&Bridge<B>) -> Result<R>) -> Result<R> {
        let bridge = self.inner.read().map_err(|_| Error::Lock)?;
        query(&bridge)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
