//! # BTC Gateway
//!
//! Custody and accounting core of a Bitcoin-to-host-chain bridge. An
//! off-chain watcher, acting through registered validators, reports Bitcoin
//! deposits; once a deposit has enough confirmations a validator attests to
//! it and the recipient is credited with bridged satoshis. Holders withdraw
//! by debiting that balance.
//!
//! ## Architecture
//!
//! - **Bridge**: the orchestrator and its operations, split by concern
//! - **Storage**: injectable key-value backends with atomic write batches
//! - **Protocol**: events emitted by successful operations
//! - **Core**: configuration and call context
//! - **Utils**: fixed-length byte types, constants, input validation
//!
//! ## Example
//!
//! ```rust,ignore
//! use btc_gateway::prelude::*;
//!
//! let config = BridgeConfig::new("owner".into(), "gateway.bridge".into());
//! let mut bridge = Bridge::new(InMemoryStore::new(), config)?;
//!
//! bridge.add_validator(&CallContext::new("owner", 1), "val-1".into())?;
//! bridge.initiate_deposit(&CallContext::new("val-1", 2), tx_hash, 500_000, "alice".into(), sender)?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications
)]

pub mod bridge;
pub mod core;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod storage;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bridge::{
        Attestation, AttestationKey, Bridge, BridgeStatus, CircuitState, DepositRecord,
        DepositStatus, SharedBridge,
    };
    pub use crate::core::{
        config::{BridgeConfig, BridgeParams},
        context::CallContext,
    };
    pub use crate::error::{Error, Result};
    pub use crate::protocol::events::{BridgeEvent, EventLog};
    pub use crate::storage::backend::{FileStore, InMemoryStore, StorageBackend};
    pub use crate::utils::crypto::{AccountId, BtcPublicKey, TxHash, ValidatorSignature};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
