//! Gateway events for state change notifications.
//!
//! Every successful mutating operation emits exactly one event after its
//! writes commit. Rejected operations emit nothing. Events serialize to the
//! JSON envelope `{"event": "<name>", "data": {...}}` for off-chain indexers.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::bridge::circuit_breaker::CircuitState;
use crate::error::{Error, Result};
use crate::utils::constants::DEFAULT_EVENT_LOG_CAPACITY;
use crate::utils::crypto::{AccountId, BtcPublicKey, TxHash};

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// All gateway event types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event", content = "data")]
pub enum BridgeEvent {
    // Deposit Events
    /// A validator recorded a new deposit
    DepositInitiated(DepositInitiatedEvent),
    /// The watcher reported a new confirmation count
    ConfirmationsUpdated(ConfirmationsUpdatedEvent),
    /// A deposit was attested, finalized and credited
    DepositConfirmed(DepositConfirmedEvent),

    // Balance Events
    /// A holder debited their balance for a Bitcoin payout
    Withdrawal(WithdrawalEvent),
    /// The owner credited a recipient outside the deposit flow
    EmergencyWithdrawal(EmergencyWithdrawalEvent),

    // Admin Events
    /// Initialize, pause or resume
    CircuitStateChanged(CircuitStateChangedEvent),
    /// A validator was added or removed
    ValidatorChanged(ValidatorChangedEvent),
    /// The watcher advanced its processed height
    HeightUpdated(HeightUpdatedEvent),
}

impl BridgeEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::DepositInitiated(_) => "DepositInitiated",
            Self::ConfirmationsUpdated(_) => "ConfirmationsUpdated",
            Self::DepositConfirmed(_) => "DepositConfirmed",
            Self::Withdrawal(_) => "Withdrawal",
            Self::EmergencyWithdrawal(_) => "EmergencyWithdrawal",
            Self::CircuitStateChanged(_) => "CircuitStateChanged",
            Self::ValidatorChanged(_) => "ValidatorChanged",
            Self::HeightUpdated(_) => "HeightUpdated",
        }
    }

    /// Host height of the call that emitted the event
    pub fn block_height(&self) -> u64 {
        match self {
            Self::DepositInitiated(e) => e.block_height,
            Self::ConfirmationsUpdated(e) => e.block_height,
            Self::DepositConfirmed(e) => e.block_height,
            Self::Withdrawal(e) => e.block_height,
            Self::EmergencyWithdrawal(e) => e.block_height,
            Self::CircuitStateChanged(e) => e.block_height,
            Self::ValidatorChanged(e) => e.block_height,
            Self::HeightUpdated(e) => e.block_height,
        }
    }

    /// Deposit the event refers to, if any
    pub fn tx_hash(&self) -> Option<&TxHash> {
        match self {
            Self::DepositInitiated(e) => Some(&e.tx_hash),
            Self::ConfirmationsUpdated(e) => Some(&e.tx_hash),
            Self::DepositConfirmed(e) => Some(&e.tx_hash),
            _ => None,
        }
    }

    /// JSON envelope
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::Serialization(format!("Failed to encode event: {}", e)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEPOSIT EVENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Deposit recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositInitiatedEvent {
    /// Bitcoin transaction hash
    pub tx_hash: TxHash,
    /// Amount in satoshis
    pub amount: u64,
    /// Account to credit on confirmation
    pub recipient: AccountId,
    /// Sender's Bitcoin public key
    pub btc_sender: BtcPublicKey,
    /// Validator that recorded it
    pub validator: AccountId,
    /// Host height
    pub block_height: u64,
}

/// Confirmation count overwritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationsUpdatedEvent {
    /// Bitcoin transaction hash
    pub tx_hash: TxHash,
    /// Count before the update
    pub previous: u64,
    /// Count after the update
    pub confirmations: u64,
    /// Caller that reported it
    pub reporter: AccountId,
    /// Host height
    pub block_height: u64,
}

/// Deposit finalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositConfirmedEvent {
    /// Bitcoin transaction hash
    pub tx_hash: TxHash,
    /// Credited amount
    pub amount: u64,
    /// Credited account
    pub recipient: AccountId,
    /// Finalizing validator
    pub validator: AccountId,
    /// Host height
    pub block_height: u64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// BALANCE EVENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Balance debited for a Bitcoin payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalEvent {
    /// Debited account
    pub sender: AccountId,
    /// Amount in satoshis
    pub amount: u64,
    /// Bitcoin public key to pay
    pub btc_recipient: BtcPublicKey,
    /// Host height
    pub block_height: u64,
}

/// Owner credit outside the deposit flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyWithdrawalEvent {
    /// Owner that issued it
    pub owner: AccountId,
    /// Credited account
    pub recipient: AccountId,
    /// Amount in satoshis
    pub amount: u64,
    /// Host height
    pub block_height: u64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADMIN EVENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Breaker state written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitStateChangedEvent {
    /// Owner that issued it
    pub owner: AccountId,
    /// State before
    pub previous: CircuitState,
    /// State after
    pub current: CircuitState,
    /// Host height
    pub block_height: u64,
}

/// Validator flag written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorChangedEvent {
    /// Affected account
    pub validator: AccountId,
    /// New eligibility
    pub eligible: bool,
    /// Host height
    pub block_height: u64,
}

/// Processed Bitcoin height advanced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightUpdatedEvent {
    /// Height before
    pub previous: u64,
    /// Height after
    pub height: u64,
    /// Reporting validator
    pub reporter: AccountId,
    /// Host height
    pub block_height: u64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT LOG
// ═══════════════════════════════════════════════════════════════════════════════

/// Most recent events emitted by a bridge.
///
/// Holds at most `capacity` events; pushing into a full log evicts the
/// oldest one and counts it in [`EventLog::dropped`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: VecDeque<BridgeEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_LOG_CAPACITY)
    }
}

impl EventLog {
    /// Create new event log with the default capacity
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an event log keeping at most `capacity` events
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_EVENT_LOG_CAPACITY)),
            capacity,
            dropped: 0,
        }
    }

    /// Add event to log, evicting the oldest when full
    pub fn push(&mut self, event: BridgeEvent) {
        if self.capacity == 0 {
            self.dropped = self.dropped.saturating_add(1);
            return;
        }
        while self.events.len() >= self.capacity {
            self.events.pop_front();
            self.dropped = self.dropped.saturating_add(1);
        }
        self.events.push_back(event);
    }

    /// Retained events, oldest first
    pub fn events(&self) -> &VecDeque<BridgeEvent> {
        &self.events
    }

    /// Get events by type
    pub fn filter_by_type(&self, event_type: &str) -> Vec<&BridgeEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Events concerning one deposit
    pub fn for_deposit(&self, tx_hash: &TxHash) -> Vec<&BridgeEvent> {
        self.events
            .iter()
            .filter(|e| e.tx_hash() == Some(tx_hash))
            .collect()
    }

    /// Maximum number of retained events
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events evicted since the log was created
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Get event count
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl IntoIterator for EventLog {
    type Item = BridgeEvent;
    type IntoIter = std::collections::vec_deque::IntoIter<BridgeEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn deposit_event(byte: u8) -> BridgeEvent {
        BridgeEvent::DepositInitiated(DepositInitiatedEvent {
            tx_hash: TxHash::new([byte; 32]),
            amount: 500_000,
            recipient: AccountId::new("alice"),
            btc_sender: BtcPublicKey::new([0x02; 33]),
            validator: AccountId::new("val-1"),
            block_height: 12,
        })
    }

    #[test]
    fn test_event_types() {
        let event = deposit_event(1);
        assert_eq!(event.event_type(), "DepositInitiated");
        assert_eq!(event.block_height(), 12);
        assert_eq!(event.tx_hash(), Some(&TxHash::new([1; 32])));

        let paused = BridgeEvent::CircuitStateChanged(CircuitStateChangedEvent {
            owner: AccountId::new("owner"),
            previous: CircuitState::Active,
            current: CircuitState::Paused,
            block_height: 3,
        });
        assert_eq!(paused.event_type(), "CircuitStateChanged");
        assert!(paused.tx_hash().is_none());
    }

    #[test]
    fn test_event_json_envelope() {
        let json = deposit_event(0xab).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["event"], "deposit_initiated");
        assert_eq!(value["data"]["amount"], 500_000);
        assert_eq!(value["data"]["recipient"], "alice");
        assert_eq!(value["data"]["tx_hash"], "ab".repeat(32));

        let decoded: BridgeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, deposit_event(0xab));
    }

    #[test]
    fn test_event_log() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.push(deposit_event(1));
        log.push(deposit_event(2));
        log.push(BridgeEvent::ValidatorChanged(ValidatorChangedEvent {
            validator: AccountId::new("val-2"),
            eligible: true,
            block_height: 4,
        }));

        assert_eq!(log.len(), 3);
        assert_eq!(log.filter_by_type("DepositInitiated").len(), 2);
        assert_eq!(log.for_deposit(&TxHash::new([2; 32])).len(), 1);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_event_log_evicts_oldest() {
        let mut log = EventLog::with_capacity(2);
        for byte in 1..=5 {
            log.push(deposit_event(byte));
        }

        assert_eq!(log.len(), 2);
        assert_eq!(log.capacity(), 2);
        assert_eq!(log.dropped(), 3);
        assert_eq!(log.events()[0], deposit_event(4));
        assert_eq!(log.events()[1], deposit_event(5));
        assert!(log.for_deposit(&TxHash::new([1; 32])).is_empty());
    }

    #[test]
    fn test_zero_capacity_log_retains_nothing() {
        let mut log = EventLog::with_capacity(0);
        log.push(deposit_event(1));
        assert!(log.is_empty());
        assert_eq!(log.dropped(), 1);
    }
}
