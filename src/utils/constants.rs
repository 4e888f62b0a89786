//! Gateway constants and policy values.
//!
//! All gateway-wide constants are defined here for easy auditing and modification.

// ═══════════════════════════════════════════════════════════════════════════════
// BITCOIN CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Satoshis per Bitcoin (1 BTC = 100,000,000 satoshis)
pub const SATS_PER_BTC: u64 = 100_000_000;

// ═══════════════════════════════════════════════════════════════════════════════
// DEPOSIT POLICY
// ═══════════════════════════════════════════════════════════════════════════════

/// Minimum amount accepted for deposits and withdrawals (0.001 BTC)
pub const MIN_DEPOSIT_AMOUNT: u64 = 100_000;

/// Maximum amount accepted for deposits and withdrawals (10 BTC)
pub const MAX_DEPOSIT_AMOUNT: u64 = 1_000_000_000;

/// Bitcoin confirmations required before a deposit can be confirmed
pub const REQUIRED_CONFIRMATIONS: u64 = 6;

// ═══════════════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Events kept in memory between drains; older ones are dropped first
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 1_024;

// ═══════════════════════════════════════════════════════════════════════════════
// BYTE LENGTHS
// ═══════════════════════════════════════════════════════════════════════════════

/// Length of a Bitcoin transaction hash in bytes
pub const TX_HASH_LENGTH: usize = 32;

/// Length of a compressed secp256k1 public key in bytes
pub const BTC_PUBKEY_LENGTH: usize = 33;

/// Length of a recoverable validator signature in bytes
pub const SIGNATURE_LENGTH: usize = 65;

// ═══════════════════════════════════════════════════════════════════════════════
// ACCOUNT IDENTIFIERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Shortest accepted host-chain account identifier
pub const MIN_ACCOUNT_ID_LENGTH: usize = 2;

/// Longest accepted host-chain account identifier
pub const MAX_ACCOUNT_ID_LENGTH: usize = 128;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_bounds() {
        assert!(MIN_DEPOSIT_AMOUNT < MAX_DEPOSIT_AMOUNT);
        assert!(MAX_DEPOSIT_AMOUNT <= 21_000_000 * SATS_PER_BTC);
    }

    #[test]
    fn test_account_id_bounds() {
        assert!(MIN_ACCOUNT_ID_LENGTH > 0);
        assert!(MIN_ACCOUNT_ID_LENGTH < MAX_ACCOUNT_ID_LENGTH);
    }
}
