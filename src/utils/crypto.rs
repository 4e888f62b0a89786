//! Fixed-length byte types and identifiers used by the gateway.
//!
//! - Transaction hashes (32 bytes)
//! - Bitcoin public keys (33 bytes, compressed secp256k1)
//! - Validator signatures (65 bytes, opaque)
//! - Host-chain account identifiers
//!
//! Lengths are enforced when a value is built from a slice. Whether the bytes
//! are meaningful (non-zero, a real transaction, a valid curve point) is not
//! decided here; see [`crate::utils::validation`]. Signatures are never
//! verified against a public key inside the gateway.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{Error, Result};
use crate::utils::constants::{BTC_PUBKEY_LENGTH, SIGNATURE_LENGTH, TX_HASH_LENGTH};

/// Serialize fixed-length bytes as a hex string.
macro_rules! impl_hex_serde {
    ($name:ident, $len:expr) => {
        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&hex::encode(self.0))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
                if bytes.len() != $len {
                    return Err(serde::de::Error::custom(format!(
                        "expected {} bytes, got {}",
                        $len,
                        bytes.len()
                    )));
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(&bytes);
                Ok($name(arr))
            }
        }
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSACTION HASH
// ═══════════════════════════════════════════════════════════════════════════════

/// A 32-byte Bitcoin transaction identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxHash([u8; TX_HASH_LENGTH]);

impl_hex_serde!(TxHash, TX_HASH_LENGTH);

impl TxHash {
    /// Create a new hash from bytes
    pub fn new(bytes: [u8; TX_HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create a hash from a slice (must be exactly 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != TX_HASH_LENGTH {
            return Err(Error::InvalidTxHash);
        }
        let mut bytes = [0u8; TX_HASH_LENGTH];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Create from hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidTxHash)?;
        Self::from_slice(&bytes)
    }

    /// Compute the Bitcoin txid of serialized transaction bytes (double SHA256).
    ///
    /// The bytes are hashed as given; nothing is parsed.
    pub fn double_sha256(data: &[u8]) -> Self {
        let first = Sha256::digest(data);
        let second = Sha256::digest(first);
        let mut bytes = [0u8; TX_HASH_LENGTH];
        bytes.copy_from_slice(&second);
        Self(bytes)
    }

    /// Zero hash, the "no transaction" sentinel
    pub fn zero() -> Self {
        Self([0u8; TX_HASH_LENGTH])
    }

    /// Check if hash is the zero sentinel
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; TX_HASH_LENGTH]
    }

    /// Get the hash as bytes
    pub fn as_bytes(&self) -> &[u8; TX_HASH_LENGTH] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short form for logs
    pub fn short(&self) -> String {
        self.to_hex()[..16].to_string()
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self.short())
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for TxHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BITCOIN PUBLIC KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// A 33-byte compressed Bitcoin public key identifying a BTC sender or destination
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BtcPublicKey([u8; BTC_PUBKEY_LENGTH]);

impl_hex_serde!(BtcPublicKey, BTC_PUBKEY_LENGTH);

impl BtcPublicKey {
    /// Create from bytes
    pub fn new(bytes: [u8; BTC_PUBKEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice (must be exactly 33 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != BTC_PUBKEY_LENGTH {
            return Err(Error::InvalidBtcAddress);
        }
        let mut bytes = [0u8; BTC_PUBKEY_LENGTH];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Create from hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidBtcAddress)?;
        Self::from_slice(&bytes)
    }

    /// Check if every byte is zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; BTC_PUBKEY_LENGTH]
    }

    /// Get the key as bytes
    pub fn as_bytes(&self) -> &[u8; BTC_PUBKEY_LENGTH] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for BtcPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BtcPublicKey({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for BtcPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VALIDATOR SIGNATURE
// ═══════════════════════════════════════════════════════════════════════════════

/// A 65-byte validator attestation signature, stored and compared but never verified
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidatorSignature([u8; SIGNATURE_LENGTH]);

impl_hex_serde!(ValidatorSignature, SIGNATURE_LENGTH);

impl ValidatorSignature {
    /// Create from bytes
    pub fn new(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice (must be exactly 65 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != SIGNATURE_LENGTH {
            return Err(Error::InvalidSignatureFormat);
        }
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Create from hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidSignatureFormat)?;
        Self::from_slice(&bytes)
    }

    /// Check if every byte is zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; SIGNATURE_LENGTH]
    }

    /// Get the signature as bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ValidatorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidatorSignature({}...)", &self.to_hex()[..16])
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ACCOUNT ID
// ═══════════════════════════════════════════════════════════════════════════════

/// A host-chain account identifier.
///
/// The host authenticates callers and hands the gateway their identifier; the
/// gateway treats it as opaque apart from the shape checks in
/// [`AccountId::is_well_formed`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap an identifier without checking its shape
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier bytes, used for storage keys
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Whether the identifier has the shape of a host account.
    ///
    /// Lowercase ASCII letters and digits, separated by single `.`, `-` or `_`,
    /// between 2 and 128 bytes long.
    pub fn is_well_formed(&self) -> bool {
        use crate::utils::constants::{MAX_ACCOUNT_ID_LENGTH, MIN_ACCOUNT_ID_LENGTH};

        let bytes = self.0.as_bytes();
        if bytes.len() < MIN_ACCOUNT_ID_LENGTH || bytes.len() > MAX_ACCOUNT_ID_LENGTH {
            return false;
        }

        let is_separator = |b: u8| matches!(b, b'.' | b'-' | b'_');
        let mut last_was_separator = true;
        for &b in bytes {
            if is_separator(b) {
                if last_was_separator {
                    return false;
                }
                last_was_separator = true;
            } else if b.is_ascii_lowercase() || b.is_ascii_digit() {
                last_was_separator = false;
            } else {
                return false;
            }
        }
        !last_was_separator
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_hash_from_slice() {
        assert!(TxHash::from_slice(&[1u8; 32]).is_ok());
        assert_eq!(TxHash::from_slice(&[1u8; 31]), Err(Error::InvalidTxHash));
        assert_eq!(TxHash::from_slice(&[1u8; 33]), Err(Error::InvalidTxHash));
    }

    #[test]
    fn test_tx_hash_zero() {
        assert!(TxHash::zero().is_zero());
        assert!(!TxHash::new([0xaa; 32]).is_zero());
    }

    #[test]
    fn test_tx_hash_hex() {
        let hash = TxHash::new([0xab; 32]);
        let parsed = TxHash::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(hash, parsed);
        assert_eq!(TxHash::from_hex("zz"), Err(Error::InvalidTxHash));
    }

    #[test]
    fn test_double_sha256_known_vector() {
        // sha256d("") = 5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456
        let hash = TxHash::double_sha256(b"");
        assert_eq!(
            hash.to_hex(),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_btc_pubkey_length() {
        assert!(BtcPublicKey::from_slice(&[3u8; 33]).is_ok());
        assert_eq!(BtcPublicKey::from_slice(&[3u8; 32]), Err(Error::InvalidBtcAddress));
        assert!(BtcPublicKey::new([0u8; 33]).is_zero());
    }

    #[test]
    fn test_signature_length() {
        assert!(ValidatorSignature::from_slice(&[0x30; 65]).is_ok());
        assert_eq!(
            ValidatorSignature::from_slice(&[0x30; 64]),
            Err(Error::InvalidSignatureFormat)
        );
        assert!(ValidatorSignature::new([0u8; 65]).is_zero());
    }

    #[test]
    fn test_signature_serde_roundtrip() {
        let sig = ValidatorSignature::new([0x30; 65]);
        let json = serde_json::to_string(&sig).unwrap();
        let back: ValidatorSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, back);

        let short = serde_json::to_string(&"3030").unwrap();
        assert!(serde_json::from_str::<ValidatorSignature>(&short).is_err());
    }

    #[test]
    fn test_account_id_well_formed() {
        assert!(AccountId::new("alice.host").is_well_formed());
        assert!(AccountId::new("validator-1").is_well_formed());
        assert!(AccountId::new("a_b").is_well_formed());

        assert!(!AccountId::new("").is_well_formed());
        assert!(!AccountId::new("a").is_well_formed());
        assert!(!AccountId::new("Alice").is_well_formed());
        assert!(!AccountId::new(".alice").is_well_formed());
        assert!(!AccountId::new("alice.").is_well_formed());
        assert!(!AccountId::new("al..ice").is_well_formed());
        assert!(!AccountId::new("al ice").is_well_formed());
        assert!(!AccountId::new("a".repeat(129)).is_well_formed());
    }
}
