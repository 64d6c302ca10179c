//! # Value Objects
//!
//! Fixed-width byte primitives for validator deposits.
//! Every type here is only constructible with the exact byte length the
//! upstream authority expects, so a `ValidatorRecord` built from them is
//! structurally valid by construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export U256 from primitive-types for native-unit (wei) values
pub use primitive_types::U256;

// =============================================================================
// UNITS
// =============================================================================

/// Wei in one gwei (the sub-unit used on the wire).
pub const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Gwei in one ether.
pub const GWEI_PER_ETH: u64 = 1_000_000_000;

/// Converts a sub-unit (gwei) amount into native units (wei).
#[must_use]
pub fn gwei_to_wei(gwei: u64) -> U256 {
    U256::from(gwei) * U256::from(WEI_PER_GWEI)
}

/// Converts whole ether into gwei. Saturates at `u64::MAX`.
#[must_use]
pub const fn eth_to_gwei(eth: u64) -> u64 {
    eth.saturating_mul(GWEI_PER_ETH)
}

/// Converts whole ether into wei.
#[must_use]
pub fn eth_to_wei(eth: u64) -> U256 {
    U256::from(eth) * U256::from(GWEI_PER_ETH) * U256::from(WEI_PER_GWEI)
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    write!(f, "0x")?;
    for byte in bytes {
        write!(f, "{byte:02x}")?;
    }
    Ok(())
}

fn write_short_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    write!(f, "0x")?;
    for byte in &bytes[..4] {
        write!(f, "{byte:02x}")?;
    }
    write!(f, "...")?;
    for byte in &bytes[bytes.len() - 2..] {
        write!(f, "{byte:02x}")?;
    }
    Ok(())
}

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account identity (submitter, forwarder, upstream authority).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000), the "unset" identity.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 20]>::try_from(slice).ok().map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

/// Error parsing a hex-encoded address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    /// The input was not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// The decoded input was not 20 bytes.
    #[error("invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(digits).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes).ok_or(AddressParseError::InvalidLength(bytes.len()))
    }
}

// =============================================================================
// HASH (32 bytes)
// =============================================================================

/// A 32-byte SHA-256 digest (deposit data roots, tree nodes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// The zero hash.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a hash from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates a hash from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(slice).ok().map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_short_hex(f, &self.0)
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// VALIDATOR KEY MATERIAL
// =============================================================================

/// Length of a BLS12-381 public key.
pub const PUBKEY_LENGTH: usize = 48;

/// Length of the withdrawal credentials field.
pub const WITHDRAWAL_CREDENTIALS_LENGTH: usize = 32;

/// Length of a BLS12-381 signature.
pub const SIGNATURE_LENGTH: usize = 96;

/// A 48-byte validator public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBKEY_LENGTH]);

impl PublicKey {
    /// Creates a public key from a slice. Returns None if not 48 bytes.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; PUBKEY_LENGTH]>::try_from(slice).ok().map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBKEY_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_short_hex(f, &self.0)
    }
}

/// A 96-byte proof-of-possession signature.
///
/// Only the length is ever checked here; validity is the upstream's concern.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Creates a signature from a slice. Returns None if not 96 bytes.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; SIGNATURE_LENGTH]>::try_from(slice).ok().map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_short_hex(f, &self.0)
    }
}

// =============================================================================
// WITHDRAWAL CREDENTIALS
// =============================================================================

/// Classification of withdrawal credentials by their first byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialKind {
    /// `0x00`: withdrawals keyed to a BLS withdrawal key.
    BlsKey,
    /// `0x01`: withdrawals routed to the account in the last 20 bytes.
    ExecutionAddress,
    /// Any other prefix. Accepted here; the upstream decides.
    Unknown(u8),
}

/// 32-byte withdrawal credentials.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WithdrawalCredentials(pub [u8; WITHDRAWAL_CREDENTIALS_LENGTH]);

impl WithdrawalCredentials {
    /// Prefix byte for BLS-key credentials.
    pub const BLS_PREFIX: u8 = 0x00;

    /// Prefix byte for execution-address credentials.
    pub const EXECUTION_PREFIX: u8 = 0x01;

    /// Creates credentials from a slice. Returns None if not 32 bytes.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; WITHDRAWAL_CREDENTIALS_LENGTH]>::try_from(slice)
            .ok()
            .map(Self)
    }

    /// Builds `0x01` credentials pointing at `address`.
    #[must_use]
    pub fn for_execution_address(address: Address) -> Self {
        let mut bytes = [0u8; WITHDRAWAL_CREDENTIALS_LENGTH];
        bytes[0] = Self::EXECUTION_PREFIX;
        bytes[12..].copy_from_slice(address.as_bytes());
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; WITHDRAWAL_CREDENTIALS_LENGTH] {
        &self.0
    }

    /// Classifies the credentials by prefix byte.
    #[must_use]
    pub fn kind(&self) -> CredentialKind {
        match self.0[0] {
            Self::BLS_PREFIX => CredentialKind::BlsKey,
            Self::EXECUTION_PREFIX => CredentialKind::ExecutionAddress,
            other => CredentialKind::Unknown(other),
        }
    }

    /// The withdrawal account for `0x01` credentials.
    #[must_use]
    pub fn execution_address(&self) -> Option<Address> {
        match self.kind() {
            CredentialKind::ExecutionAddress => Address::from_slice(&self.0[12..]),
            _ => None,
        }
    }
}

impl fmt::Debug for WithdrawalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
