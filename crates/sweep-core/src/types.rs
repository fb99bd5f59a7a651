use std::fmt;

use ed25519_dalek::SigningKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use zeroize::{Zeroize, Zeroizing};

use crate::error::CoreError;

/// Required length of credential material: a 32-byte signing seed followed by
/// the 32-byte public half.
pub const CREDENTIAL_LEN: usize = 64;

/// Value in atomic units of the ledger's native asset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Amount(pub u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Create a new amount.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value in atomic units.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check if the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publicly derivable identifier for a ledger account.
///
/// Derived one-way from credential material; safe to log and to return in
/// outcomes. Displayed as base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity([u8; 32]);

impl Identity {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice (must be exactly 32 bytes).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidIdentity(format!("expected 32 bytes, got {}", bytes.len())))?;
        Ok(Self(arr))
    }

    /// Decode from a base58 string.
    pub fn from_bs58(s: &str) -> Result<Self, CoreError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| CoreError::InvalidIdentity(format!("invalid base58: {}", e)))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encode as base58.
    pub fn to_bs58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bs58())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.to_bs58())
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Identity::from_bs58(&s).map_err(serde::de::Error::custom)
    }
}

/// Secret bytes that authorize spending from a ledger identity.
///
/// The buffer is zeroized on drop and never serialized. `Debug` is redacted.
/// Length is not validated at construction; [`CredentialMaterial::derive_identity`]
/// rejects anything other than [`CREDENTIAL_LEN`] bytes before any use.
pub struct CredentialMaterial(Zeroizing<Vec<u8>>);

impl CredentialMaterial {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Derive the public identity for this credential.
    ///
    /// One-way derivation: the first 32 bytes are the signing seed, the last
    /// 32 bytes the claimed public half. The embedded public half must match
    /// the derived one or the credential is rejected.
    pub fn derive_identity(&self) -> Result<Identity, CoreError> {
        let key = self.signing_key()?;
        Ok(Identity::from_bytes(key.verifying_key().to_bytes()))
    }

    /// Reconstruct the signing key for this credential.
    ///
    /// Use with caution — callers must not let the key outlive the transfer
    /// that needs it.
    pub fn signing_key(&self) -> Result<SigningKey, CoreError> {
        if self.0.len() != CREDENTIAL_LEN {
            return Err(CoreError::InvalidCredentialLength {
                expected: CREDENTIAL_LEN,
                actual: self.0.len(),
            });
        }
        let mut buf = [0u8; CREDENTIAL_LEN];
        buf.copy_from_slice(&self.0);
        let key = SigningKey::from_keypair_bytes(&buf)
            .map_err(|_| CoreError::InvalidCredential("public half does not match seed".into()));
        buf.zeroize();
        key
    }

    /// Raw secret bytes. Use with caution — prefer `signing_key()`.
    pub fn secret_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for CredentialMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialMaterial(redacted, {} bytes)", self.0.len())
    }
}

/// One decoded transfer request.
///
/// `credential` is `None` when the payload element carried no usable
/// credential field; the orchestrator records such items as skipped without
/// disturbing their siblings.
#[derive(Debug)]
pub struct TransferRequest {
    pub credential: Option<CredentialMaterial>,
    pub source_hint: String,
}

impl TransferRequest {
    pub fn new(credential: Option<CredentialMaterial>, source_hint: impl Into<String>) -> Self {
        Self {
            credential,
            source_hint: source_hint.into(),
        }
    }
}

/// Transaction reference returned by the ledger on a confirmed broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationId(pub String);

impl ConfirmationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfirmationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation identifier for one batch (UUID v7 — time-ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub Uuid);

impl BatchId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
