//! Shared helpers for the Sweep integration tests: generated wallets and
//! transport-encoded payload construction.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use serde_json::{json, Value};
use sweep_core::Identity;

/// A generated wallet: base58 credential export plus its public identity.
pub struct TestWallet {
    pub name: String,
    pub key_bs58: String,
    pub identity: Identity,
}

pub fn wallet(name: &str) -> TestWallet {
    let key = SigningKey::generate(&mut OsRng);
    TestWallet {
        name: name.into(),
        key_bs58: bs58::encode(key.to_keypair_bytes()).into_string(),
        identity: Identity::from_bytes(key.verifying_key().to_bytes()),
    }
}

/// Transport-encode a `{"wallets": [...]}` payload for the given wallets.
pub fn payload_for(wallets: &[&TestWallet]) -> String {
    let entries: Vec<Value> = wallets
        .iter()
        .map(|w| json!({ "name": w.name, "key": w.key_bs58 }))
        .collect();
    encode_payload(&json!({ "wallets": entries }))
}

/// Base64-encode and bracket-wrap a payload value, percent-escaping the
/// padding the way URL senders do.
pub fn encode_payload(value: &Value) -> String {
    let b64 = STANDARD.encode(value.to_string().as_bytes());
    format!("({})", b64.replace('=', "%3D"))
}
