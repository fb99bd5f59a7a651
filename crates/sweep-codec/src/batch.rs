use serde_json::Value;
use sweep_core::{CredentialMaterial, TransferRequest};

use crate::error::DecodeError;
use crate::payload::{decode_payload, Decoded};

/// Payload object fields recognized as the batch list.
const LIST_FIELDS: &[&str] = &["wallets", "accounts"];
/// Element fields recognized as credential material.
const CREDENTIAL_FIELDS: &[&str] = &["key", "secret"];
/// Element fields recognized as the source hint.
const HINT_FIELDS: &[&str] = &["name", "label"];

/// Decode a raw transport string into an ordered batch of transfer requests.
///
/// Requires a structured payload; a text-only payload is a
/// [`DecodeError::NotStructured`] here even though [`decode_payload`] accepts
/// it for logging purposes.
pub fn decode_batch(raw: &str) -> Result<Vec<TransferRequest>, DecodeError> {
    match decode_payload(raw)? {
        Decoded::Structured(value) => extract_requests(&value),
        Decoded::Text(_) => Err(DecodeError::NotStructured),
    }
}

/// Extract transfer requests from an already-parsed payload value.
///
/// Elements without a usable credential are kept (with `credential: None`)
/// so the output stays index-aligned with the payload; siblings are never
/// halted by one bad element.
pub fn extract_requests(value: &Value) -> Result<Vec<TransferRequest>, DecodeError> {
    let list = LIST_FIELDS
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_array))
        .ok_or(DecodeError::NotStructured)?;

    Ok(list
        .iter()
        .enumerate()
        .map(|(index, elem)| to_request(index, elem))
        .collect())
}

fn to_request(index: usize, elem: &Value) -> TransferRequest {
    let hint = HINT_FIELDS
        .iter()
        .find_map(|field| elem.get(field).and_then(Value::as_str))
        .map(str::to_owned)
        .unwrap_or_else(|| format!("wallet-{}", index));

    let credential = credential_material(elem);
    if credential.is_none() {
        tracing::debug!(hint = %hint, "payload element has no usable credential");
    }
    TransferRequest::new(credential, hint)
}

/// Pull credential bytes out of a payload element.
///
/// Accepts a non-empty string (base58, then hex, then raw bytes) or an array
/// of byte values. Length is validated downstream, before any remote call.
fn credential_material(elem: &Value) -> Option<CredentialMaterial> {
    let field = CREDENTIAL_FIELDS.iter().find_map(|f| elem.get(f))?;
    match field {
        Value::String(s) if !s.is_empty() => Some(decode_credential_text(s)),
        Value::Array(items) if !items.is_empty() => {
            let mut bytes = Vec::with_capacity(items.len());
            for item in items {
                let byte = item.as_u64().filter(|b| *b <= u8::MAX as u64)?;
                bytes.push(byte as u8);
            }
            Some(CredentialMaterial::new(bytes))
        }
        _ => None,
    }
}

fn decode_credential_text(s: &str) -> CredentialMaterial {
    // Base58 is the network's native key export; hex is common in manual
    // exports. Anything else is kept as raw bytes and caught by the length
    // validation.
    if let Ok(bytes) = bs58::decode(s).into_vec() {
        return CredentialMaterial::new(bytes);
    }
    if let Ok(bytes) = hex::decode(s.trim_start_matches("0x")) {
        return CredentialMaterial::new(bytes);
    }
    CredentialMaterial::new(s.as_bytes().to_vec())
}
