use base64::alphabet;
use base64::engine::{DecodePaddingMode, Engine as _, GeneralPurpose, GeneralPurposeConfig};
use percent_encoding::percent_decode_str;

use crate::error::DecodeError;

/// Standard-alphabet base64 engine that tolerates missing padding. Senders
/// routinely strip the trailing `=` when embedding payloads in URLs.
const PAYLOAD_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Result of the transport decode pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The payload parsed as structured JSON.
    Structured(serde_json::Value),
    /// Best-effort fallback: the payload decoded to text that is not
    /// structured. Sufficient for human-readable logging; not for a batch.
    Text(String),
}

/// Strip matching leading/trailing bracket pairs. Some senders wrap the
/// encoded payload in parentheses or similar, e.g. `(base64...)`.
fn strip_brackets(mut s: &str) -> &str {
    const PAIRS: &[(u8, u8)] = &[(b'(', b')'), (b'[', b']'), (b'{', b'}'), (b'<', b'>')];
    while s.len() >= 2 {
        let bytes = s.as_bytes();
        let (first, last) = (bytes[0], bytes[s.len() - 1]);
        if PAIRS.iter().any(|&(open, close)| first == open && last == close) {
            s = s[1..s.len() - 1].trim();
        } else {
            break;
        }
    }
    s
}

/// Decode a raw transport string.
///
/// Order is fixed: bracket unwrapping, percent-decoding, base64 (standard
/// alphabet, padding-tolerant), then JSON parsing of the UTF-8 text. A
/// payload that decodes cleanly but does not parse as JSON is returned as
/// [`Decoded::Text`], not an error.
pub fn decode_payload(raw: &str) -> Result<Decoded, DecodeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let unwrapped = strip_brackets(trimmed);
    if unwrapped.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let percent_decoded = percent_decode_str(unwrapped)
        .decode_utf8()
        .map_err(|e| DecodeError::InvalidEncoding(format!("invalid percent encoding: {}", e)))?;

    let bytes = PAYLOAD_B64
        .decode(percent_decoded.trim().as_bytes())
        .map_err(|e| DecodeError::InvalidEncoding(format!("invalid base64: {}", e)))?;

    let text = String::from_utf8(bytes)
        .map_err(|e| DecodeError::InvalidEncoding(format!("payload is not utf-8: {}", e)))?;

    match serde_json::from_str(&text) {
        Ok(value) => Ok(Decoded::Structured(value)),
        Err(e) => {
            tracing::debug!(error = %e, "payload decoded but is not structured, returning text");
            Ok(Decoded::Text(text))
        }
    }
}
