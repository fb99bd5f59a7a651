//! Sweep payload decoder.
//!
//! Turns a raw transport string into a validated list of transfer requests.
//! The decode order is fixed: bracket unwrapping, percent-decoding, base64,
//! then structured-text parsing with a best-effort plain-text fallback.

pub mod batch;
pub mod error;
pub mod payload;

pub use batch::{decode_batch, extract_requests};
pub use error::DecodeError;
pub use payload::{decode_payload, Decoded};
