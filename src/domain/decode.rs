//! Base64 payload decoding for GitHub contents responses.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Decode a base64 payload into UTF-8 text.
///
/// GitHub wraps encoded content at 60 columns, so ASCII whitespace is dropped
/// before decoding. The bytes are decoded as one buffer, which keeps
/// multi-byte sequences intact.
pub fn decode_base64_utf8(payload: &str) -> Result<String, DecodeError> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(compact.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}
