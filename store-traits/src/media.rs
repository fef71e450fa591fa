//! Inline audio encoding helpers
//!
//! Backends that carry the payload inside the metadata record (local SQLite,
//! REST/document/git stores) all encode audio as a base64 data URI. The
//! helpers live here so every backend shares one encoding.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;

use crate::error::{Result, StoreError};

/// Encode payload bytes as a `data:<media-type>;base64,…` URI.
pub fn encode_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Audio payload recovered from a data URI.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub media_type: String,
    pub bytes: Bytes,
}

/// Decode a `data:<media-type>;base64,<payload>` URI.
///
/// # Errors
///
/// Returns [`StoreError::Backend`] when the URI scheme, separator, or
/// base64 payload is malformed.
pub fn decode_data_uri(uri: &str) -> Result<DecodedAudio> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| StoreError::Backend("audio URI is not a data URI".to_string()))?;

    let (media_type, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| StoreError::Backend("data URI is not base64-encoded".to_string()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| StoreError::Backend(format!("Invalid base64 audio payload: {}", e)))?;

    Ok(DecodedAudio {
        media_type: media_type.to_string(),
        bytes: Bytes::from(bytes),
    })
}
