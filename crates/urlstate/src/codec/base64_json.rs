use super::ValueCodec;
use crate::equality::json_equals;
use crate::error::{CodecError, CodecResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Encodes any serializable value as base64url-wrapped JSON.
///
/// The output uses the URL-safe alphabet without padding, so it needs no
/// further escaping. Decoding also accepts padded input and the standard
/// `+`/`/` alphabet. Masking compares the JSON forms of value and default.
pub struct Base64JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Base64JsonCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Base64JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Base64JsonCodec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Base64JsonCodec<T> {}

impl<T> std::fmt::Debug for Base64JsonCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Base64JsonCodec")
    }
}

impl<T> ValueCodec<T> for Base64JsonCodec<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    fn encode(&self, value: &T, default: Option<&T>) -> CodecResult<Option<String>> {
        let json = serde_json::to_value(value)
            .map_err(|e| CodecError::encode_with("Unable to serialize value as JSON", e))?;
        if let Some(default) = default {
            let default = serde_json::to_value(default)
                .map_err(|e| CodecError::encode_with("Unable to serialize default as JSON", e))?;
            if json_equals(&json, &default) {
                return Ok(None);
            }
        }
        let text = serde_json::to_string(&json)
            .map_err(|e| CodecError::encode_with("Unable to serialize value as JSON", e))?;
        Ok(Some(URL_SAFE_NO_PAD.encode(text)))
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&T>) -> CodecResult<Option<T>> {
        let Some(encoded) = encoded else {
            return Ok(default.cloned());
        };
        let bytes = decode_base64(encoded).map_err(|e| {
            CodecError::decode_with(format!("Unable to decode base64 from \"{encoded}\""), e)
        })?;
        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            CodecError::decode_with(format!("Unable to decode JSON from \"{encoded}\""), e)
        })
    }
}

/// Decode base64 regardless of alphabet or padding.
pub(crate) fn decode_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let normalized: String = encoded
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    URL_SAFE_NO_PAD.decode(normalized)
}
