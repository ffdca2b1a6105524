use super::uri::{decode_component, encode_component};
use super::ValueCodec;
use crate::error::{CodecError, CodecResult};

/// Percent-encodes strings as URI components and back.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringCodec;

impl ValueCodec<String> for StringCodec {
    fn encode(&self, value: &String, default: Option<&String>) -> CodecResult<Option<String>> {
        if default == Some(value) {
            return Ok(None);
        }
        Ok(Some(encode_component(value)))
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&String>) -> CodecResult<Option<String>> {
        let Some(encoded) = encoded else {
            return Ok(default.cloned());
        };
        decode_component(encoded).map(Some).map_err(|e| {
            CodecError::decode_with(format!("Unable to decode string from \"{encoded}\""), e)
        })
    }
}
