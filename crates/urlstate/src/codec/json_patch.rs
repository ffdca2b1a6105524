use super::ValueCodec;
use crate::equality::json_equals;
use crate::error::{BoxError, CodecError, CodecResult};
use json_patch::Patch;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Encodes a value as the RFC 6902 patch that turns its default into it.
///
/// Nested structures that mostly match their default shrink to a short
/// list of operations, which the inner codec (typically
/// [`Base64JsonCodec`](super::Base64JsonCodec), often under
/// [`DeflateRaw`](super::DeflateRaw)) encodes. When either the value or the
/// default is not a container, the value is handed to the inner codec as is.
#[derive(Clone, Copy, Debug, Default)]
pub struct WithJsonPatch<C> {
    codec: C,
}

impl<C> WithJsonPatch<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    pub fn inner(&self) -> &C {
        &self.codec
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn diff_error(source: serde_json::Error) -> CodecError {
    CodecError::encode_with(
        "Unable to diff default and value. Are these both valid JSON-serializable values?",
        source,
    )
}

fn patch_error(source: impl Into<BoxError>) -> CodecError {
    CodecError::decode_with(
        "Unable to patch the decoded delta into the default. Is the patch RFC-6902 compliant?",
        source,
    )
}

impl<T, C> ValueCodec<T> for WithJsonPatch<C>
where
    T: Serialize + DeserializeOwned + Clone,
    C: ValueCodec<Value>,
{
    fn encode(&self, value: &T, default: Option<&T>) -> CodecResult<Option<String>> {
        let value = serde_json::to_value(value).map_err(diff_error)?;
        let default = default
            .map(serde_json::to_value)
            .transpose()
            .map_err(diff_error)?;

        match default {
            Some(default) if json_equals(&default, &value) => Ok(None),
            Some(default) if is_container(&default) && is_container(&value) => {
                let patch = json_patch::diff(&default, &value);
                let patch = serde_json::to_value(&patch).map_err(diff_error)?;
                self.codec.encode(&patch, None)
            }
            _ => self.codec.encode(&value, None),
        }
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&T>) -> CodecResult<Option<T>> {
        let Some(encoded) = encoded else {
            return Ok(default.cloned());
        };
        let Some(recovered) = self.codec.decode(Some(encoded), None)? else {
            return Ok(default.cloned());
        };

        let base = default
            .map(serde_json::to_value)
            .transpose()
            .map_err(patch_error)?
            .filter(is_container);

        let complete = match base {
            Some(mut base) if recovered.is_array() => {
                let patch: Patch = serde_json::from_value(recovered).map_err(patch_error)?;
                json_patch::patch(&mut base, &patch).map_err(patch_error)?;
                base
            }
            _ => recovered,
        };
        serde_json::from_value(complete).map(Some).map_err(|e| {
            CodecError::decode_with(format!("Unable to decode value from \"{encoded}\""), e)
        })
    }
}
