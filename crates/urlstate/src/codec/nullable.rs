use super::ValueCodec;
use crate::error::CodecResult;

pub const ENCODED_NULL: &str = "null";

/// Adds `None` to the domain of a codec, encoded as `"null"`.
///
/// Note that a wrapped string codec can no longer carry the literal text
/// `"null"`: it decodes as `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nullable<C> {
    codec: C,
}

impl<C> Nullable<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    pub fn inner(&self) -> &C {
        &self.codec
    }
}

impl<T, C> ValueCodec<Option<T>> for Nullable<C>
where
    T: PartialEq + Clone,
    C: ValueCodec<T>,
{
    fn encode(&self, value: &Option<T>, default: Option<&Option<T>>) -> CodecResult<Option<String>> {
        if default == Some(value) {
            return Ok(None);
        }
        match value {
            None => Ok(Some(ENCODED_NULL.to_string())),
            Some(inner) => {
                let inner_default = default.and_then(Option::as_ref);
                self.codec.encode(inner, inner_default)
            }
        }
    }

    fn decode(
        &self,
        encoded: Option<&str>,
        default: Option<&Option<T>>,
    ) -> CodecResult<Option<Option<T>>> {
        match encoded {
            None => Ok(default.cloned()),
            Some(ENCODED_NULL) => Ok(Some(None)),
            Some(encoded) => {
                let inner_default = default.and_then(Option::as_ref);
                Ok(self.codec.decode(Some(encoded), inner_default)?.map(Some))
            }
        }
    }
}
