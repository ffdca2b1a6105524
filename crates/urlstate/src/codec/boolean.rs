use super::ValueCodec;
use crate::error::{CodecError, CodecResult};

pub const ENCODED_TRUE: &str = "true";
pub const ENCODED_FALSE: &str = "false";

/// Encodes booleans as the literals `true` and `false`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanCodec;

impl ValueCodec<bool> for BooleanCodec {
    fn encode(&self, value: &bool, default: Option<&bool>) -> CodecResult<Option<String>> {
        if default == Some(value) {
            return Ok(None);
        }
        let literal = if *value { ENCODED_TRUE } else { ENCODED_FALSE };
        Ok(Some(literal.to_string()))
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&bool>) -> CodecResult<Option<bool>> {
        match encoded {
            None => Ok(default.copied()),
            Some(ENCODED_TRUE) => Ok(Some(true)),
            Some(ENCODED_FALSE) => Ok(Some(false)),
            Some(other) => Err(CodecError::decode(format!(
                "Expected encoded boolean value to be \"{ENCODED_TRUE}\" or \"{ENCODED_FALSE}\", saw \"{other}\""
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_without_default() {
        assert_eq!(BooleanCodec.encode(&true, None).unwrap().as_deref(), Some(ENCODED_TRUE));
        assert_eq!(BooleanCodec.encode(&false, None).unwrap().as_deref(), Some(ENCODED_FALSE));
        assert_eq!(BooleanCodec.decode(Some("true"), None).unwrap(), Some(true));
        assert_eq!(BooleanCodec.decode(Some("false"), None).unwrap(), Some(false));
    }

    #[test]
    fn test_masked_by_default() {
        for value in [true, false] {
            assert_eq!(BooleanCodec.encode(&value, Some(&value)).unwrap(), None);
            assert_eq!(BooleanCodec.decode(None, Some(&value)).unwrap(), Some(value));
        }
    }

    #[test]
    fn test_invalid_token_is_named() {
        let err = BooleanCodec.decode(Some("null"), None).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("\"null\""));
        assert!(BooleanCodec.decode(Some("TRUE"), None).is_err());
    }
}
