use super::ValueCodec;
use crate::error::CodecResult;

pub const ENCODED_NAN: &str = "NaN";

/// Adds `NaN` to the domain of a number codec, encoded as `"NaN"`.
///
/// `NaN` is considered equal to a `NaN` default, so it is masked like any
/// other value.
#[derive(Clone, Copy, Debug, Default)]
pub struct WithNaN<C> {
    codec: C,
}

impl<C> WithNaN<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    pub fn inner(&self) -> &C {
        &self.codec
    }
}

impl<C: ValueCodec<f64>> ValueCodec<f64> for WithNaN<C> {
    fn encode(&self, value: &f64, default: Option<&f64>) -> CodecResult<Option<String>> {
        if value.is_nan() {
            if default.is_some_and(|d| d.is_nan()) {
                return Ok(None);
            }
            return Ok(Some(ENCODED_NAN.to_string()));
        }
        self.codec.encode(value, default.filter(|d| !d.is_nan()))
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&f64>) -> CodecResult<Option<f64>> {
        match encoded {
            None => Ok(default.copied()),
            Some(ENCODED_NAN) => Ok(Some(f64::NAN)),
            Some(encoded) => self.codec.decode(Some(encoded), default),
        }
    }
}
