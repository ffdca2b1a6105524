use super::uri::{decode_component, encode_component};
use super::ValueCodec;
use crate::error::{CodecError, CodecResult};

/// Encodes `f64` values in decimal or scientific notation.
///
/// Numbers are written the way JavaScript prints them (`15`, `0.5`,
/// `1.7976931348623157e+308`, `-Infinity`) and then escaped, so the `+` of a
/// positive exponent travels as `%2B`. `NaN` is rejected in both directions;
/// wrap the codec with [`with_nan`](super::with_nan) to carry it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumberCodec;

impl ValueCodec<f64> for NumberCodec {
    fn encode(&self, value: &f64, default: Option<&f64>) -> CodecResult<Option<String>> {
        if default == Some(value) {
            return Ok(None);
        }
        if value.is_nan() {
            return Err(CodecError::encode(
                "Cannot encode NaN. Did you mean to use the with_nan codec wrapper?",
            ));
        }
        Ok(Some(encode_component(&format_number(*value))))
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&f64>) -> CodecResult<Option<f64>> {
        let Some(encoded) = encoded else {
            return Ok(default.copied());
        };
        let text = decode_component(encoded).map_err(|e| {
            CodecError::decode_with(format!("Unable to decode number from \"{encoded}\""), e)
        })?;
        parse_number(&text).map(Some).ok_or_else(|| {
            CodecError::decode(format!(
                "Unable to decode \"{encoded}\" as a valid number. If you need to encode and \
                 decode NaN values, consider using the with_nan codec wrapper."
            ))
        })
    }
}

/// Encodes `i64` values as plain decimal integers.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerCodec;

impl ValueCodec<i64> for IntegerCodec {
    fn encode(&self, value: &i64, default: Option<&i64>) -> CodecResult<Option<String>> {
        if default == Some(value) {
            return Ok(None);
        }
        Ok(Some(value.to_string()))
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&i64>) -> CodecResult<Option<i64>> {
        let Some(encoded) = encoded else {
            return Ok(default.copied());
        };
        let text = decode_component(encoded)?;
        text.parse().map(Some).map_err(|e| {
            CodecError::decode_with(format!("Unable to decode \"{encoded}\" as an integer"), e)
        })
    }
}

/// Print a number with the shortest digits that round-trip, switching to
/// exponent notation below 1e-6 and from 1e21 on.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", (n - 1).abs())
        } else {
            format!("{first}.{rest}e{sign}{}", (n - 1).abs())
        }
    };

    if value < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}

/// Parse decimal or scientific notation and the two infinities.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    let decimal_grammar = !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !decimal_grammar {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_values() {
        assert_eq!(NumberCodec.encode(&1.0, None).unwrap().as_deref(), Some("1"));
        assert_eq!(NumberCodec.decode(Some("1"), None).unwrap(), Some(1.0));
    }

    #[test]
    fn test_integer_with_default() {
        assert_eq!(NumberCodec.encode(&1.0, Some(&1.0)).unwrap(), None);
        assert_eq!(NumberCodec.decode(None, Some(&1.0)).unwrap(), Some(1.0));
    }

    #[test]
    fn test_very_large_and_small_numbers() {
        let max = NumberCodec.encode(&f64::MAX, None).unwrap().unwrap();
        assert_eq!(max, "1.7976931348623157e%2B308");
        assert_eq!(NumberCodec.decode(Some(&max), None).unwrap(), Some(f64::MAX));

        let min = f64::from_bits(1);
        let encoded = NumberCodec.encode(&min, None).unwrap().unwrap();
        assert_eq!(encoded, "5e-324");
        assert_eq!(NumberCodec.decode(Some(&encoded), None).unwrap(), Some(min));
    }

    #[test]
    fn test_infinities() {
        let pos = NumberCodec.encode(&f64::INFINITY, None).unwrap().unwrap();
        assert_eq!(pos, "Infinity");
        assert_eq!(NumberCodec.decode(Some(&pos), None).unwrap(), Some(f64::INFINITY));

        let neg = NumberCodec.encode(&f64::NEG_INFINITY, None).unwrap().unwrap();
        assert_eq!(neg, "-Infinity");
        assert_eq!(NumberCodec.decode(Some(&neg), None).unwrap(), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_nan_fails_both_ways() {
        assert!(NumberCodec.encode(&f64::NAN, None).is_err());
        let err = NumberCodec.decode(Some("NaN"), None).unwrap_err();
        assert!(err.to_string().contains("with_nan"));
    }

    #[test]
    fn test_rejects_non_numeric_text() {
        for bad in ["", "abc", "1x2", "inf", "0x10"] {
            assert!(NumberCodec.decode(Some(bad), None).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_format_number_matches_js_notation() {
        assert_eq!(format_number(15.0), "15");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-1.25), "-1.25");
        assert_eq!(format_number(41.238648049825535), "41.238648049825535");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(123456.789), "123456.789");
    }

    #[test]
    fn test_integer_codec() {
        assert_eq!(IntegerCodec.encode(&-42, None).unwrap().as_deref(), Some("-42"));
        assert_eq!(IntegerCodec.encode(&3, Some(&3)).unwrap(), None);
        assert_eq!(IntegerCodec.decode(Some("-42"), None).unwrap(), Some(-42));
        assert_eq!(IntegerCodec.decode(None, Some(&3)).unwrap(), Some(3));
        assert!(IntegerCodec.decode(Some("4.5"), None).is_err());
    }
}
