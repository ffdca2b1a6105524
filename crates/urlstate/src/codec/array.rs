use super::ValueCodec;
use crate::error::{CodecError, CodecResult};
use std::fmt;

/// Separator placed between encoded array elements.
///
/// Each separator has an escape form, used when an encoded element itself
/// contains the separator. Escapes are lowercase percent sequences, which
/// the built-in codecs never produce since they escape with uppercase hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Separator {
    /// `%2C`, an escaped comma.
    EncodedComma,
    /// `~`
    Tilde,
    /// `!`
    Bang,
    /// `.`
    Dot,
    /// `-`
    Dash,
    /// `x`
    LowerX,
    /// `X`
    UpperX,
}

impl Separator {
    pub const ALL: [Separator; 7] = [
        Separator::EncodedComma,
        Separator::Tilde,
        Separator::Bang,
        Separator::Dot,
        Separator::Dash,
        Separator::LowerX,
        Separator::UpperX,
    ];

    /// The separator as it appears in the encoded string.
    pub fn as_str(self) -> &'static str {
        match self {
            Separator::EncodedComma => "%2C",
            Separator::Tilde => "~",
            Separator::Bang => "!",
            Separator::Dot => ".",
            Separator::Dash => "-",
            Separator::LowerX => "x",
            Separator::UpperX => "X",
        }
    }

    /// What an occurrence of the separator inside an element is replaced with.
    pub fn escape(self) -> &'static str {
        match self {
            Separator::EncodedComma => "%2c",
            Separator::Tilde => "%7e",
            Separator::Bang => "%21",
            Separator::Dot => "%2e",
            Separator::Dash => "%2d",
            Separator::LowerX => "%78",
            Separator::UpperX => "%58",
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encodes a `Vec<T>` by joining the elements' encodings with a separator.
///
/// Elements are encoded without a default, so nothing is masked per element;
/// an element codec that still returns `None` contributes an empty string.
/// The empty string decodes to the empty array. With a fixed length the
/// element count is enforced in both directions.
#[derive(Clone, Debug)]
pub struct ArrayOf<C> {
    codec: C,
    separator: Separator,
    length: Option<usize>,
}

impl<C> ArrayOf<C> {
    pub fn new(codec: C, separator: Separator) -> Self {
        Self {
            codec,
            separator,
            length: None,
        }
    }

    /// Require exactly `length` elements.
    #[must_use]
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    pub fn length(&self) -> Option<usize> {
        self.length
    }

    pub fn inner(&self) -> &C {
        &self.codec
    }

    fn check_length(&self, actual: usize) -> Result<(), String> {
        match self.length {
            Some(expected) if expected != actual => Err(format!(
                "Expected {expected} element(s) in the array, found {actual}"
            )),
            _ => Ok(()),
        }
    }
}

impl<T, C> ValueCodec<Vec<T>> for ArrayOf<C>
where
    T: PartialEq + Clone,
    C: ValueCodec<T>,
{
    fn encode(&self, value: &Vec<T>, default: Option<&Vec<T>>) -> CodecResult<Option<String>> {
        if default == Some(value) {
            return Ok(None);
        }
        self.check_length(value.len()).map_err(CodecError::encode)?;

        let separator = self.separator.as_str();
        let escape = self.separator.escape();
        let mut parts = Vec::with_capacity(value.len());
        let mut errors = Vec::new();
        for element in value {
            match self.codec.encode(element, None) {
                Ok(encoded) => {
                    let encoded = encoded.unwrap_or_default();
                    parts.push(encoded.replace(separator, escape));
                }
                Err(e) => errors.push(e),
            }
        }
        if !errors.is_empty() {
            return Err(CodecError::aggregate(
                "Some elements in the array were un-encodable",
                errors,
            ));
        }
        Ok(Some(parts.join(separator)))
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&Vec<T>>) -> CodecResult<Option<Vec<T>>> {
        let Some(encoded) = encoded else {
            return Ok(default.cloned());
        };
        let parts: Vec<&str> = if encoded.is_empty() {
            Vec::new()
        } else {
            encoded.split(self.separator.as_str()).collect()
        };
        self.check_length(parts.len()).map_err(CodecError::decode)?;

        let separator = self.separator.as_str();
        let escape = self.separator.escape();
        let mut decoded = Vec::with_capacity(parts.len());
        let mut errors = Vec::new();
        for part in parts {
            let part = part.replace(escape, separator);
            match self.codec.decode(Some(&part), None) {
                Ok(Some(element)) => decoded.push(element),
                Ok(None) => errors.push(CodecError::decode(format!(
                    "Element \"{part}\" decoded to nothing"
                ))),
                Err(e) => errors.push(e),
            }
        }
        if !errors.is_empty() {
            return Err(CodecError::aggregate(
                "Some elements in the array were un-decodable",
                errors,
            ));
        }
        Ok(Some(decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{array_of, nullable, tuple_of, BooleanCodec, NumberCodec, StringCodec};
    use crate::error::ErrorKind;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numbers_with_every_separator() {
        let value = vec![1.0, 2.5, -3.0];
        for separator in Separator::ALL {
            let codec = ArrayOf::new(NumberCodec, separator);
            let encoded = codec.encode(&value, None).unwrap().unwrap();
            assert_eq!(
                codec.decode(Some(&encoded), None).unwrap(),
                Some(value.clone()),
                "separator {separator}"
            );
        }
    }

    #[test]
    fn test_known_encodings() {
        let codec = ArrayOf::new(NumberCodec, Separator::LowerX);
        assert_eq!(codec.encode(&vec![1.0, 2.0], None).unwrap().as_deref(), Some("1x2"));
        let codec = ArrayOf::new(StringCodec, Separator::EncodedComma);
        assert_eq!(
            codec.encode(&strings(&["a", "b c"]), None).unwrap().as_deref(),
            Some("a%2Cb%20c")
        );
    }

    #[test]
    fn test_separator_inside_element_is_escaped() {
        let value = strings(&["abc.def", "ghi."]);
        let codec = ArrayOf::new(StringCodec, Separator::Dot);
        let encoded = codec.encode(&value, None).unwrap().unwrap();
        assert_eq!(encoded, "abc%2edef.ghi%2e");
        assert_eq!(codec.decode(Some(&encoded), None).unwrap(), Some(value));

        let value = strings(&["a,b", "c"]);
        let codec = ArrayOf::new(StringCodec, Separator::EncodedComma);
        let encoded = codec.encode(&value, None).unwrap().unwrap();
        assert_eq!(encoded, "a%2cb%2Cc");
        assert_eq!(codec.decode(Some(&encoded), None).unwrap(), Some(value));
    }

    #[test]
    fn test_empty_array() {
        let codec = ArrayOf::new(BooleanCodec, Separator::Tilde);
        assert_eq!(codec.encode(&Vec::new(), None).unwrap().as_deref(), Some(""));
        assert_eq!(codec.decode(Some(""), None).unwrap(), Some(Vec::<bool>::new()));
    }

    #[test]
    fn test_default_masking() {
        let codec = ArrayOf::new(NumberCodec, Separator::Dash);
        let default = vec![1.0, 2.0];
        assert_eq!(codec.encode(&default.clone(), Some(&default)).unwrap(), None);
        assert_eq!(codec.decode(None, Some(&default)).unwrap(), Some(default));
        assert!(codec.encode(&vec![1.0], Some(&vec![1.0, 2.0])).unwrap().is_some());
    }

    #[test]
    fn test_nullable_elements() {
        let codec = ArrayOf::new(nullable(NumberCodec), Separator::Bang);
        let value = vec![Some(1.0), None, Some(3.0)];
        let encoded = codec.encode(&value, None).unwrap().unwrap();
        assert_eq!(encoded, "1!null!3");
        assert_eq!(codec.decode(Some(&encoded), None).unwrap(), Some(value));
    }

    #[test]
    fn test_element_failures_are_aggregated() {
        let codec = ArrayOf::new(NumberCodec, Separator::Tilde);
        let err = codec.encode(&vec![1.0, f64::NAN, f64::NAN], None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Aggregate);
        assert_eq!(err.causes().len(), 2);

        let err = codec.decode(Some("1~a~b~4"), None).unwrap_err();
        assert_eq!(err.causes().len(), 2);
        assert!(err.causes().iter().all(CodecError::is_decode));
    }

    #[test]
    fn test_fixed_length_is_enforced() {
        let codec = ArrayOf::new(NumberCodec, Separator::LowerX).with_length(2);
        assert_eq!(
            codec.decode(Some("42.41x2.16"), None).unwrap(),
            Some(vec![42.41, 2.16])
        );
        assert!(codec.decode(Some("1x2x3"), None).unwrap_err().is_decode());
        assert!(codec.decode(Some(""), None).is_err());
        assert_eq!(
            codec.encode(&vec![1.0], None).unwrap_err().kind(),
            ErrorKind::Encode
        );
    }

    #[test]
    fn test_dot_separated_strings_escape_trailing_dot() {
        let value = strings(&["abc", "def", "ghi.", "jkl"]);
        let codec = array_of(StringCodec, Separator::Dot);
        let encoded = codec.encode(&value, None).unwrap();
        assert_eq!(encoded.as_deref(), Some("abc.def.ghi%2e.jkl"));
        assert_eq!(codec.decode(encoded.as_deref(), None).unwrap(), Some(value));
    }

    #[test]
    fn test_tuple_of_three_rejects_four_elements() {
        let codec = tuple_of(NumberCodec, Separator::Tilde, 3);
        let err = codec.decode(Some("1~2~3~4"), None).unwrap_err();
        assert!(err.is_decode());
        assert_eq!(
            codec.decode(Some("1~2~3"), None).unwrap(),
            Some(vec![1.0, 2.0, 3.0])
        );
    }
}
