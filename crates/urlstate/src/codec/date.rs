use super::uri::{decode_component, encode_component};
use super::ValueCodec;
use crate::error::{CodecError, CodecResult};
use chrono::{DateTime, NaiveDate, SecondsFormat, Timelike, Utc};

/// Encodes UTC timestamps as escaped ISO 8601 strings.
///
/// Timestamps are written as `2000-01-01T00:00:00.000Z`, with more
/// fractional digits only when the value carries sub-millisecond precision.
/// Decoding accepts any RFC 3339 timestamp, normalized to UTC, as well as a
/// bare `YYYY-MM-DD` date meaning midnight UTC. Offsets are not preserved.
/// Equality with the default compares millisecond timestamps.
#[derive(Clone, Copy, Debug, Default)]
pub struct DateCodec;

impl ValueCodec<DateTime<Utc>> for DateCodec {
    fn encode(
        &self,
        value: &DateTime<Utc>,
        default: Option<&DateTime<Utc>>,
    ) -> CodecResult<Option<String>> {
        if default.is_some_and(|d| d.timestamp_millis() == value.timestamp_millis()) {
            return Ok(None);
        }
        let format = if value.nanosecond() % 1_000_000 == 0 {
            SecondsFormat::Millis
        } else {
            SecondsFormat::AutoSi
        };
        Ok(Some(encode_component(&value.to_rfc3339_opts(format, true))))
    }

    fn decode(
        &self,
        encoded: Option<&str>,
        default: Option<&DateTime<Utc>>,
    ) -> CodecResult<Option<DateTime<Utc>>> {
        let Some(encoded) = encoded else {
            return Ok(default.copied());
        };
        let text = decode_component(encoded).map_err(|e| {
            CodecError::decode_with(format!("Unable to decode date from \"{encoded}\""), e)
        })?;
        parse_date(&text).map(Some).map_err(|e| {
            CodecError::decode_with(format!("Unable to decode date from \"{encoded}\""), e)
        })
    }
}

fn parse_date(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(text) {
        Ok(parsed) => Ok(parsed.with_timezone(&Utc)),
        Err(rfc3339_err) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
            .ok_or(rfc3339_err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn y2k() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_simple_date_without_default() {
        let encoded = DateCodec.encode(&y2k(), None).unwrap().unwrap();
        assert_eq!(encoded, "2000-01-01T00%3A00%3A00.000Z");
        assert_eq!(DateCodec.decode(Some(&encoded), None).unwrap(), Some(y2k()));
    }

    #[test]
    fn test_identical_default_is_masked() {
        assert_eq!(DateCodec.encode(&y2k(), Some(&y2k())).unwrap(), None);
        assert_eq!(DateCodec.decode(None, Some(&y2k())).unwrap(), Some(y2k()));
    }

    #[test]
    fn test_sub_millisecond_precision_survives() {
        let precise = y2k() + chrono::Duration::nanoseconds(1_500);
        let encoded = DateCodec.encode(&precise, None).unwrap().unwrap();
        assert_eq!(DateCodec.decode(Some(&encoded), None).unwrap(), Some(precise));
    }

    #[test]
    fn test_offsets_normalize_to_utc() {
        let decoded = DateCodec
            .decode(Some("2000-01-01T02%3A00%3A00%2B02%3A00"), None)
            .unwrap();
        assert_eq!(decoded, Some(y2k()));
    }

    #[test]
    fn test_bare_date_is_utc_midnight() {
        assert_eq!(DateCodec.decode(Some("2000-01-01"), None).unwrap(), Some(y2k()));
    }

    #[test]
    fn test_invalid_date_string_fails() {
        let err = DateCodec
            .decode(Some("2000-01-01Y00%3A00%3A00.000Z"), None)
            .unwrap_err();
        assert!(err.is_decode());
        assert!(DateCodec.decode(Some("2000-13-01"), None).is_err());
    }
}
