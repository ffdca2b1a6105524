use super::base64_json::decode_base64;
use super::ValueCodec;
use crate::error::{CodecError, CodecResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Default DEFLATE compression level (0-9, higher = smaller but slower).
pub const DEFAULT_DEFLATE_LEVEL: u32 = 6;

/// Default limit on the size of an inflated value.
pub const DEFAULT_MAX_INFLATED_SIZE: usize = 1024 * 1024;

/// Compresses the wrapped codec's output with raw DEFLATE (RFC 1951, no
/// header or checksum) and base64url-encodes the compressed bytes.
///
/// Meant for exceptionally large values, e.g. objects encoded with
/// [`Base64JsonCodec`](super::Base64JsonCodec). `None` and the empty
/// string pass through unchanged.
#[derive(Clone, Copy, Debug)]
pub struct DeflateRaw<C> {
    codec: C,
    level: u32,
    max_inflated_size: usize,
}

impl<C> DeflateRaw<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            level: DEFAULT_DEFLATE_LEVEL,
            max_inflated_size: DEFAULT_MAX_INFLATED_SIZE,
        }
    }

    /// Set compression level, clamped to 0-9.
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.min(9);
        self
    }

    /// Reject encoded values that inflate beyond `max` bytes.
    #[must_use]
    pub fn with_max_inflated_size(mut self, max: usize) -> Self {
        self.max_inflated_size = max;
        self
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_inflated_size(&self) -> usize {
        self.max_inflated_size
    }

    pub fn inner(&self) -> &C {
        &self.codec
    }

    fn compress(&self, data: &str) -> std::io::Result<Vec<u8>> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(self.level));
        encoder.write_all(data.as_bytes())?;
        encoder.finish()
    }

    fn inflate(&self, compressed: &[u8]) -> Result<String, CodecError> {
        // One byte over the limit is enough to tell that it was exceeded.
        let limit = self.max_inflated_size.saturating_add(1) as u64;
        let mut output = Vec::new();
        DeflateDecoder::new(compressed)
            .take(limit)
            .read_to_end(&mut output)
            .map_err(|e| CodecError::decode_with("Deflate raw decompression failed", e))?;
        if output.len() > self.max_inflated_size {
            return Err(CodecError::decode(format!(
                "Deflate raw decompression failed: inflated size exceeds limit of {} bytes",
                self.max_inflated_size
            )));
        }
        String::from_utf8(output)
            .map_err(|e| CodecError::decode_with("Deflate raw decompression failed", e))
    }
}

impl<T, C: ValueCodec<T>> ValueCodec<T> for DeflateRaw<C> {
    fn encode(&self, value: &T, default: Option<&T>) -> CodecResult<Option<String>> {
        let encoded = match self.codec.encode(value, default)? {
            Some(encoded) if !encoded.is_empty() => encoded,
            passthrough => return Ok(passthrough),
        };
        let compressed = self
            .compress(&encoded)
            .map_err(|e| CodecError::encode_with("Deflate raw compression failed", e))?;
        Ok(Some(URL_SAFE_NO_PAD.encode(compressed)))
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&T>) -> CodecResult<Option<T>> {
        let encoded = match encoded {
            Some(encoded) if !encoded.is_empty() => encoded,
            _ => return self.codec.decode(None, default),
        };
        let compressed = decode_base64(encoded)
            .map_err(|e| CodecError::decode_with("Deflate raw decompression failed", e))?;
        let inflated = self.inflate(&compressed)?;
        self.codec.decode(Some(&inflated), default)
    }
}
