//! Value codecs and the combinators that wrap them.
//!
//! A [`ValueCodec`] converts one decoded value type to and from a URL-safe
//! string. Every codec follows the default-masking contract:
//!
//! - `encode(v, Some(d))` returns `Ok(None)` when `v` equals `d`;
//! - `decode(None, d)` returns `Ok(d.cloned())`.
//!
//! Wrappers take a codec and return a new one. They compose by nesting and
//! pass `None` through untouched, so a value equal to its default collapses
//! the whole chain to `None` and the parameter is omitted.
//!
//! ```
//! use urlstate::codec::{array_of, nullable, NumberCodec, Separator, StringCodec, ValueCodec};
//!
//! let center = array_of(NumberCodec, Separator::LowerX);
//! let encoded = center.encode(&vec![42.4027, 2.1563], None).unwrap();
//! assert_eq!(encoded.as_deref(), Some("42.4027x2.1563"));
//!
//! let name = nullable(StringCodec);
//! assert_eq!(name.encode(&None, Some(&None)).unwrap(), None);
//! ```

mod array;
mod base64_json;
mod boolean;
mod date;
mod deflate;
mod json_patch;
mod nan;
mod nullable;
mod number;
mod string;
pub(crate) mod uri;

pub use array::{ArrayOf, Separator};
pub use base64_json::Base64JsonCodec;
pub use boolean::{BooleanCodec, ENCODED_FALSE, ENCODED_TRUE};
pub use date::DateCodec;
pub use deflate::{DeflateRaw, DEFAULT_DEFLATE_LEVEL, DEFAULT_MAX_INFLATED_SIZE};
pub use json_patch::WithJsonPatch;
pub use nan::{WithNaN, ENCODED_NAN};
pub use nullable::{Nullable, ENCODED_NULL};
pub use number::{IntegerCodec, NumberCodec};
pub use string::StringCodec;

use crate::error::CodecResult;
use std::sync::Arc;

/// An encoder/decoder pair for one value type.
///
/// Implementations must be pure: no shared mutable state, no panics. All
/// failures are reported through [`CodecResult`].
pub trait ValueCodec<T> {
    /// Encode `value`, or return `Ok(None)` when it equals `default`.
    fn encode(&self, value: &T, default: Option<&T>) -> CodecResult<Option<String>>;

    /// Decode `encoded`, or return the default when nothing was encoded.
    fn decode(&self, encoded: Option<&str>, default: Option<&T>) -> CodecResult<Option<T>>;
}

impl<T, C: ValueCodec<T> + ?Sized> ValueCodec<T> for &C {
    fn encode(&self, value: &T, default: Option<&T>) -> CodecResult<Option<String>> {
        (**self).encode(value, default)
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&T>) -> CodecResult<Option<T>> {
        (**self).decode(encoded, default)
    }
}

impl<T, C: ValueCodec<T> + ?Sized> ValueCodec<T> for Box<C> {
    fn encode(&self, value: &T, default: Option<&T>) -> CodecResult<Option<String>> {
        (**self).encode(value, default)
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&T>) -> CodecResult<Option<T>> {
        (**self).decode(encoded, default)
    }
}

impl<T, C: ValueCodec<T> + ?Sized> ValueCodec<T> for Arc<C> {
    fn encode(&self, value: &T, default: Option<&T>) -> CodecResult<Option<String>> {
        (**self).encode(value, default)
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&T>) -> CodecResult<Option<T>> {
        (**self).decode(encoded, default)
    }
}

/// A codec assembled from two closures.
///
/// Handy for one-off custom codecs. The closures carry the whole contract,
/// default-masking included.
pub struct FnCodec<E, D> {
    encode: E,
    decode: D,
}

impl<E, D> FnCodec<E, D> {
    pub fn new<T>(encode: E, decode: D) -> Self
    where
        E: Fn(&T, Option<&T>) -> CodecResult<Option<String>>,
        D: Fn(Option<&str>, Option<&T>) -> CodecResult<Option<T>>,
    {
        Self { encode, decode }
    }
}

impl<T, E, D> ValueCodec<T> for FnCodec<E, D>
where
    E: Fn(&T, Option<&T>) -> CodecResult<Option<String>>,
    D: Fn(Option<&str>, Option<&T>) -> CodecResult<Option<T>>,
{
    fn encode(&self, value: &T, default: Option<&T>) -> CodecResult<Option<String>> {
        (self.encode)(value, default)
    }

    fn decode(&self, encoded: Option<&str>, default: Option<&T>) -> CodecResult<Option<T>> {
        (self.decode)(encoded, default)
    }
}

/// Encode arrays of primitives joined by `separator`.
pub fn array_of<C>(codec: C, separator: Separator) -> ArrayOf<C> {
    ArrayOf::new(codec, separator)
}

/// Like [`array_of`], but decoding requires exactly `length` elements.
pub fn tuple_of<C>(codec: C, separator: Separator, length: usize) -> ArrayOf<C> {
    ArrayOf::new(codec, separator).with_length(length)
}

/// Encode `None` as `"null"` and delegate everything else.
pub fn nullable<C>(codec: C) -> Nullable<C> {
    Nullable::new(codec)
}

/// Encode `NaN` as `"NaN"` and delegate everything else.
pub fn with_nan<C>(codec: C) -> WithNaN<C> {
    WithNaN::new(codec)
}

/// Compress the wrapped codec's output with raw DEFLATE.
pub fn with_deflate_raw<C>(codec: C) -> DeflateRaw<C> {
    DeflateRaw::new(codec)
}

/// Encode objects as an RFC 6902 patch against their default.
pub fn with_json_patch<C>(codec: C) -> WithJsonPatch<C> {
    WithJsonPatch::new(codec)
}
