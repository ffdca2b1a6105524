//! Parameter map representations.
//!
//! The state codec produces and consumes a [`ParamsObject`]. The
//! [`UrlSearchParams`] collection and its query-string form are format
//! transforms over the same pairs and never re-run codec logic.

use crate::error::{CodecError, CodecResult};
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;
use std::fmt;

/// Plain mapping from URL parameter name to encoded value.
pub type ParamsObject = BTreeMap<String, String>;

/// Ordered collection of query parameters, duplicates allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UrlSearchParams {
    pairs: Vec<(String, String)>,
}

impl UrlSearchParams {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored, `+` means space, and empty segments between
    /// `&` separators are skipped. A name or value whose escapes decode to
    /// invalid UTF-8 is a parse error.
    pub fn parse(query: &str) -> CodecResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut pairs = Vec::new();
        for segment in query.split('&').filter(|s| !s.is_empty()) {
            let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
            pairs.push((form_decode(name)?, form_decode(value)?));
        }
        Ok(Self { pairs })
    }

    /// The first value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `name`, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the first pair named `name` and drop any others, or append.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| *k == name) {
            Some(first) => {
                self.pairs[first].1 = value;
                let mut index = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = index <= first || *k != name;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((name, value)),
        }
    }

    /// Add a pair, keeping existing pairs with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Remove every pair named `name`.
    pub fn delete(&mut self, name: &str) {
        self.pairs.retain(|(k, _)| k != name);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Collapse into a plain mapping; the last value wins for repeated names.
    pub fn to_params_object(&self) -> ParamsObject {
        self.pairs.iter().cloned().collect()
    }
}

impl From<&ParamsObject> for UrlSearchParams {
    fn from(params: &ParamsObject) -> Self {
        let mut search_params = UrlSearchParams::new();
        for (name, value) in params {
            search_params.set(name.as_str(), value.as_str());
        }
        search_params
    }
}

impl fmt::Display for UrlSearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        f.write_str(&query)
    }
}

fn form_decode(raw: &str) -> CodecResult<String> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(CodecError::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_pairs() {
        let params = UrlSearchParams::parse("?a=1&b=two&&c").unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("two"));
        assert_eq!(params.get("c"), Some(""));
        assert_eq!(params.get("d"), None);
    }

    #[test]
    fn test_parse_decodes_plus_and_escapes() {
        let params = UrlSearchParams::parse("n=Cal%25C3%25A7otada%25202024&q=a+b").unwrap();
        assert_eq!(params.get("n"), Some("Cal%C3%A7otada%202024"));
        assert_eq!(params.get("q"), Some("a b"));
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let err = UrlSearchParams::parse("a=%FF%FE").unwrap_err();
        assert!(matches!(err, CodecError::Parse { .. }));
        assert!(err.is_decode());
    }

    #[test]
    fn test_empty_query() {
        assert!(UrlSearchParams::parse("").unwrap().is_empty());
        assert!(UrlSearchParams::parse("?").unwrap().is_empty());
        assert_eq!(UrlSearchParams::new().to_string(), "");
    }

    #[test]
    fn test_serialization_escapes_percent_and_spaces() {
        let mut params = UrlSearchParams::new();
        params.append("mp", "EPSG%3A32661");
        params.append("t", "a b");
        assert_eq!(params.to_string(), "mp=EPSG%253A32661&t=a+b");
    }

    #[test]
    fn test_set_replaces_first_and_drops_rest() {
        let mut params = UrlSearchParams::parse("a=1&b=2&a=3").unwrap();
        params.set("a", "9");
        assert_eq!(params.to_string(), "a=9&b=2");
        params.set("c", "4");
        assert_eq!(params.get_all("c").collect::<Vec<_>>(), vec!["4"]);
        params.delete("b");
        assert_eq!(params.to_string(), "a=9&c=4");
    }

    #[test]
    fn test_params_object_conversion_last_wins() {
        let params = UrlSearchParams::parse("a=1&a=2&b=3").unwrap();
        let object = params.to_params_object();
        assert_eq!(object.get("a").map(String::as_str), Some("2"));
        assert_eq!(object.len(), 2);

        let back = UrlSearchParams::from(&object);
        assert_eq!(back.to_string(), "a=2&b=3");
    }
}
