//! Encoding whole state trees through a set of connections.

use crate::access::{get_deep, set_deep};
use crate::connector::Connection;
use crate::error::{CodecError, CodecResult};
use crate::params::{ParamsObject, UrlSearchParams};
use crate::tree::{from_tree, to_tree};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, trace, warn};

/// Options for building a [`StateCodec`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateCodecOptions {
    /// Permit several connections to share one URL parameter name. When
    /// they do, the connection listed last wins on encode and every one of
    /// them decodes the same value.
    pub allow_duplicate_parameters: bool,
}

/// Encodes a state of type `S` to URL parameters and back.
///
/// Every connection is processed even when an earlier one failed, and all
/// failures are reported together as one [`CodecError::Aggregate`] whose
/// causes are [`CodecError::Parameter`] errors, one per failing connection.
pub struct StateCodec<S> {
    connections: Vec<Connection>,
    _marker: PhantomData<fn() -> S>,
}

impl<S> Clone for StateCodec<S> {
    fn clone(&self) -> Self {
        Self {
            connections: self.connections.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S> fmt::Debug for StateCodec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCodec")
            .field("connections", &self.connections)
            .finish()
    }
}

impl<S> StateCodec<S> {
    pub(crate) fn new(connections: Vec<Connection>, options: StateCodecOptions) -> CodecResult<Self> {
        let mut seen = BTreeSet::new();
        let duplicates: BTreeSet<&str> = connections
            .iter()
            .map(Connection::url_parameter)
            .filter(|name| !seen.insert(*name))
            .collect();

        if !duplicates.is_empty() {
            let names = duplicates
                .iter()
                .map(|name| format!("\"{name}\""))
                .collect::<Vec<_>>()
                .join(", ");
            if !options.allow_duplicate_parameters {
                return Err(CodecError::invalid_connection(format!(
                    "URL parameter names must be unique, found duplicates: {names}"
                )));
            }
            warn!(parameters = %names, "state codec created with duplicate URL parameter names");
        }

        Ok(Self {
            connections,
            _marker: PhantomData,
        })
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// URL parameter names, in connection order.
    pub fn url_parameters(&self) -> impl Iterator<Item = &str> {
        self.connections.iter().map(Connection::url_parameter)
    }

    /// Encode a state tree into parameters.
    ///
    /// Values equal to their connection's default are left out.
    pub fn encode_value(&self, state: &Value) -> CodecResult<ParamsObject> {
        let mut params = ParamsObject::new();
        let mut errors = Vec::new();

        for connection in &self.connections {
            let leaf = get_deep(state, connection.state_path()).unwrap_or(&Value::Null);
            match connection.codec().encode_leaf(leaf) {
                Ok(Some(encoded)) => {
                    trace!(
                        parameter = connection.url_parameter(),
                        path = %connection.state_path(),
                        "encoded state leaf"
                    );
                    params.insert(connection.url_parameter().to_string(), encoded);
                }
                Ok(None) => {
                    trace!(parameter = connection.url_parameter(), "state leaf masked by default");
                }
                Err(e) => errors.push(
                    e.for_parameter(connection.url_parameter(), connection.state_path().clone()),
                ),
            }
        }

        if !errors.is_empty() {
            debug!(errors = errors.len(), "encoding state into URL parameters failed");
            return Err(CodecError::aggregate(
                format!(
                    "Encoding state into URL parameters resulted in {} error(s). See cause for details.",
                    errors.len()
                ),
                errors,
            ));
        }
        Ok(params)
    }

    /// Decode parameters into a fresh state tree.
    ///
    /// Parameters without a connection are ignored. A connection whose
    /// parameter is absent contributes its default; when it has no default
    /// either, nothing is written at its path.
    pub fn decode_value(&self, params: &ParamsObject) -> CodecResult<Value> {
        let mut state = Value::Object(Default::default());
        let mut errors = Vec::new();

        for connection in &self.connections {
            let parameter = connection.url_parameter();
            let path = connection.state_path();
            if path.is_empty() {
                errors.push(CodecError::invalid_connection(format!(
                    "Connection for URL parameter \"{parameter}\" contains an empty path to the \
                     corresponding state"
                )));
                continue;
            }

            let encoded = params.get(parameter).map(String::as_str);
            let decoded = match connection.codec().decode_leaf(encoded) {
                Ok(decoded) => decoded,
                Err(e) => {
                    errors.push(e.for_parameter(parameter, path.clone()));
                    continue;
                }
            };
            trace!(parameter, path = %path, present = encoded.is_some(), "decoded state leaf");

            let Some(value) = decoded.or_else(|| connection.default_value().cloned()) else {
                continue;
            };
            if let Err(e) = set_deep(&mut state, path, value) {
                errors.push(e.for_parameter(parameter, path.clone()));
            }
        }

        if !errors.is_empty() {
            debug!(errors = errors.len(), "decoding state from URL parameters failed");
            return Err(CodecError::aggregate(
                format!(
                    "Decoding state from URL parameters resulted in {} error(s). See cause for details.",
                    errors.len()
                ),
                errors,
            ));
        }
        Ok(state)
    }
}

impl<S: Serialize + DeserializeOwned> StateCodec<S> {
    /// Encode `state` into a parameter map.
    pub fn encode_to_params(&self, state: &S) -> CodecResult<ParamsObject> {
        let tree = to_tree(state)
            .map_err(|e| CodecError::encode_with("Unable to represent state as a JSON tree", e))?;
        self.encode_value(&tree)
    }

    /// Encode `state` into search parameters, ordered by parameter name.
    pub fn encode_to_search_params(&self, state: &S) -> CodecResult<UrlSearchParams> {
        self.encode_to_params(state).map(|params| UrlSearchParams::from(&params))
    }

    /// Encode `state` into a query string without the leading `?`.
    pub fn encode_to_query_string(&self, state: &S) -> CodecResult<String> {
        self.encode_to_search_params(state).map(|params| params.to_string())
    }

    /// Decode a parameter map into a state.
    pub fn decode_from_params(&self, params: &ParamsObject) -> CodecResult<S> {
        let tree = self.decode_value(params)?;
        from_tree(&tree).map_err(|e| {
            CodecError::decode_with("Decoded URL parameters do not form a valid state", e)
        })
    }

    /// Decode search parameters into a state. A repeated name decodes its
    /// last value.
    pub fn decode_from_search_params(&self, params: &UrlSearchParams) -> CodecResult<S> {
        self.decode_from_params(&params.to_params_object())
    }

    /// Decode a query string, with or without the leading `?`.
    pub fn decode_from_query_string(&self, query: &str) -> CodecResult<S> {
        let params = UrlSearchParams::parse(query)?;
        self.decode_from_search_params(&params)
    }
}
