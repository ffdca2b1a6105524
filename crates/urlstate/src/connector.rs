//! Declaring which state leaves travel through which URL parameters.
//!
//! A [`StateDefinition`] wraps the default state. Its [`root`] connector walks
//! into the default tree with [`StateConnector::nested`] and binds leaves to
//! parameter names with [`StateConnector::connect`], yielding one
//! [`Connection`] per leaf. The connections are then handed to
//! [`StateDefinition::create_state_codec`].
//!
//! [`root`]: StateDefinition::root

use crate::access::Container;
use crate::codec::ValueCodec;
use crate::error::{CodecError, CodecResult};
use crate::state_codec::{StateCodec, StateCodecOptions};
use crate::tree::{from_tree, to_tree};
use crate::{Path, Seg};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A value codec seen through the JSON form of its value type.
///
/// Connections of different value types live side by side in one state
/// codec, so each typed codec is erased behind this trait. Implemented by
/// the adapter that [`Connection::new`] builds; rarely useful to implement
/// by hand.
pub trait LeafCodec: Send + Sync {
    /// Encode the JSON leaf `value` against the connection's default.
    fn encode_leaf(&self, value: &Value) -> CodecResult<Option<String>>;

    /// Decode `encoded` against the connection's default.
    fn decode_leaf(&self, encoded: Option<&str>) -> CodecResult<Option<Value>>;
}

struct TypedLeaf<T, C> {
    codec: C,
    default: Option<T>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C> LeafCodec for TypedLeaf<T, C>
where
    T: Serialize + DeserializeOwned + Send + Sync,
    C: ValueCodec<T> + Send + Sync,
{
    fn encode_leaf(&self, value: &Value) -> CodecResult<Option<String>> {
        let value: T = from_tree(value).map_err(|e| {
            CodecError::encode_with("State value does not match the codec's value type", e)
        })?;
        self.codec.encode(&value, self.default.as_ref())
    }

    fn decode_leaf(&self, encoded: Option<&str>) -> CodecResult<Option<Value>> {
        let Some(decoded) = self.codec.decode(encoded, self.default.as_ref())? else {
            return Ok(None);
        };
        to_tree(&decoded).map(Some).map_err(|e| {
            CodecError::decode_with("Decoded value cannot be represented in the state tree", e)
        })
    }
}

/// A binding between one state leaf and one URL parameter.
///
/// Immutable once created and cheap to clone.
#[derive(Clone)]
pub struct Connection {
    state_path: Path,
    default_value: Option<Value>,
    url_parameter: String,
    codec: Arc<dyn LeafCodec>,
}

impl Connection {
    /// Bind the leaf at `state_path` to `url_parameter` using `codec`.
    ///
    /// Usually created through [`StateConnector::connect`]. An empty
    /// `state_path` is accepted here but reported when decoding.
    pub fn new<T, C>(
        state_path: Path,
        default_value: Option<T>,
        url_parameter: impl Into<String>,
        codec: C,
    ) -> CodecResult<Self>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        C: ValueCodec<T> + Send + Sync + 'static,
    {
        let url_parameter = url_parameter.into();
        let default_json = default_value
            .as_ref()
            .map(to_tree)
            .transpose()
            .map_err(|e| {
                CodecError::invalid_connection(format!(
                    "default value for URL parameter \"{url_parameter}\" is not representable as JSON: {e}"
                ))
            })?;

        Ok(Self {
            state_path,
            default_value: default_json,
            url_parameter,
            codec: Arc::new(TypedLeaf {
                codec,
                default: default_value,
                _marker: PhantomData,
            }),
        })
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// The default as it appears in the state tree. Non-finite floats show
    /// up as `"NaN"`, `"Infinity"` or `"-Infinity"`.
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn url_parameter(&self) -> &str {
        &self.url_parameter
    }

    pub(crate) fn codec(&self) -> &dyn LeafCodec {
        self.codec.as_ref()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("state_path", &self.state_path)
            .field("default_value", &self.default_value)
            .field("url_parameter", &self.url_parameter)
            .finish_non_exhaustive()
    }
}

/// Builds connections for the subtree at one path of the default state.
#[derive(Clone, Debug)]
pub struct StateConnector<'a> {
    path: Path,
    node: Option<&'a Value>,
}

impl<'a> StateConnector<'a> {
    /// The path this connector is rooted at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bind the child `key` to `url_parameter`.
    ///
    /// The default is read from the default state at the child's path. A
    /// leaf absent from the default state reads as `null`, which gives
    /// `Option` leaves a `None` default and other leaves no default at all.
    /// A default that does not deserialize into `T` is rejected.
    pub fn connect<T, C>(
        &self,
        key: impl Into<Seg>,
        url_parameter: impl Into<String>,
        codec: C,
    ) -> CodecResult<Connection>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        C: ValueCodec<T> + Send + Sync + 'static,
    {
        connect_at(&self.path, self.node, key.into(), url_parameter.into(), codec)
    }

    /// A connector for the subtree at child `key`.
    pub fn nested(&self, key: impl Into<Seg>) -> StateConnector<'a> {
        let key = key.into();
        StateConnector {
            node: Container::of(self.node).child(&key),
            path: self.path.child(key),
        }
    }
}

fn connect_at<T, C>(
    path: &Path,
    node: Option<&Value>,
    key: Seg,
    url_parameter: String,
    codec: C,
) -> CodecResult<Connection>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
    C: ValueCodec<T> + Send + Sync + 'static,
{
    let leaf = Container::of(node).child(&key);
    let state_path = path.child(key);
    let default = match leaf {
        Some(value) => Some(from_tree::<T>(value).map_err(|e| {
            CodecError::invalid_connection(format!(
                "default value at {state_path} does not match the codec for URL parameter \
                 \"{url_parameter}\": {e}"
            ))
        })?),
        None => from_tree::<T>(&Value::Null).ok(),
    };
    Connection::new(state_path, default, url_parameter, codec)
}

/// The default state of an application, and the entry point for declaring
/// its URL representation.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use urlstate::codec::{nullable, NumberCodec, StringCodec};
/// use urlstate::StateDefinition;
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct MapState {
///     zoom: f64,
///     name: Option<String>,
/// }
///
/// let definition = StateDefinition::new(&MapState { zoom: 3.0, name: None }).unwrap();
/// let root = definition.root();
/// let state_codec = definition
///     .create_state_codec([
///         root.connect("zoom", "z", NumberCodec).unwrap(),
///         root.connect("name", "n", nullable(StringCodec)).unwrap(),
///     ])
///     .unwrap();
///
/// let query = state_codec
///     .encode_to_query_string(&MapState { zoom: 4.0, name: None })
///     .unwrap();
/// assert_eq!(query, "z=4");
/// ```
pub struct StateDefinition<S> {
    default_state: Value,
    _marker: PhantomData<fn() -> S>,
}

impl<S: Serialize> StateDefinition<S> {
    /// Capture `default_state` as a JSON tree.
    pub fn new(default_state: &S) -> CodecResult<Self> {
        let default_state = to_tree(default_state).map_err(|e| {
            CodecError::invalid_connection(format!(
                "default state is not representable as JSON: {e}"
            ))
        })?;
        Ok(Self {
            default_state,
            _marker: PhantomData,
        })
    }
}

impl<S> StateDefinition<S> {
    /// A connector rooted at the top of the state tree.
    pub fn root(&self) -> StateConnector<'_> {
        StateConnector {
            path: Path::root(),
            node: Some(&self.default_state),
        }
    }

    pub fn default_state(&self) -> &Value {
        &self.default_state
    }

    /// Build a state codec over `connections` with default options.
    pub fn create_state_codec(
        &self,
        connections: impl IntoIterator<Item = Connection>,
    ) -> CodecResult<StateCodec<S>> {
        self.create_state_codec_with(connections, StateCodecOptions::default())
    }

    /// Build a state codec over `connections`.
    pub fn create_state_codec_with(
        &self,
        connections: impl IntoIterator<Item = Connection>,
        options: StateCodecOptions,
    ) -> CodecResult<StateCodec<S>> {
        StateCodec::new(connections.into_iter().collect(), options)
    }
}

impl<S> fmt::Debug for StateDefinition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDefinition")
            .field("default_state", &self.default_state)
            .finish()
    }
}
