//! Composable codecs mapping a nested application state to URL query
//! parameters and back.
//!
//! `urlstate` binds leaves of a state tree to short parameter names, encodes
//! each leaf with a [`ValueCodec`](codec::ValueCodec), and leaves out every
//! value that equals its default so URLs stay short.
//!
//! # Core Concepts
//!
//! - **ValueCodec**: encode/decode pair for one value type, with default-masking
//! - **Wrappers**: codecs built from codecs (`array_of`, `nullable`, `with_nan`,
//!   `with_deflate_raw`, `with_json_patch`)
//! - **StateDefinition**: the default state, and connectors walking into it
//! - **Connection**: one state path bound to one URL parameter and codec
//! - **StateCodec**: encodes and decodes whole states through its connections,
//!   reporting every failing connection at once
//!
//! # Masking
//!
//! ```text
//! encode(v, Some(d)) == Ok(None)     when v == d
//! decode(None, Some(d)) == Ok(Some(d))
//! ```
//!
//! A masked value becomes an absent parameter, and an absent parameter
//! decodes to the default.
//!
//! # Quick Start
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use urlstate::codec::{nullable, NumberCodec, StringCodec};
//! use urlstate::StateDefinition;
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct SimpleMapState {
//!     latitude: f64,
//!     longitude: f64,
//!     zoom: f64,
//!     name: Option<String>,
//! }
//!
//! let default_state = SimpleMapState { latitude: 0.0, longitude: 0.0, zoom: 3.0, name: None };
//! let definition = StateDefinition::new(&default_state).unwrap();
//! let root = definition.root();
//! let state_codec = definition
//!     .create_state_codec([
//!         root.connect("longitude", "x", NumberCodec).unwrap(),
//!         root.connect("latitude", "y", NumberCodec).unwrap(),
//!         root.connect("zoom", "z", NumberCodec).unwrap(),
//!         root.connect("name", "n", nullable(StringCodec)).unwrap(),
//!     ])
//!     .unwrap();
//!
//! let tweaked = SimpleMapState { zoom: 4.0, ..default_state };
//! let query = state_codec.encode_to_query_string(&tweaked).unwrap();
//! assert_eq!(query, "z=4");
//! assert_eq!(state_codec.decode_from_query_string(&query).unwrap(), tweaked);
//! ```

mod access;
pub mod codec;
mod connector;
mod equality;
mod error;
mod params;
mod path;
mod state_codec;
mod tree;

// Core types
pub use error::{value_type_name, BoxError, CodecError, CodecResult, ErrorKind};
pub use path::{Path, Seg};

// Structural helpers
pub use access::{get_deep, set_deep, Container, MAX_ARRAY_INDEX};
pub use equality::{deep_equals, json_equals};

// State binding
pub use connector::{Connection, LeafCodec, StateConnector, StateDefinition};
pub use params::{ParamsObject, UrlSearchParams};
pub use state_codec::{StateCodec, StateCodecOptions};
pub use tree::{from_tree, to_tree};

// Re-export serde_json::Value for convenience
pub use serde_json::Value;
