//! Error types for codec and state-codec operations.

use crate::Path;
use thiserror::Error;

/// Result type alias for every fallible operation in this crate.
pub type CodecResult<T> = Result<T, CodecError>;

/// Boxed third-party error retained as the cause of a codec failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a [`CodecError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value could not be represented as a string.
    Encode,
    /// An encoded string did not match the expected grammar.
    Decode,
    /// Several independent failures bundled together.
    Aggregate,
    /// A query string could not be parsed.
    Parse,
    /// A connection or state codec was declared incorrectly.
    Connection,
}

/// Errors produced while encoding or decoding values and state trees.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A value could not be encoded.
    #[error("{message}")]
    Encode {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// An encoded value could not be decoded.
    #[error("{message}")]
    Decode {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Several independent failures, in the order they occurred.
    #[error("{message}")]
    Aggregate {
        message: String,
        causes: Vec<CodecError>,
    },

    /// A failure of the codec bound to one URL parameter.
    #[error("URL parameter \"{parameter}\" ({path}): {source}")]
    Parameter {
        parameter: String,
        path: Path,
        #[source]
        source: Box<CodecError>,
    },

    /// The query string could not be parsed into parameters.
    #[error("unable to parse URL parameters from string")]
    Parse {
        #[source]
        source: BoxError,
    },

    /// A connection or state codec was declared incorrectly.
    #[error("invalid connection: {message}")]
    InvalidConnection { message: String },

    /// A container was required where the tree holds a scalar.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: Path,
        expected: &'static str,
        found: &'static str,
    },
}

impl CodecError {
    /// Create an encoding error without a cause.
    #[inline]
    pub fn encode(message: impl Into<String>) -> Self {
        CodecError::Encode {
            message: message.into(),
            source: None,
        }
    }

    /// Create an encoding error caused by `source`.
    #[inline]
    pub fn encode_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        CodecError::Encode {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a decoding error without a cause.
    #[inline]
    pub fn decode(message: impl Into<String>) -> Self {
        CodecError::Decode {
            message: message.into(),
            source: None,
        }
    }

    /// Create a decoding error caused by `source`.
    #[inline]
    pub fn decode_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        CodecError::Decode {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Bundle several failures into one.
    #[inline]
    pub fn aggregate(message: impl Into<String>, causes: Vec<CodecError>) -> Self {
        CodecError::Aggregate {
            message: message.into(),
            causes,
        }
    }

    /// Attach the URL parameter and state path a failure belongs to.
    #[inline]
    pub fn for_parameter(self, parameter: impl Into<String>, path: Path) -> Self {
        CodecError::Parameter {
            parameter: parameter.into(),
            path,
            source: Box::new(self),
        }
    }

    /// Create a query-string parse error.
    #[inline]
    pub fn parse(source: impl Into<BoxError>) -> Self {
        CodecError::Parse {
            source: source.into(),
        }
    }

    /// Create an invalid connection error.
    #[inline]
    pub fn invalid_connection(message: impl Into<String>) -> Self {
        CodecError::InvalidConnection {
            message: message.into(),
        }
    }

    /// Create a type mismatch error.
    #[inline]
    pub fn type_mismatch(path: Path, expected: &'static str, found: &'static str) -> Self {
        CodecError::TypeMismatch {
            path,
            expected,
            found,
        }
    }

    /// Classify this error. Parameter wrappers report the kind of the
    /// failure they wrap.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Encode { .. } => ErrorKind::Encode,
            CodecError::Decode { .. } => ErrorKind::Decode,
            CodecError::Aggregate { .. } => ErrorKind::Aggregate,
            CodecError::Parameter { source, .. } => source.kind(),
            CodecError::Parse { .. } => ErrorKind::Parse,
            CodecError::InvalidConnection { .. } | CodecError::TypeMismatch { .. } => {
                ErrorKind::Connection
            }
        }
    }

    /// True for decoding and query-string parse failures.
    pub fn is_decode(&self) -> bool {
        matches!(self.kind(), ErrorKind::Decode | ErrorKind::Parse)
    }

    /// The bundled failures of an aggregate error; empty otherwise.
    pub fn causes(&self) -> &[CodecError] {
        match self {
            CodecError::Aggregate { causes, .. } => causes,
            _ => &[],
        }
    }
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
