//! Path-addressed reads and writes into nested JSON trees.
//!
//! Reads never fail: anything that is not an indexable container, or a key
//! that is absent, yields `None`. Writes scaffold the containers they need
//! and are only ever performed on trees the caller owns exclusively.

use crate::{
    error::{value_type_name, CodecError, CodecResult},
    Path, Seg,
};
use serde_json::{Map, Value};

/// Largest array index [`set_deep`] pads an array up to.
pub const MAX_ARRAY_INDEX: usize = u16::MAX as usize;

/// An indexable view of one node of a state tree.
#[derive(Clone, Copy, Debug)]
pub enum Container<'a> {
    Object(&'a Map<String, Value>),
    Array(&'a [Value]),
    /// Scalars, `null`, and absent nodes.
    Missing,
}

impl<'a> Container<'a> {
    /// Classify a node.
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Object(map)) => Container::Object(map),
            Some(Value::Array(items)) => Container::Array(items),
            _ => Container::Missing,
        }
    }

    /// Step into the child addressed by `seg`.
    pub fn child(self, seg: &Seg) -> Option<&'a Value> {
        match self {
            Container::Object(map) => map.get(seg.object_key().as_ref()),
            Container::Array(items) => seg.array_index().and_then(|i| items.get(i)),
            Container::Missing => None,
        }
    }
}

/// Read the value at `path`, or `None` when any step is not addressable.
///
/// ```
/// use urlstate::{get_deep, path};
/// use serde_json::json;
///
/// let tree = json!({"limbs": [{"leaves": 5}, {"leaves": 8}]});
/// assert_eq!(get_deep(&tree, &path!("limbs", 1, "leaves")), Some(&json!(8)));
/// assert_eq!(get_deep(&tree, &path!("limbs", "x")), None);
/// ```
pub fn get_deep<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = root;
    for seg in path {
        current = Container::of(Some(current)).child(seg)?;
    }
    Some(current)
}

/// Write `value` at `path`, scaffolding missing containers along the way.
///
/// A missing or `null` intermediate becomes an array when the segment that
/// follows it is an index, and an object otherwise. Arrays are padded with
/// `null` up to the written position. The empty path is rejected: this
/// never replaces the root itself.
pub fn set_deep(root: &mut Value, path: &Path, value: Value) -> CodecResult<()> {
    if path.is_empty() {
        return Err(CodecError::invalid_connection(
            "cannot set a value at the empty path",
        ));
    }
    set_at(root, path.segments(), value, path, 0)
}

fn set_at(
    current: &mut Value,
    segments: &[Seg],
    value: Value,
    full_path: &Path,
    depth: usize,
) -> CodecResult<()> {
    let Some((seg, rest)) = segments.split_first() else {
        *current = value;
        return Ok(());
    };

    if current.is_null() {
        *current = if seg.is_index() {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        };
    }

    let child = match current {
        Value::Object(map) => map.entry(seg.object_key().into_owned()).or_insert(Value::Null),
        Value::Array(items) => {
            let Some(idx) = seg.array_index() else {
                return Err(CodecError::type_mismatch(
                    prefix(full_path, depth + 1),
                    "array index",
                    "object key",
                ));
            };
            if idx >= items.len() {
                if idx > MAX_ARRAY_INDEX {
                    return Err(CodecError::invalid_connection(format!(
                        "array index at {} exceeds the limit of {MAX_ARRAY_INDEX}",
                        prefix(full_path, depth + 1)
                    )));
                }
                items.resize(idx + 1, Value::Null);
            }
            &mut items[idx]
        }
        other => {
            return Err(CodecError::type_mismatch(
                prefix(full_path, depth),
                "object or array",
                value_type_name(other),
            ));
        }
    };

    if rest.is_empty() {
        *child = value;
        Ok(())
    } else {
        set_at(child, rest, value, full_path, depth + 1)
    }
}

fn prefix(path: &Path, len: usize) -> Path {
    Path::from_segments(path.segments()[..len].to_vec())
}
