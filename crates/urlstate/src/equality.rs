//! Structural equality over JSON-serializable values.
//!
//! Default-masking compares values the way they would look once serialized:
//! members skipped by serde never take part, and numbers compare by numeric
//! value so that `1` and `1.0` are the same.

use serde::Serialize;
use serde_json::Value;

/// Compare two JSON trees structurally.
pub fn json_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x == y;
            }
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return x == y;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_equals(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| json_equals(x, y)))
        }
        _ => a == b,
    }
}

/// Compare two serializable values through their JSON form.
///
/// Values that fail to serialize are never equal to anything.
pub fn deep_equals<T: Serialize + ?Sized>(a: &T, b: &T) -> bool {
    match (serde_json::to_value(a), serde_json::to_value(b)) {
        (Ok(a), Ok(b)) => json_equals(&a, &b),
        _ => false,
    }
}
