//! Flattening and diffing of nested JSON.
//!
//! Two payloads with unrelated schemas are reduced to the same key space
//! (`a.b`, `c[0]`, ...) and joined into one row per key.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

/// Longest display text before truncation.
pub const DISPLAY_LIMIT: usize = 2000;

const ELLIPSIS: &str = " …";

/// Path key → scalar leaf, sorted by key.
pub type FlatMap = BTreeMap<String, Value>;

/// Flatten `value` into path keys.
///
/// Object fields join with `.`, array elements use `[i]`, and scalars are
/// stored at the current path (a top-level scalar lands on the empty key).
/// Empty objects and arrays contribute nothing.
pub fn flatten(value: &Value) -> FlatMap {
    let mut out = FlatMap::new();
    flatten_into(value, "", &mut out);
    out
}

fn flatten_into(value: &Value, prefix: &str, out: &mut FlatMap) {
    match value {
        Value::Object(fields) => {
            for (key, child) in fields {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(child, &path, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, &format!("{prefix}[{index}]"), out);
            }
        }
        scalar => {
            out.insert(prefix.to_string(), scalar.clone());
        }
    }
}

/// One key of the union, with each side's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub key: String,
    pub left: Option<Value>,
    pub right: Option<Value>,
}

impl ComparisonRow {
    pub fn left_display(&self) -> String {
        display_value(self.left.as_ref())
    }

    pub fn right_display(&self) -> String {
        display_value(self.right.as_ref())
    }

    /// Both sides present and displaying the same text.
    pub fn is_match(&self) -> bool {
        self.left.is_some() && self.right.is_some() && self.left_display() == self.right_display()
    }
}

/// Full outer join of two flat maps, sorted by key.
pub fn compare(left: &FlatMap, right: &FlatMap) -> Vec<ComparisonRow> {
    let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();

    keys.into_iter()
        .map(|key| ComparisonRow {
            key: key.clone(),
            left: left.get(key).cloned(),
            right: right.get(key).cloned(),
        })
        .collect()
}

/// Text shown in a table cell.
///
/// Absent and null are empty, strings are shown raw, everything else as
/// compact JSON. Long text is cut at [`DISPLAY_LIMIT`] characters.
pub fn display_value(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => return String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    truncate_chars(&text, DISPLAY_LIMIT)
}

/// Keep the first `limit` characters, marking the cut.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
