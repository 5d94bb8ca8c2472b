//! Optional-path lookups into registry JSON.
//!
//! Registry payloads are opaque nested JSON. Instead of chaining `.get()`
//! calls and hoping every level is an object, walk a fixed path and get an
//! explicit `None` when any segment is missing or has the wrong shape.

use serde_json::Value;

/// Path of the legal name inside an RNE record.
pub const DENOMINATION_PATH: &[&str] = &[
    "formality",
    "content",
    "personneMorale",
    "identite",
    "entreprise",
    "denomination",
];

/// Follow `path` through nested objects.
///
/// Returns `None` as soon as a segment is absent or the current value is not
/// an object.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, segment| current.as_object()?.get(*segment))
}

/// Follow `path` and return a non-blank, trimmed string leaf.
pub fn lookup_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Legal name of the company described by an RNE record.
pub fn denomination(record: &Value) -> Option<&str> {
    lookup_str(record, DENOMINATION_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rne_record(name: Value) -> Value {
        json!({
            "formality": {
                "content": {
                    "personneMorale": {
                        "identite": { "entreprise": { "denomination": name } }
                    }
                }
            }
        })
    }

    #[test]
    fn test_lookup_finds_nested_value() {
        let value = json!({"a": {"b": {"c": 3}}});
        assert_eq!(lookup(&value, &["a", "b", "c"]), Some(&json!(3)));
        assert_eq!(lookup(&value, &[]), Some(&value));
    }

    #[test]
    fn test_lookup_missing_segment() {
        let value = json!({"a": {"b": 1}});
        assert_eq!(lookup(&value, &["a", "x"]), None);
    }

    #[test]
    fn test_lookup_through_non_object() {
        let value = json!({"a": [1, 2], "b": null, "c": "text"});
        assert_eq!(lookup(&value, &["a", "0"]), None);
        assert_eq!(lookup(&value, &["b", "x"]), None);
        assert_eq!(lookup(&value, &["c", "x"]), None);
    }

    #[test]
    fn test_denomination() {
        assert_eq!(denomination(&rne_record(json!("  EXAMPLE SA "))), Some("EXAMPLE SA"));
        assert_eq!(denomination(&rne_record(json!("   "))), None);
        assert_eq!(denomination(&rne_record(json!(42))), None);
        assert_eq!(denomination(&json!({"formality": null})), None);
        assert_eq!(denomination(&json!("not an object")), None);
    }
}
