//! Environment lookups for client configuration.
//!
//! Configuration is resolved once, at startup, through a lookup function so
//! that construction stays pure and testable: production passes
//! [`process_env`], tests pass a closure over a map.

/// Look up a variable in the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// First of `keys` that is set to a non-blank value, trimmed.
pub fn first_set(lookup: &dyn Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_first_set_skips_blank_values() {
        let vars: HashMap<&str, &str> = [("A", "  "), ("B", " token ")].into_iter().collect();
        let lookup = |key: &str| vars.get(key).map(|v| v.to_string());

        assert_eq!(first_set(&lookup, &["A", "B"]), Some("token".to_string()));
        assert_eq!(first_set(&lookup, &["A"]), None);
        assert_eq!(first_set(&lookup, &["C"]), None);
    }
}
