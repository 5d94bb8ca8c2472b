//! API tokens held in secure memory.
//!
//! Uses the `secrecy` crate so registry and LLM credentials never end up in
//! logs, `Debug` output or error messages.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value.
    ///
    /// Only call this when building the outgoing request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug() {
        let secret = SecretString::new("lm-super-secret-token");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("lm-super"));
        assert_eq!(debug, "[REDACTED]");
    }

    #[test]
    fn test_expose_and_clone() {
        let secret = SecretString::from("token");
        assert_eq!(secret.clone().expose(), "token");
        assert!(!secret.is_empty());
        assert!(SecretString::from("").is_empty());
    }
}
