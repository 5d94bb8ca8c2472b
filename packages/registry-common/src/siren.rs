//! SIREN: the 9-digit French business registration number.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Number of digits in a SIREN.
pub const SIREN_LEN: usize = 9;

/// Reasons an input is not a SIREN.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SirenError {
    #[error("invalid SIREN {input:?}: expected exactly 9 digits, got {len} characters")]
    Length { input: String, len: usize },

    #[error("invalid SIREN {input:?}: must contain only digits")]
    NonDigit { input: String },
}

/// A validated SIREN.
///
/// Construction trims surrounding whitespace and rejects anything that is not
/// exactly nine ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Siren(String);

impl Siren {
    pub fn parse(input: &str) -> Result<Self, SirenError> {
        let trimmed = input.trim();
        let len = trimmed.chars().count();
        if len != SIREN_LEN {
            return Err(SirenError::Length {
                input: input.to_string(),
                len,
            });
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SirenError::NonDigit {
                input: input.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a value as registries print it: numbers lose their
    /// leading zeros, so pad back to nine digits before comparing.
    pub fn matches_padded(&self, raw: &str) -> bool {
        let raw = raw.trim();
        if raw.len() >= SIREN_LEN {
            return raw == self.0;
        }
        format!("{:0>width$}", raw, width = SIREN_LEN) == self.0
    }
}

impl FromStr for Siren {
    type Err = SirenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Siren {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Siren {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Siren {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
