//! Best-effort results.
//!
//! Some steps are allowed to fail without aborting the surrounding work (a
//! count query, an optional source, a summary). `Outcome` keeps the failure
//! visible as an inline marker instead of swallowing it.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Inline description of a step that failed but did not abort its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMarker {
    pub message: String,
}

impl ErrorMarker {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Marker for `error`, prefixed with what was being attempted.
    pub fn from_error(context: &str, error: &dyn fmt::Display) -> Self {
        Self::new(format!("{context}: {error}"))
    }
}

impl fmt::Display for ErrorMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Serialize for ErrorMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("error", &self.message)?;
        map.end()
    }
}

/// Either a value, or the marker left by a step that degraded.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Degraded(ErrorMarker),
}

impl<T> Outcome<T> {
    /// Convert a result, labelling the failure with `context`.
    pub fn from_result<E: fmt::Display>(result: Result<T, E>, context: &str) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(e) => Outcome::Degraded(ErrorMarker::from_error(context, &e)),
        }
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Outcome::Degraded(ErrorMarker::new(message))
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Degraded(_) => None,
        }
    }

    pub fn marker(&self) -> Option<&ErrorMarker> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Degraded(marker) => Some(marker),
        }
    }

    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Degraded(marker) => Outcome::Degraded(marker.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Degraded(marker) => Outcome::Degraded(marker),
        }
    }

    pub fn into_result(self) -> Result<T, ErrorMarker> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Degraded(marker) => Err(marker),
        }
    }
}

/// A degraded outcome serializes as `{"error": "<message>"}`.
impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Ok(value) => value.serialize(serializer),
            Outcome::Degraded(marker) => marker.serialize(serializer),
        }
    }
}
