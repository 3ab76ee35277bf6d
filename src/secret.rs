//! Redacting wrapper for sensitive input values.

use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Placeholder rendered instead of a secret value.
pub const REDACTED: &str = "**********";

/// A value that never renders in plaintext.
///
/// Wrap tokens, passwords and other sensitive step inputs in `Secret` so the
/// lifecycle's start/end/error dumps show [`REDACTED`] instead of the value.
/// `Debug`, `Display` and `Serialize` are all redacting; the inner value is
/// only reachable through [`Secret::expose`].
///
/// Deserialization accepts the plain inner value, so secrets can be supplied
/// through [`from_template`](crate::from_template) overrides. Note that a
/// secret does not survive a template *copy*: the template serializes
/// redacted, so the copied step holds the placeholder unless the field is
/// overridden explicitly.
///
/// # Examples
///
/// ```
/// use stepwell::Secret;
///
/// let token = Secret::new("hunter2".to_string());
/// assert_eq!(token.to_string(), "**********");
/// assert_eq!(format!("{token:?}"), r#"Secret("**********")"#);
/// assert_eq!(token.expose(), "hunter2");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Secret<T>(T);

impl<T> Secret<T> {
    /// Wraps a value.
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Grants access to the wrapped value.
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Unwraps the value, consuming the redaction guard.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Secret").field(&REDACTED).finish()
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{REDACTED}")
    }
}

impl<T> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Secret<String> {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl<T> Serialize for Secret<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Secret<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Secret::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_debug_redact() {
        let secret = Secret::new("hunter2".to_string());
        assert_eq!(secret.to_string(), REDACTED);
        assert_eq!(format!("{secret:?}"), r#"Secret("**********")"#);
    }

    #[test]
    fn test_serialize_redacts() {
        let secret = Secret::new("hunter2".to_string());
        let json = serde_json::to_string(&secret).expect("serializable");
        assert_eq!(json, r#""**********""#);
    }

    #[test]
    fn test_deserialize_wraps_plain_value() {
        let secret: Secret<String> = serde_json::from_str(r#""hunter2""#).expect("deserializable");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn test_expose_and_into_inner() {
        let secret = Secret::new(42u32);
        assert_eq!(*secret.expose(), 42);
        assert_eq!(secret.into_inner(), 42);
    }
}
