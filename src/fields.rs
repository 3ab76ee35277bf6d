//! Ordered key/value maps used for diagnostics, merging and templates.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// An ordered map of field names to JSON values.
///
/// `Fields` is the common currency between the parts of the lifecycle that
/// deal in "a bag of named values": the diagnostic dump of a step's inputs,
/// the payload handed to [`Output::merge`](crate::Output::merge), and the
/// overrides of [`from_template`](crate::from_template).
///
/// Keys are kept in lexical order so log lines and dumps are deterministic.
///
/// # Examples
///
/// ```
/// use stepwell::Fields;
/// use serde_json::json;
///
/// let fields = Fields::from([("a", json!("foo")), ("n", json!(1))]);
/// assert_eq!(fields.to_string(), r#"a="foo" n=1"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from any serializable value.
    ///
    /// Non-object values (and values that fail to serialize) produce an
    /// empty map; this is a diagnostic helper, not a fallible API. Fields
    /// wrapped in [`Secret`](crate::Secret) serialize redacted, so the
    /// resulting map is safe to log.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwell::Fields;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Inputs { a: String }
    ///
    /// let fields = Fields::of(&Inputs { a: "foo".into() });
    /// assert_eq!(fields.to_string(), r#"a="foo""#);
    /// ```
    pub fn of<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => Self(map.into_iter().collect()),
            _ => Self::default(),
        }
    }

    /// Inserts a field, replacing any existing value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if the map holds no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields in the map.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Absorbs every field of `other`, overwriting on key conflicts.
    pub fn extend(&mut self, other: Fields) {
        self.0.extend(other.0);
    }

    /// Iterates over the fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for Fields {
    /// Renders the map as space-separated `key=value` pairs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.0 {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Fields {
    fn from(pairs: [(&str, Value); N]) -> Self {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

impl From<BTreeMap<String, Value>> for Fields {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}
