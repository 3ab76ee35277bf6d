//! Declared result fields for a step's output.

use serde_json::Value;

/// The JSON shape an output field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string.
    String,
    /// A JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Float,
    /// A JSON boolean.
    Boolean,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
    /// Any value at all.
    Any,
}

impl FieldKind {
    /// Returns `true` if `value` satisfies this kind.
    ///
    /// `null` only satisfies [`FieldKind::Any`]; an unset field is expressed
    /// by absence, not by `null`.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Float => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Array => value.is_array(),
            FieldKind::Object => value.is_object(),
            FieldKind::Any => true,
        }
    }

    /// Short label used in validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
            FieldKind::Any => "any",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Short label for the shape of an actual JSON value, for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Declaration of a single output field.
///
/// # Examples
///
/// ```
/// use stepwell::{FieldKind, FieldSpec};
///
/// let spec = FieldSpec::required("b", FieldKind::String);
/// assert!(spec.is_required());
///
/// let spec = FieldSpec::optional("token", FieldKind::String).sensitive();
/// assert!(spec.is_sensitive());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    required: bool,
    sensitive: bool,
}

impl FieldSpec {
    /// Declares a field that must be set before validation passes.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            sensitive: false,
        }
    }

    /// Declares a field that may be left unset.
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    /// Marks the field as sensitive; its value renders redacted in dumps.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared shape.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether validation demands the field be set.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether dumps must redact the field's value.
    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }
}

/// The declared result fields of a step.
///
/// Built with a small builder API and owned by every [`Output`](crate::Output).
///
/// # Examples
///
/// ```
/// use stepwell::{FieldKind, OutputSchema};
///
/// let schema = OutputSchema::new()
///     .require("b", FieldKind::String)
///     .optional("count", FieldKind::Integer);
/// assert_eq!(schema.specs().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputSchema {
    fields: Vec<FieldSpec>,
}

impl OutputSchema {
    /// Creates a schema with no declared fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fully specified field.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Shorthand for adding a required field.
    pub fn require(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.field(FieldSpec::required(name, kind))
    }

    /// Shorthand for adding an optional field.
    pub fn optional(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.field(FieldSpec::optional(name, kind))
    }

    /// All declared fields, in declaration order.
    pub fn specs(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_matching() {
        assert!(FieldKind::String.matches(&json!("x")));
        assert!(!FieldKind::String.matches(&json!(1)));
        assert!(FieldKind::Integer.matches(&json!(1)));
        assert!(!FieldKind::Integer.matches(&json!(1.5)));
        assert!(FieldKind::Float.matches(&json!(1.5)));
        assert!(FieldKind::Float.matches(&json!(1)));
        assert!(FieldKind::Boolean.matches(&json!(true)));
        assert!(FieldKind::Array.matches(&json!([1, 2])));
        assert!(FieldKind::Object.matches(&json!({"a": 1})));
        assert!(FieldKind::Any.matches(&json!(null)));
        assert!(!FieldKind::String.matches(&json!(null)));
    }

    #[test]
    fn test_schema_lookup() {
        let schema = OutputSchema::new()
            .require("b", FieldKind::String)
            .optional("count", FieldKind::Integer);

        assert!(schema.get("b").is_some_and(FieldSpec::is_required));
        assert!(schema.get("count").is_some_and(|s| !s.is_required()));
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn test_sensitive_flag() {
        let spec = FieldSpec::required("token", FieldKind::String).sensitive();
        assert!(spec.is_sensitive());
        assert!(!FieldSpec::required("b", FieldKind::String).is_sensitive());
    }
}
