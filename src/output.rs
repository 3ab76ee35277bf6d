//! The typed, named, mergeable result container owned by a step.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Issue, ValidationError};
use crate::fields::Fields;
use crate::schema::{kind_of, OutputSchema};
use crate::secret::REDACTED;
use crate::step::StepName;

/// The result container of a step.
///
/// An `Output` pairs an [`OutputSchema`] with the values assigned so far.
/// A field is *unset* while its key is absent; there is no `null` marker.
///
/// Two construction modes exist:
/// - [`Output::lazy`] defers validation so the lifecycle can fill fields
///   incrementally during the step body,
/// - [`Output::strict`] validates immediately, for values built outside the
///   lifecycle (comparison values in tests, pre-baked results).
///
/// # Examples
///
/// ```
/// use stepwell::{FieldKind, Output, OutputSchema};
/// use serde_json::json;
///
/// let schema = OutputSchema::new().require("b", FieldKind::String);
///
/// let mut output = Output::lazy(schema);
/// assert!(output.validate().is_err());
///
/// output.set("b", "done");
/// assert!(output.validate().is_ok());
/// assert_eq!(output.get("b"), Some(&json!("done")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    name: String,
    description: String,
    schema: OutputSchema,
    values: BTreeMap<String, Value>,
}

impl Output {
    /// Constructs an output with every field unset and validation deferred.
    pub fn lazy(schema: OutputSchema) -> Self {
        Self {
            name: "Output".to_string(),
            description: "Output".to_string(),
            schema,
            values: BTreeMap::new(),
        }
    }

    /// Constructs an output from `fields` and validates it immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when a required field is unset or a set
    /// field has the wrong shape.
    pub fn strict(schema: OutputSchema, fields: Fields) -> Result<Self, ValidationError> {
        let mut output = Self::lazy(schema);
        output.merge(fields);
        output.validate()?;
        Ok(output)
    }

    /// Overrides the auto-derived name and description.
    pub fn named(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.name = name.into();
        self.description = description.into();
        self
    }

    /// Derives the name and description from the owning step's name.
    pub fn for_step(self, step_name: &StepName) -> Self {
        self.named(step_name.output_name(), step_name.output_description())
    }

    /// The output's name, `"<Step name>.Output"` when lifecycle-created.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The output's description, `"Output for <Step name>"` when
    /// lifecycle-created.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The declared result fields.
    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    /// Assigns a field, overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the value assigned to `key`, if set.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns `true` if `key` has been assigned.
    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Field-wise union: every key present in `other` is set on `self`,
    /// overwriting existing values; keys absent from `other` are untouched.
    ///
    /// The union is shallow. A conflicting key is overwritten at the field
    /// level, never merged recursively within the value.
    ///
    /// Accepts another `Output` (only its *set* fields take part), a
    /// [`Fields`] map, or an array of pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwell::{Fields, Output, OutputSchema};
    /// use serde_json::json;
    ///
    /// let mut output = Output::lazy(OutputSchema::new());
    /// output.set("x", 0);
    /// output.set("y", 2);
    ///
    /// output.merge(Fields::from([("x", json!(1))]));
    /// assert_eq!(output.get("x"), Some(&json!(1)));
    /// assert_eq!(output.get("y"), Some(&json!(2)));
    /// ```
    pub fn merge(&mut self, other: impl Into<Fields>) -> &mut Self {
        for (key, value) in other.into() {
            self.values.insert(key, value);
        }
        self
    }

    /// Runs the required-field and type checks against the schema.
    ///
    /// Keys outside the schema are tolerated; merging may introduce fields
    /// the schema never declared.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] enumerating every unset required field
    /// and every set field whose value has the wrong shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        for spec in self.schema.specs() {
            match self.values.get(spec.name()) {
                None if spec.is_required() => issues.push(Issue::Missing {
                    field: spec.name().to_string(),
                }),
                None => {}
                Some(value) if !spec.kind().matches(value) => issues.push(Issue::TypeMismatch {
                    field: spec.name().to_string(),
                    expected: spec.kind(),
                    found: kind_of(value),
                }),
                Some(_) => {}
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.name.clone(), issues))
        }
    }

    /// The raw assigned values.
    pub fn fields(&self) -> Fields {
        self.values.clone().into()
    }

    /// The assigned values with schema-sensitive fields masked.
    ///
    /// This is what the lifecycle dumps at the end of a run; use it for any
    /// human-facing rendering of the output.
    pub fn redacted(&self) -> Fields {
        self.values
            .iter()
            .map(|(key, value)| {
                let sensitive = self
                    .schema
                    .get(key)
                    .is_some_and(|spec| spec.is_sensitive());
                let value = if sensitive {
                    Value::String(REDACTED.to_string())
                } else {
                    value.clone()
                };
                (key.clone(), value)
            })
            .collect()
    }
}

impl From<&Output> for Fields {
    fn from(output: &Output) -> Self {
        output.fields()
    }
}

impl From<Output> for Fields {
    fn from(output: Output) -> Self {
        output.values.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;
    use serde_json::json;

    fn two_field_schema() -> OutputSchema {
        OutputSchema::new()
            .require("a", FieldKind::String)
            .require("b", FieldKind::String)
    }

    #[test]
    fn test_lazy_then_validate_reports_missing_fields() {
        let mut output = Output::lazy(two_field_schema());
        output.set("a", "set");

        let error = output.validate().unwrap_err();
        assert_eq!(
            error.issues(),
            &[Issue::Missing {
                field: "b".to_string()
            }]
        );

        output.set("b", "also set");
        assert!(output.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_type_mismatch() {
        let mut output = Output::lazy(two_field_schema());
        output.set("a", "ok");
        output.set("b", 1);

        let error = output.validate().unwrap_err();
        assert_eq!(
            error.issues(),
            &[Issue::TypeMismatch {
                field: "b".to_string(),
                expected: FieldKind::String,
                found: "number",
            }]
        );
    }

    #[test]
    fn test_strict_construction() {
        let output = Output::strict(
            two_field_schema(),
            Fields::from([("a", json!("x")), ("b", json!("y"))]),
        )
        .expect("both fields set");
        assert_eq!(output.get("a"), Some(&json!("x")));

        let error = Output::strict(two_field_schema(), Fields::from([("a", json!("x"))]));
        assert!(error.is_err());
    }

    #[test]
    fn test_merge_incoming_wins_and_preserves_rest() {
        let mut output = Output::lazy(OutputSchema::new());
        output.set("x", 0);
        output.set("y", 2);

        output.merge(Fields::from([("x", json!(1))]));
        assert_eq!(output.get("x"), Some(&json!(1)));
        assert_eq!(output.get("y"), Some(&json!(2)));
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut output = Output::lazy(OutputSchema::new());
        output.set("nested", json!({"keep": 1, "lose": 2}));

        output.merge(Fields::from([("nested", json!({"other": 3}))]));
        assert_eq!(output.get("nested"), Some(&json!({"other": 3})));
    }

    #[test]
    fn test_merge_output_only_takes_set_fields() {
        let mut incoming = Output::lazy(two_field_schema());
        incoming.set("a", "from incoming");

        let mut output = Output::lazy(two_field_schema());
        output.set("a", "original");
        output.set("b", "kept");

        output.merge(&incoming);
        assert_eq!(output.get("a"), Some(&json!("from incoming")));
        assert_eq!(output.get("b"), Some(&json!("kept")));
    }

    #[test]
    fn test_for_step_derives_names() {
        let output = Output::lazy(OutputSchema::new()).for_step(&StepName::new("MyStep"));
        assert_eq!(output.name(), "MyStep.Output");
        assert_eq!(output.description(), "Output for MyStep");
    }

    #[test]
    fn test_redacted_masks_sensitive_fields() {
        let schema = OutputSchema::new()
            .require("plain", FieldKind::String)
            .field(crate::FieldSpec::required("token", FieldKind::String).sensitive());

        let mut output = Output::lazy(schema);
        output.set("plain", "visible");
        output.set("token", "hunter2");

        let redacted = output.redacted();
        assert_eq!(redacted.get("plain"), Some(&json!("visible")));
        assert_eq!(redacted.get("token"), Some(&json!("**********")));
        assert_eq!(output.get("token"), Some(&json!("hunter2")));
    }
}
