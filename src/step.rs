//! The step contract: typed inputs, one owned output, a user-supplied body.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{StepError, ValidationError};
use crate::fields::Fields;
use crate::invocation::Invocation;
use crate::output::Output;
use crate::schema::OutputSchema;

/// Type-safe step name wrapper.
///
/// # Examples
///
/// ```
/// use stepwell::StepName;
///
/// let name = StepName::new("AddSuffix");
/// assert_eq!(name.as_str(), "AddSuffix");
/// assert_eq!(name.output_name(), "AddSuffix.Output");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StepName(String);

impl StepName {
    /// Creates a new StepName.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a StepName from a type's name (last path segment).
    pub fn from_type_name<T: ?Sized>() -> Self {
        let full_name = std::any::type_name::<T>();
        let short_name = full_name.split("::").last().unwrap_or("UnknownStep");
        Self::new(short_name)
    }

    /// Returns the step name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The derived name of this step's output.
    pub fn output_name(&self) -> String {
        format!("{}.Output", self.0)
    }

    /// The derived description of this step's output.
    pub fn output_description(&self) -> String {
        format!("Output for {}", self.0)
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StepName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StepName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for StepName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StepName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StepName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// What a step body hands back to the lifecycle wrapper.
///
/// Most bodies write into [`Step::output`] directly and return
/// [`StepReturn::Done`]. A body may instead return a whole [`Output`],
/// which the wrapper merges into the step's own output (returned fields
/// win on conflicts). Anything else is expressed as [`StepReturn::Raw`]
/// and ignored for merge purposes with a warning.
#[derive(Debug, Clone, PartialEq)]
pub enum StepReturn {
    /// The body wrote its results through the output accessor.
    Done,
    /// A complete output to merge into the step's own.
    Output(Output),
    /// A value that is not an output; logged as a warning and ignored.
    Raw(Value),
}

impl From<Output> for StepReturn {
    fn from(output: Output) -> Self {
        StepReturn::Output(output)
    }
}

impl From<()> for StepReturn {
    fn from(_: ()) -> Self {
        StepReturn::Done
    }
}

/// A unit of work with declared inputs and one owned [`Output`].
///
/// Implementors provide the state accessor [`Step::output_slot`], the
/// declared [`Step::output_schema`], a diagnostic [`Step::inputs`] dump,
/// and the behavior in [`Step::body`]. Everything cross-cutting — start and
/// end logging, output capture, merging, validation, error propagation —
/// is applied by [`StepExt`](crate::StepExt), which is implemented for
/// every step exactly once and cannot be overridden. Callers run a step
/// through [`StepExt::execute`](crate::StepExt::execute) (or its alias
/// `run`), never by calling `body` directly.
///
/// A step instance is not meant for concurrent reuse: executing the same
/// instance again merges into the same output cumulatively. Construct a
/// fresh instance per isolated run.
///
/// # Examples
///
/// ```
/// use stepwell::prelude::*;
/// use serde::{Deserialize, Serialize};
///
/// /// Appends a fixed suffix to its input.
/// #[derive(Debug, Serialize, Deserialize)]
/// struct AddSuffix {
///     a: String,
///     #[serde(skip)]
///     output: Option<Output>,
/// }
///
/// impl Step for AddSuffix {
///     fn output_slot(&mut self) -> &mut Option<Output> {
///         &mut self.output
///     }
///
///     fn output_schema(&self) -> OutputSchema {
///         OutputSchema::new().require("b", FieldKind::String)
///     }
///
///     fn inputs(&self) -> Fields {
///         Fields::of(self)
///     }
///
///     fn body(&mut self, _inv: &mut Invocation) -> Result<StepReturn, StepError> {
///         let b = format!("{}-some-suffix", self.a);
///         self.output().set("b", b);
///         Ok(StepReturn::Done)
///     }
/// }
///
/// let mut step = AddSuffix { a: "foo".into(), output: None };
/// let output = step.execute().unwrap();
/// assert_eq!(output.get("b"), Some(&serde_json::json!("foo-some-suffix")));
/// ```
pub trait Step {
    /// The slot holding the step's one owned output.
    ///
    /// Implementors return a reference to an `Option<Output>` field; the
    /// default accessors handle lazy creation and replacement.
    fn output_slot(&mut self) -> &mut Option<Output>;

    /// The step name.
    ///
    /// By default, uses the type name. Override to provide a custom name.
    /// Never empty.
    fn name(&self) -> StepName {
        StepName::from_type_name::<Self>()
    }

    /// A one-line description of the step. Defaults to the name; steps
    /// defined with [`define_step!`](crate::define_step) derive it from
    /// their doc comment. Never empty.
    fn description(&self) -> String {
        self.name().as_str().to_string()
    }

    /// The declared result fields of this step.
    fn output_schema(&self) -> OutputSchema;

    /// Diagnostic dump of the step's input fields.
    ///
    /// Rendered in the start and error log entries. Use
    /// [`Fields::of(self)`](Fields::of) on a `Serialize` step; inputs
    /// wrapped in [`Secret`](crate::Secret) come out redacted.
    fn inputs(&self) -> Fields;

    /// The step's behavior.
    ///
    /// Read the input fields, write results through [`Step::output`].
    /// A step layered over another step may reuse that layer with
    /// [`StepExt::delegate`](crate::StepExt::delegate), passing `inv`
    /// along so the inner run skips the lifecycle hooks.
    ///
    /// # Errors
    ///
    /// The default implementation fails with [`StepError::NotImplemented`];
    /// a step type compiles and constructs without a body, but cannot run.
    fn body(&mut self, inv: &mut Invocation) -> Result<StepReturn, StepError> {
        let _ = inv;
        Err(StepError::NotImplemented {
            step_name: self.name(),
        })
    }

    /// The step's output, created lazily on first access.
    ///
    /// The first read instantiates the output with every field unset and
    /// the name/description derived from the step name. Repeated reads
    /// return the same instance; the accessor never resets state.
    fn output(&mut self) -> &mut Output {
        let name = self.name();
        let schema = self.output_schema();
        self.output_slot()
            .get_or_insert_with(|| Output::lazy(schema).for_step(&name))
    }

    /// Replaces the step's output wholesale.
    fn set_output(&mut self, output: Output) {
        *self.output_slot() = Some(output);
    }
}

/// Builds a step by copying another object's field values, with overrides.
///
/// The template's serializable fields are copied, then `overrides` win per
/// key, and the result is deserialized into `T`. The template's output is
/// never copied (step output slots are `#[serde(skip)]`), so the new step
/// starts with an unset output.
///
/// Fields wrapped in [`Secret`](crate::Secret) serialize redacted; supply
/// their real values through `overrides` when templating across steps that
/// carry secrets.
///
/// # Errors
///
/// Returns [`StepError::Validation`] when the copied fields plus overrides
/// do not form a valid `T` (missing fields, wrong types).
///
/// # Examples
///
/// ```
/// use stepwell::{from_template, Fields};
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Serialize, Deserialize)]
/// struct Greet { greeting: String, name: String }
///
/// let template = Greet { greeting: "hello".into(), name: "world".into() };
/// let copy: Greet = from_template(&template, Fields::from([("name", json!("stepwell"))])).unwrap();
/// assert_eq!(copy.greeting, "hello");
/// assert_eq!(copy.name, "stepwell");
/// ```
pub fn from_template<T, S>(template: &S, overrides: Fields) -> Result<T, StepError>
where
    S: Serialize,
    T: DeserializeOwned,
{
    let mut fields = Fields::of(template);
    fields.extend(overrides);

    let object = fields.into_iter().collect::<serde_json::Map<_, _>>();
    serde_json::from_value(Value::Object(object)).map_err(|err| {
        StepError::Validation(ValidationError::invalid(
            std::any::type_name::<T>(),
            err.to_string(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::StepExt;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Probe {
        a: String,
        n: u32,
        #[serde(skip)]
        output: Option<Output>,
    }

    impl Step for Probe {
        fn output_slot(&mut self) -> &mut Option<Output> {
            &mut self.output
        }

        fn output_schema(&self) -> OutputSchema {
            OutputSchema::new()
        }

        fn inputs(&self) -> Fields {
            Fields::of(self)
        }
    }

    #[test]
    fn test_name_defaults_to_type_name() {
        let step = Probe {
            a: "x".to_string(),
            n: 0,
            output: None,
        };
        assert_eq!(step.name(), "Probe");
        assert_eq!(step.description(), "Probe");
    }

    #[test]
    fn test_output_accessor_is_idempotent() {
        let mut step = Probe {
            a: "x".to_string(),
            n: 0,
            output: None,
        };

        assert_eq!(step.output().name(), "Probe.Output");
        assert_eq!(step.output().description(), "Output for Probe");

        step.output().set("marker", 1);
        assert_eq!(step.output().get("marker"), Some(&json!(1)));
    }

    #[test]
    fn test_set_output_replaces_wholesale() {
        let mut step = Probe {
            a: "x".to_string(),
            n: 0,
            output: None,
        };
        step.output().set("old", 1);

        let mut replacement = Output::lazy(OutputSchema::new());
        replacement.set("new", 2);
        step.set_output(replacement);

        assert!(!step.output().is_set("old"));
        assert_eq!(step.output().get("new"), Some(&json!(2)));
    }

    #[test]
    fn test_default_body_is_not_implemented() {
        let mut step = Probe {
            a: "x".to_string(),
            n: 0,
            output: None,
        };
        let error = step.execute().unwrap_err();
        match error {
            StepError::NotImplemented { step_name } => assert_eq!(step_name, "Probe"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_template_copies_fields_with_overrides() {
        let mut template = Probe {
            a: "foo".to_string(),
            n: 7,
            output: None,
        };
        template.output().set("leftover", 1);

        let copy: Probe = from_template(&template, Fields::from([("a", json!("bar"))]))
            .expect("compatible fields");
        assert_eq!(copy.a, "bar");
        assert_eq!(copy.n, 7);
        assert!(copy.output.is_none());
    }

    #[test]
    fn test_from_template_rejects_incompatible_values() {
        let template = Probe {
            a: "foo".to_string(),
            n: 7,
            output: None,
        };

        let result: Result<Probe, _> =
            from_template(&template, Fields::from([("n", json!("not a number"))]));
        assert!(matches!(result, Err(StepError::Validation(_))));
    }

    #[test]
    fn test_step_return_conversions() {
        assert_eq!(StepReturn::from(()), StepReturn::Done);

        let output = Output::lazy(OutputSchema::new());
        assert_eq!(
            StepReturn::from(output.clone()),
            StepReturn::Output(output)
        );
    }
}
