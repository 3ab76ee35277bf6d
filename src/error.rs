use crate::schema::FieldKind;
use crate::step::StepName;
use thiserror::Error;

/// A single problem found while validating an output or templated input.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    /// A required field was never set.
    Missing {
        /// Name of the unset field
        field: String,
    },
    /// A field was set to a value of the wrong shape.
    TypeMismatch {
        /// Name of the offending field
        field: String,
        /// The declared shape
        expected: FieldKind,
        /// The shape actually found
        found: &'static str,
    },
    /// The value as a whole could not be interpreted.
    Invalid {
        /// Human-readable detail
        detail: String,
    },
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issue::Missing { field } => write!(f, "missing required field `{field}`"),
            Issue::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "field `{field}` expected {expected}, found {found}"),
            Issue::Invalid { detail } => write!(f, "{detail}"),
        }
    }
}

/// Failure of the required-field and type checks.
///
/// Carries every offending field, not just the first one found.
///
/// # Examples
///
/// ```
/// use stepwell::{FieldKind, Output, OutputSchema};
///
/// let schema = OutputSchema::new()
///     .require("a", FieldKind::String)
///     .require("b", FieldKind::String);
///
/// let output = Output::lazy(schema);
/// let error = output.validate().unwrap_err();
/// assert_eq!(error.issues().len(), 2);
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[error("validation failed for {subject}: {}", issues_summary(.issues))]
pub struct ValidationError {
    subject: String,
    issues: Vec<Issue>,
}

fn issues_summary(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(Issue::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Creates an error for `subject` with the given issues.
    pub fn new(subject: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            subject: subject.into(),
            issues,
        }
    }

    /// Creates a single-issue error from a free-form detail message.
    pub fn invalid(subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(
            subject,
            vec![Issue::Invalid {
                detail: detail.into(),
            }],
        )
    }

    /// What was being validated (an output name or a template target).
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The problems found, in field declaration order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

/// Errors that can cross the step lifecycle boundary.
///
/// # Non-Exhaustive
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code. When matching
/// on this error, always include a wildcard pattern.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StepError {
    /// `body` was invoked on a step type that never overrode it.
    ///
    /// Construction of such a step always succeeds; the failure only
    /// surfaces at call time so incomplete steps stay introspectable.
    #[error("step has no body: {step_name}")]
    NotImplemented {
        /// The name of the step missing a body
        step_name: StepName,
    },

    /// An output or templated input failed its checks.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A step body failed.
    ///
    /// The original error is carried unchanged; callers can recover it
    /// with [`StepError::downcast_ref`] and its message via `Display`.
    #[error(transparent)]
    Failed(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl StepError {
    /// Wraps a body error for propagation.
    ///
    /// The lifecycle never translates this further; the value given here
    /// is exactly what the caller can downcast back out.
    pub fn failed(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        StepError::Failed(Box::new(error))
    }

    /// Attempts to view a propagated body error as its concrete type.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            StepError::Failed(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Non-fatal conditions noticed by the lifecycle wrapper.
///
/// Warnings are logged at `warn` level and collected on the
/// [`Invocation`](crate::Invocation); execution continues.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Warning {
    /// `body` returned a value that is not an [`Output`](crate::Output);
    /// the value was ignored for merge purposes.
    ReturnIgnored {
        /// The step whose body returned the value
        step_name: StepName,
        /// Name of the output the step declares
        expected: String,
        /// Shape of the value actually returned
        found: &'static str,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::ReturnIgnored {
                step_name,
                expected,
                found,
            } => write!(
                f,
                "body of {step_name} did not produce output of type {expected} \
                 (found {found}), returns of the wrong type are ignored"
            ),
        }
    }
}
