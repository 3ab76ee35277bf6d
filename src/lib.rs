//! # Stepwell
//!
//! A step execution-lifecycle library for Rust.
//!
//! A **step** is a typed, self-describing unit of work: declared inputs, a
//! declared schema-validated [`Output`], and a body. Stepwell wraps every
//! externally triggered execution with the same ordered cross-cutting
//! behavior — start/end logging, output capture and merging, strict
//! validation, error propagation — applied **exactly once** per call, no
//! matter how deeply steps delegate to the layers they are built on.
//!
//! ## Features
//!
//! - **One entry point**: [`StepExt::execute`] (alias [`StepExt::run`]) is
//!   blanket-implemented for every step; there is no unwrapped `execute`
//!   to call by mistake and no way to wrap a type twice
//! - **Lazy outputs**: a step's [`Output`] is created unset on first
//!   access and validated once, at the end of the outermost call
//! - **Explicit delegation**: [`StepExt::delegate`] re-enters the
//!   lifecycle non-outermost, so composed layers share one set of hooks
//! - **Structured logging**: `tracing` events around every run, with
//!   [`Secret`] inputs and schema-sensitive output fields redacted
//! - **Async variant**: [`AsyncStep`] mirrors the contract for bodies
//!   that suspend at await points
//!
//! ## Quick Start
//!
//! ```rust
//! use stepwell::prelude::*;
//!
//! define_step! {
//!     /// Appends a fixed suffix to its input.
//!     pub struct AddSuffix {
//!         a: String,
//!     }
//! }
//!
//! impl Step for AddSuffix {
//!     fn output_slot(&mut self) -> &mut Option<Output> {
//!         &mut self.output
//!     }
//!
//!     fn output_schema(&self) -> OutputSchema {
//!         OutputSchema::new().require("b", FieldKind::String)
//!     }
//!
//!     fn description(&self) -> String {
//!         Self::doc_description().unwrap_or(Self::NAME).to_string()
//!     }
//!
//!     fn inputs(&self) -> Fields {
//!         Fields::of(self)
//!     }
//!
//!     fn body(&mut self, _inv: &mut Invocation) -> Result<StepReturn, StepError> {
//!         let b = format!("{}-some-suffix", self.a);
//!         self.output().set("b", b);
//!         Ok(StepReturn::Done)
//!     }
//! }
//!
//! let mut step = AddSuffix::new("foo".to_string());
//! let output = step.execute().expect("step failed");
//! assert_eq!(output.get("b"), Some(&serde_json::json!("foo-some-suffix")));
//! assert_eq!(step.description(), "Appends a fixed suffix to its input.");
//! ```
//!
//! ## Delegation
//!
//! A step built on top of another step reuses the inner layer's body with
//! [`StepExt::delegate`]. The inner run skips the hooks; the outermost run
//! logs once, validates once:
//!
//! ```rust
//! use stepwell::prelude::*;
//! use serde::Serialize;
//!
//! define_step! {
//!     /// Produces the base greeting.
//!     pub struct Greet {
//!         name: String,
//!     }
//! }
//!
//! impl Step for Greet {
//!     fn output_slot(&mut self) -> &mut Option<Output> {
//!         &mut self.output
//!     }
//!
//!     fn output_schema(&self) -> OutputSchema {
//!         OutputSchema::new().require("greeting", FieldKind::String)
//!     }
//!
//!     fn inputs(&self) -> Fields {
//!         Fields::of(self)
//!     }
//!
//!     fn body(&mut self, _inv: &mut Invocation) -> Result<StepReturn, StepError> {
//!         let greeting = format!("hello, {}", self.name);
//!         self.output().set("greeting", greeting);
//!         Ok(StepReturn::Done)
//!     }
//! }
//!
//! /// Greets loudly by reusing `Greet` and shouting its result.
//! #[derive(Debug, Serialize)]
//! pub struct Shout {
//!     inner: Greet,
//!     #[serde(skip)]
//!     output: Option<Output>,
//! }
//!
//! impl Step for Shout {
//!     fn output_slot(&mut self) -> &mut Option<Output> {
//!         &mut self.output
//!     }
//!
//!     fn output_schema(&self) -> OutputSchema {
//!         OutputSchema::new()
//!             .require("greeting", FieldKind::String)
//!             .require("shouted", FieldKind::String)
//!     }
//!
//!     fn inputs(&self) -> Fields {
//!         Fields::of(self)
//!     }
//!
//!     fn body(&mut self, inv: &mut Invocation) -> Result<StepReturn, StepError> {
//!         let inherited = self.inner.delegate(inv)?;
//!         self.output().merge(&inherited);
//!         let shouted = inherited
//!             .get("greeting")
//!             .and_then(|v| v.as_str())
//!             .unwrap_or_default()
//!             .to_uppercase();
//!         self.output().set("shouted", shouted);
//!         Ok(StepReturn::Done)
//!     }
//! }
//!
//! let mut step = Shout {
//!     inner: Greet::new("world".to_string()),
//!     output: None,
//! };
//! let mut inv = Invocation::root();
//! let output = step.execute_in(&mut inv).expect("step failed");
//!
//! // one lifecycle for the whole chain
//! assert_eq!(inv.lifecycle_count(), 1);
//! assert_eq!(output.get("shouted"), Some(&serde_json::json!("HELLO, WORLD")));
//! ```
//!
//! ## Error Handling
//!
//! A body error is logged with the step's (redacted) inputs and re-raised
//! unchanged — never translated, retried or suppressed:
//!
//! ```rust
//! use stepwell::prelude::*;
//!
//! define_step! {
//!     /// Always fails.
//!     pub struct Flaky {}
//! }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("connection reset")]
//! struct ConnectionReset;
//!
//! impl Step for Flaky {
//!     fn output_slot(&mut self) -> &mut Option<Output> {
//!         &mut self.output
//!     }
//!
//!     fn output_schema(&self) -> OutputSchema {
//!         OutputSchema::new()
//!     }
//!
//!     fn inputs(&self) -> Fields {
//!         Fields::of(self)
//!     }
//!
//!     fn body(&mut self, _inv: &mut Invocation) -> Result<StepReturn, StepError> {
//!         Err(StepError::failed(ConnectionReset))
//!     }
//! }
//!
//! let error = Flaky::new().execute().unwrap_err();
//! assert_eq!(error.to_string(), "connection reset");
//! assert!(error.downcast_ref::<ConnectionReset>().is_some());
//! ```

mod async_step;
mod error;
mod fields;
mod invocation;
mod lifecycle;
mod output;
mod schema;
mod secret;
mod step;

pub mod prelude;

pub use async_step::{AsyncStep, AsyncStepExt};
pub use error::{Issue, StepError, ValidationError, Warning};
pub use fields::Fields;
pub use invocation::Invocation;
pub use lifecycle::StepExt;
pub use output::Output;
pub use schema::{FieldKind, FieldSpec, OutputSchema};
pub use secret::{Secret, REDACTED};
pub use step::{from_template, Step, StepName, StepReturn};

/// Macro to define a step's input struct with minimal boilerplate.
///
/// The macro creates a struct holding the given input fields plus the
/// output slot every step needs, along with:
/// - `const NAME: &'static str` — compile-time step name
/// - `fn doc_description() -> Option<&'static str>` — the first line of
///   the doc comment, for use as the step description
/// - `fn new(...)` — constructor taking the inputs in declaration order
/// - `Debug`, `Clone`, `Serialize` and `Deserialize` derives, with the
///   output slot excluded from (de)serialization
///
/// The [`Step`] implementation stays yours to write; the struct only
/// removes the recurring field plumbing. Requires `serde` (with the
/// `derive` feature) in the calling crate.
///
/// # Example
///
/// ```rust
/// use stepwell::define_step;
///
/// define_step! {
///     /// Appends a fixed suffix to its input.
///     pub struct AddSuffix {
///         a: String,
///     }
/// }
///
/// assert_eq!(AddSuffix::NAME, "AddSuffix");
/// assert_eq!(
///     AddSuffix::doc_description(),
///     Some("Appends a fixed suffix to its input."),
/// );
/// ```
#[macro_export]
macro_rules! define_step {
    (
        $(#[doc = $doc:literal])*
        $vis:vis struct $name:ident {
            $( $fvis:vis $field:ident : $fty:ty ),* $(,)?
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
        $vis struct $name {
            $( $fvis $field: $fty, )*
            #[serde(skip)]
            output: ::core::option::Option<$crate::Output>,
        }

        impl $name {
            /// Step name as a compile-time constant.
            #[allow(dead_code)]
            $vis const NAME: &'static str = stringify!($name);

            /// First line of the doc comment, trimmed.
            #[allow(dead_code)]
            $vis fn doc_description() -> ::core::option::Option<&'static str> {
                let lines: &[&'static str] = &[$($doc),*];
                lines.first().map(|line| line.trim())
            }

            /// Creates the step from its inputs; the output starts unset.
            #[allow(dead_code)]
            $vis fn new($($field: $fty),*) -> Self {
                Self {
                    $( $field, )*
                    output: ::core::option::Option::None,
                }
            }
        }
    };
}
