//! The cooperatively scheduled variant of the step contract.
//!
//! `AsyncStep` mirrors [`Step`](crate::Step) for bodies that suspend at
//! await points while waiting on externally driven I/O. The lifecycle
//! wrapper stays a thin pass-through around that suspension: the hooks run
//! in the same relative order once the body completes, and cancellation of
//! an in-flight body belongs to the task abstraction, not to this layer.

use async_trait::async_trait;

use crate::error::StepError;
use crate::fields::Fields;
use crate::invocation::Invocation;
use crate::lifecycle::settle_return;
use crate::output::Output;
use crate::schema::OutputSchema;
use crate::step::{StepName, StepReturn};

use tracing::{debug, error, info};

/// A unit of work whose body is asynchronous.
///
/// The contract is the same as [`Step`](crate::Step): declared inputs, one
/// owned output, a default body that fails with
/// [`StepError::NotImplemented`]. Run it through
/// [`AsyncStepExt::execute`]; delegate to inner layers through
/// [`AsyncStepExt::delegate`].
///
/// # Examples
///
/// ```
/// use stepwell::prelude::*;
/// use async_trait::async_trait;
/// use serde::Serialize;
///
/// #[derive(Debug, Serialize)]
/// struct FetchGreeting {
///     name: String,
///     #[serde(skip)]
///     output: Option<Output>,
/// }
///
/// #[async_trait]
/// impl AsyncStep for FetchGreeting {
///     fn output_slot(&mut self) -> &mut Option<Output> {
///         &mut self.output
///     }
///
///     fn output_schema(&self) -> OutputSchema {
///         OutputSchema::new().require("greeting", FieldKind::String)
///     }
///
///     fn inputs(&self) -> Fields {
///         Fields::of(self)
///     }
///
///     async fn body(&mut self, _inv: &mut Invocation) -> Result<StepReturn, StepError> {
///         // awaiting external I/O would happen here
///         let greeting = format!("hello, {}", self.name);
///         self.output().set("greeting", greeting);
///         Ok(StepReturn::Done)
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut step = FetchGreeting { name: "world".into(), output: None };
/// let output = step.execute().await.unwrap();
/// assert_eq!(output.get("greeting"), Some(&serde_json::json!("hello, world")));
/// # }
/// ```
#[async_trait]
pub trait AsyncStep: Send {
    /// The slot holding the step's one owned output.
    fn output_slot(&mut self) -> &mut Option<Output>;

    /// The step name. Defaults to the type name.
    fn name(&self) -> StepName {
        StepName::from_type_name::<Self>()
    }

    /// A one-line description of the step. Defaults to the name.
    fn description(&self) -> String {
        self.name().as_str().to_string()
    }

    /// The declared result fields of this step.
    fn output_schema(&self) -> OutputSchema;

    /// Diagnostic dump of the step's input fields (redaction honored).
    fn inputs(&self) -> Fields;

    /// The step's asynchronous behavior.
    ///
    /// # Errors
    ///
    /// The default implementation fails with [`StepError::NotImplemented`].
    async fn body(&mut self, inv: &mut Invocation) -> Result<StepReturn, StepError> {
        let _ = inv;
        Err(StepError::NotImplemented {
            step_name: self.name(),
        })
    }

    /// The step's output, created lazily on first access.
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

/// The lifecycle wrapper for [`AsyncStep`], blanket-implemented like
/// [`StepExt`](crate::StepExt).
///
/// Hook ordering is identical to the synchronous wrapper; the body may
/// suspend between them.
#[async_trait]
pub trait AsyncStepExt: AsyncStep {
    /// Runs the step through the full lifecycle.
    ///
    /// # Errors
    ///
    /// Same contract as [`StepExt::execute`](crate::StepExt::execute).
    async fn execute(&mut self) -> Result<Output, StepError> {
        let mut inv = Invocation::root();
        self.execute_in(&mut inv).await
    }

    /// Alias to [`AsyncStepExt::execute`].
    async fn run(&mut self) -> Result<Output, StepError> {
        self.execute().await
    }

    /// Runs the step within an existing invocation context.
    async fn execute_in(&mut self, inv: &mut Invocation) -> Result<Output, StepError> {
        let name = self.name();
        let outermost = inv.is_outermost();

        if outermost {
            info!(step = %name, "start running step");
            debug!(step = %name, input = %self.inputs(), "step input");
        }

        let returned = match self.body(inv).await {
            Ok(returned) => returned,
            Err(err) => {
                if outermost {
                    error!(step = %name, input = %self.inputs(), "error while running step");
                }
                return Err(err);
            }
        };

        settle_return(&name, self.output(), returned, inv);

        if outermost {
            self.output().validate()?;
            debug!(step = %name, output = %self.output().redacted(), "step output");
            info!(step = %name, "finished running step");
            inv.note_lifecycle();
        }

        Ok(self.output().clone())
    }

    /// Re-enters the lifecycle as a delegated, non-outermost call.
    async fn delegate(&mut self, inv: &mut Invocation) -> Result<Output, StepError> {
        inv.enter_delegated();
        let result = self.execute_in(inv).await;
        inv.exit_delegated();
        result
    }
}

impl<S: AsyncStep + ?Sized> AsyncStepExt for S {}
