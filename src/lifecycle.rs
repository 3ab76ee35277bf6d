//! The lifecycle wrapper: ordered cross-cutting behavior around every
//! externally triggered step execution.

use tracing::{debug, error, info, warn};

use crate::error::{StepError, Warning};
use crate::invocation::Invocation;
use crate::output::Output;
use crate::schema::kind_of;
use crate::step::{Step, StepName, StepReturn};

/// The only entry point for running a [`Step`].
///
/// `StepExt` is blanket-implemented for every step, so the lifecycle exists
/// exactly once per step type: there is no unwrapped `execute` to call by
/// mistake, no way to wrap a type twice, and no way for a downstream type
/// to override the hooks. Layered steps reuse inner behavior through
/// [`StepExt::delegate`], which re-enters the lifecycle non-outermost so
/// the hooks still fire exactly once per external call.
///
/// The ordered sequence for an outermost call:
///
/// 1. log a start event plus a debug dump of the step's inputs (redacted),
/// 2. invoke [`Step::body`],
/// 3. settle the returned value (merge a returned [`Output`], warn on and
///    ignore anything else),
/// 4. validate the output strictly,
/// 5. log a debug dump of the output (redacted) plus an end event,
/// 6. return the output.
///
/// Delegated calls run only steps 2 and 3.
///
/// A body error is logged once, with the step's inputs, and re-raised
/// unchanged; this layer never retries, suppresses or translates errors.
pub trait StepExt: Step {
    /// Runs the step through the full lifecycle.
    ///
    /// Creates a fresh [`Invocation`] root, so every call to `execute` is
    /// an outermost call. The returned output equals [`Step::output`]
    /// after the call; running the same instance again merges into the
    /// same output cumulatively.
    ///
    /// # Errors
    ///
    /// [`StepError::NotImplemented`] when the step never overrode `body`,
    /// [`StepError::Validation`] when the finished output fails its schema,
    /// or the body's own error, unchanged.
    fn execute(&mut self) -> Result<Output, StepError> {
        let mut inv = Invocation::root();
        self.execute_in(&mut inv)
    }

    /// Alias to [`StepExt::execute`].
    fn run(&mut self) -> Result<Output, StepError> {
        self.execute()
    }

    /// Runs the step within an existing invocation context.
    ///
    /// Callers who want the collected [`Invocation::warnings`] or the
    /// [`Invocation::lifecycle_count`] pass their own root context here;
    /// plain [`StepExt::execute`] discards the context after logging.
    ///
    /// Whether the hooks fire is decided per call from `inv`: outermost
    /// contexts get the full sequence, delegated contexts only the body
    /// and return settling.
    fn execute_in(&mut self, inv: &mut Invocation) -> Result<Output, StepError> {
        let name = self.name();
        let outermost = inv.is_outermost();

        if outermost {
            info!(step = %name, "start running step");
            debug!(step = %name, input = %self.inputs(), "step input");
        }

        let returned = match self.body(inv) {
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
    ///
    /// This is how a layered step reuses another layer's body: no start or
    /// end logging, no validation, no lifecycle count — only the inner
    /// body runs and its output comes back for the caller to merge.
    /// Delegation nests to any depth; the depth is restored even when the
    /// inner body fails.
    fn delegate(&mut self, inv: &mut Invocation) -> Result<Output, StepError> {
        inv.enter_delegated();
        let result = self.execute_in(inv);
        inv.exit_delegated();
        result
    }
}

impl<S: Step + ?Sized> StepExt for S {}

/// Folds a body's return value into the step's output.
///
/// A returned [`Output`] different from the current one is merged, returned
/// fields winning per key. A raw value is reported as a [`Warning`] and
/// ignored. Shared between the sync and async wrappers.
pub(crate) fn settle_return(
    name: &StepName,
    output: &mut Output,
    returned: StepReturn,
    inv: &mut Invocation,
) {
    match returned {
        StepReturn::Done => {}
        StepReturn::Output(incoming) => {
            if *output != incoming {
                output.merge(incoming);
            }
        }
        StepReturn::Raw(value) => {
            let warning = Warning::ReturnIgnored {
                step_name: name.clone(),
                expected: name.output_name(),
                found: kind_of(&value),
            };
            warn!(step = %name, "{warning}");
            inv.warn(warning);
        }
    }
}
