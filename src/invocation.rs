//! Explicit invocation context for one top-level call graph.

use crate::error::Warning;

/// Per-call marker distinguishing the outermost invocation from delegated
/// re-entries.
///
/// An `Invocation` is threaded through every call in one top-level call
/// graph. Depth 0 is the outermost, externally triggered call; each
/// [`StepExt::delegate`](crate::StepExt::delegate) re-entry runs one level
/// deeper and skips the lifecycle hooks. The context never persists across
/// separate `execute()` calls — plain [`StepExt::execute`](crate::StepExt::execute)
/// creates a fresh root every time.
///
/// The context also collects what the lifecycle wants to surface to the
/// caller without failing the run: [`Warning`]s, and a count of completed
/// hook sequences that tests use to assert the exactly-once invariant.
///
/// # Examples
///
/// ```
/// use stepwell::Invocation;
///
/// let inv = Invocation::root();
/// assert!(inv.is_outermost());
/// assert_eq!(inv.depth(), 0);
/// assert_eq!(inv.lifecycle_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct Invocation {
    depth: u32,
    lifecycles: u32,
    warnings: Vec<Warning>,
}

impl Invocation {
    /// Creates the context for a fresh, externally triggered call.
    pub fn root() -> Self {
        Self::default()
    }

    /// `true` when the current call is the externally triggered one.
    ///
    /// Re-evaluated on every call through the lifecycle; a three-level
    /// delegation chain sees `false` at depths 1 and 2.
    pub fn is_outermost(&self) -> bool {
        self.depth == 0
    }

    /// Current delegation depth; 0 at the outermost call.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// How many outermost hook sequences have completed start-to-end.
    ///
    /// Exactly 1 after any single external call, regardless of how deep
    /// the delegation chain underneath went.
    pub fn lifecycle_count(&self) -> u32 {
        self.lifecycles
    }

    /// Warnings collected during the call graph, in emission order.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub(crate) fn enter_delegated(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn exit_delegated(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn note_lifecycle(&mut self) {
        self.lifecycles += 1;
    }

    pub(crate) fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}
