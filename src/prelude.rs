//! Commonly used types and traits

pub use crate::define_step;
pub use crate::error::{StepError, ValidationError, Warning};
pub use crate::fields::Fields;
pub use crate::invocation::Invocation;
pub use crate::lifecycle::StepExt;
pub use crate::output::Output;
pub use crate::schema::{FieldKind, FieldSpec, OutputSchema};
pub use crate::secret::Secret;
pub use crate::step::{from_template, Step, StepName, StepReturn};
pub use crate::{AsyncStep, AsyncStepExt};
