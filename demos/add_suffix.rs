use stepwell::prelude::*;

define_step! {
    /// Appends a fixed suffix to its input.
    pub struct AddSuffix {
        pub a: String,
    }
}

impl Step for AddSuffix {
    fn output_slot(&mut self) -> &mut Option<Output> {
        &mut self.output
    }

    fn description(&self) -> String {
        Self::doc_description().unwrap_or(Self::NAME).to_string()
    }

    fn output_schema(&self) -> OutputSchema {
        OutputSchema::new().require("b", FieldKind::String)
    }

    fn inputs(&self) -> Fields {
        Fields::of(self)
    }

    fn body(&mut self, _inv: &mut Invocation) -> Result<StepReturn, StepError> {
        let b = format!("{}-some-suffix", self.a);
        self.output().set("b", b);
        Ok(StepReturn::Done)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut step = AddSuffix::new("foo".to_string());

    let output = step.execute()?;
    println!("{} -> {}", step.description(), output.fields());

    Ok(())
}
