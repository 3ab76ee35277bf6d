use serde_json::json;
use stepwell::prelude::*;

define_step! {
    /// Fetches the raw user record.
    pub struct FetchUser {
        pub user_id: u32,
        pub api_token: Secret<String>,
    }
}

impl Step for FetchUser {
    fn output_slot(&mut self) -> &mut Option<Output> {
        &mut self.output
    }

    fn output_schema(&self) -> OutputSchema {
        OutputSchema::new().require("user", FieldKind::Object)
    }

    fn inputs(&self) -> Fields {
        Fields::of(self)
    }

    fn body(&mut self, _inv: &mut Invocation) -> Result<StepReturn, StepError> {
        // a real step would call an API with the token here
        let user = json!({"id": self.user_id, "name": "ada"});
        self.output().set("user", user);
        Ok(StepReturn::Done)
    }
}

define_step! {
    /// Fetches a user and enriches the record with a display name.
    pub struct FetchEnrichedUser {
        pub user_id: u32,
        pub api_token: Secret<String>,
    }
}

impl Step for FetchEnrichedUser {
    fn output_slot(&mut self) -> &mut Option<Output> {
        &mut self.output
    }

    fn output_schema(&self) -> OutputSchema {
        OutputSchema::new()
            .require("user", FieldKind::Object)
            .require("display_name", FieldKind::String)
    }

    fn inputs(&self) -> Fields {
        Fields::of(self)
    }

    fn body(&mut self, inv: &mut Invocation) -> Result<StepReturn, StepError> {
        let mut base = FetchUser::new(self.user_id, self.api_token.clone());
        let inherited = base.delegate(inv)?;
        self.output().merge(&inherited);

        let display_name = inherited
            .get("user")
            .and_then(|user| user.get("name"))
            .and_then(|name| name.as_str())
            .unwrap_or("unknown")
            .to_uppercase();
        self.output().set("display_name", display_name);
        Ok(StepReturn::Done)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut step = FetchEnrichedUser::new(7, Secret::from("api-token"));
    let mut inv = Invocation::root();

    let output = step.execute_in(&mut inv)?;

    // the delegated FetchUser run shares this one lifecycle
    println!("lifecycles: {}", inv.lifecycle_count());
    println!("output: {}", output.fields());

    Ok(())
}
