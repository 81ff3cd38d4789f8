//! Built-in step kinds.

mod assign;
mod http;
mod returns;
mod script;
mod switch;

use std::sync::Arc;

use ruuter_core::types::{HttpMethod, StepDef};

use crate::http::HttpClient;
use crate::registry::StepRegistry;

pub use assign::AssignStep;
pub use http::{HttpStep, HttpStepConfig};
pub use returns::ReturnStep;
pub use script::{ScriptError, ScriptEvaluator, ScriptStep};
pub use switch::{SwitchCase, SwitchStep};

/// Methods exposed as `http.<method>` step kinds.
pub const HTTP_STEP_METHODS: [HttpMethod; 5] = [
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Delete,
    HttpMethod::Patch,
];

/// Registers `assign`, `return`, `switch` and the `http.*` kinds.
pub fn register_builtins(
    registry: &mut StepRegistry,
    client: Arc<dyn HttpClient>,
    config: HttpStepConfig,
) {
    registry.register("assign", AssignStep::from_def);
    registry.register("return", ReturnStep::from_def);
    registry.register("switch", SwitchStep::from_def);

    for method in HTTP_STEP_METHODS {
        let client = Arc::clone(&client);
        let config = config.clone();
        registry.register(
            format!("http.{}", method.as_str().to_ascii_lowercase()),
            move |def: &StepDef| {
                HttpStep::from_def(def, method, Arc::clone(&client), config.clone())
            },
        );
    }
}

/// Registers the `script` kind backed by `evaluator`.
pub fn register_script(registry: &mut StepRegistry, evaluator: Arc<dyn ScriptEvaluator>) {
    registry.register("script", move |def: &StepDef| {
        ScriptStep::from_def(def, Arc::clone(&evaluator))
    });
}
