use std::sync::Arc;

use async_trait::async_trait;
use ruuter_core::types::StepDef;
use serde_json::Value;

use crate::context::Context;
use crate::eval::eval_value;
use crate::failure::Failure;
use crate::step::{ControlSignal, Step};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("script compilation failed: {0}")]
    Compile(String),
    #[error("script execution failed: {0}")]
    Runtime(String),
    #[error("script engine unavailable: {0}")]
    Unavailable(String),
}

impl From<ScriptError> for Failure {
    fn from(e: ScriptError) -> Self {
        Failure::script(e.to_string())
    }
}

/// Embedding point for a scripting runtime. No evaluator ships with the engine.
#[async_trait]
pub trait ScriptEvaluator: Send + Sync {
    async fn evaluate(&self, source: &str, input: &Value) -> Result<Value, ScriptError>;
}

/// `script: {source, input?}` with optional `result`.
pub struct ScriptStep {
    source: String,
    input: Value,
    result: Option<String>,
    evaluator: Arc<dyn ScriptEvaluator>,
}

impl ScriptStep {
    pub fn from_def(
        def: &StepDef,
        evaluator: Arc<dyn ScriptEvaluator>,
    ) -> Result<Arc<dyn Step>, String> {
        let body = def
            .param("script")
            .ok_or_else(|| "missing `script` block".to_string())?;
        let source = body
            .get("source")
            .and_then(Value::as_str)
            .ok_or_else(|| "`script.source` must be a string".to_string())?;
        let result = def.param("result").and_then(Value::as_str).map(str::to_string);

        Ok(Arc::new(Self {
            source: source.to_string(),
            input: body.get("input").cloned().unwrap_or(Value::Null),
            result,
            evaluator,
        }))
    }
}

#[async_trait]
impl Step for ScriptStep {
    async fn execute(&self, mut ctx: Context) -> Result<ControlSignal, Failure> {
        let input = eval_value(&self.input, &ctx)?;
        let output = self.evaluator.evaluate(&self.source, &input).await?;
        if let Some(var) = &self.result {
            ctx.set(var.clone(), output);
        }
        Ok(ControlSignal::Continue(ctx))
    }
}
