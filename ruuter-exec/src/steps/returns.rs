use std::sync::Arc;

use async_trait::async_trait;
use ruuter_core::types::StepDef;
use serde_json::Value;

use crate::context::Context;
use crate::eval::eval_value;
use crate::failure::Failure;
use crate::step::{ControlSignal, Step};

/// `return: <value>`. Ends the run with the evaluated value as the response body.
#[derive(Debug, Clone)]
pub struct ReturnStep {
    value: Value,
}

impl ReturnStep {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn from_def(def: &StepDef) -> Result<Arc<dyn Step>, String> {
        let value = def
            .param("return")
            .cloned()
            .ok_or_else(|| "missing `return` value".to_string())?;
        Ok(Arc::new(Self::new(value)))
    }
}

#[async_trait]
impl Step for ReturnStep {
    async fn execute(&self, ctx: Context) -> Result<ControlSignal, Failure> {
        Ok(ControlSignal::Terminate(eval_value(&self.value, &ctx)?))
    }
}
