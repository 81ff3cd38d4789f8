use std::sync::Arc;

use async_trait::async_trait;
use ruuter_core::types::{Mapping, StepDef};

use crate::context::Context;
use crate::eval::eval_value;
use crate::failure::Failure;
use crate::step::{ControlSignal, Step};

/// `assign: {var: <value>, ...}`. Writes each evaluated entry into the context.
#[derive(Debug, Clone)]
pub struct AssignStep {
    entries: Mapping,
}

impl AssignStep {
    pub fn new(entries: Mapping) -> Self {
        Self { entries }
    }

    pub fn from_def(def: &StepDef) -> Result<Arc<dyn Step>, String> {
        match def.param("assign") {
            Some(serde_json::Value::Object(entries)) => Ok(Arc::new(Self::new(entries.clone()))),
            _ => Err("`assign` must be a mapping of variable names to values".to_string()),
        }
    }
}

#[async_trait]
impl Step for AssignStep {
    async fn execute(&self, mut ctx: Context) -> Result<ControlSignal, Failure> {
        for (name, template) in &self.entries {
            let value = eval_value(template, &ctx)?;
            ctx.set(name.clone(), value);
        }
        Ok(ControlSignal::Continue(ctx))
    }
}
