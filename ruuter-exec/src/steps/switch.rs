use std::sync::Arc;

use async_trait::async_trait;
use ruuter_core::types::StepDef;
use serde_json::Value;

use crate::context::Context;
use crate::eval::{eval_value, is_truthy};
use crate::failure::Failure;
use crate::step::{ControlSignal, Step};

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub condition: Value,
    pub next: String,
}

/// Branches to the `next` of the first case whose condition is truthy.
/// Falls through to the following step when no case matches.
#[derive(Debug, Clone)]
pub struct SwitchStep {
    cases: Vec<SwitchCase>,
}

impl SwitchStep {
    pub fn new(cases: Vec<SwitchCase>) -> Self {
        Self { cases }
    }

    pub fn from_def(def: &StepDef) -> Result<Arc<dyn Step>, String> {
        let Some(Value::Array(raw)) = def.param("switch") else {
            return Err("`switch` must be a list of cases".to_string());
        };
        let mut cases = Vec::with_capacity(raw.len());
        for (i, case) in raw.iter().enumerate() {
            let condition = case
                .get("condition")
                .cloned()
                .ok_or_else(|| format!("case {i} has no `condition`"))?;
            let next = case
                .get("next")
                .and_then(Value::as_str)
                .ok_or_else(|| format!("case {i} has no `next`"))?;
            cases.push(SwitchCase {
                condition,
                next: next.to_string(),
            });
        }
        Ok(Arc::new(Self::new(cases)))
    }
}

#[async_trait]
impl Step for SwitchStep {
    async fn execute(&self, ctx: Context) -> Result<ControlSignal, Failure> {
        for case in &self.cases {
            if is_truthy(&eval_value(&case.condition, &ctx)?) {
                return Ok(ControlSignal::branch(case.next.clone(), ctx));
            }
        }
        Ok(ControlSignal::Continue(ctx))
    }
}
