use ruuter_core::expressions::{parse_template, Segment, TemplateError};
use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::failure::Failure;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("no value at `{0}`")]
    Missing(String),
    #[error("invalid expression: {0}")]
    Syntax(#[from] TemplateError),
}

impl From<EvalError> for Failure {
    fn from(e: EvalError) -> Self {
        match e {
            EvalError::Missing(_) => Failure::missing_value(e.to_string()),
            EvalError::Syntax(_) => Failure::other(e.to_string()),
        }
    }
}

/// Resolves every `${...}` reference inside `value` against the context.
///
/// A string that is exactly one reference yields the referenced value as is; a string
/// with embedded references is interpolated.
pub fn eval_value(value: &JsonValue, ctx: &Context) -> Result<JsonValue, EvalError> {
    match value {
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) => Ok(value.clone()),
        JsonValue::String(s) => eval_string(s, ctx),
        JsonValue::Array(arr) => arr
            .iter()
            .map(|v| eval_value(v, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        JsonValue::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                out.insert(k.clone(), eval_value(v, ctx)?);
            }
            Ok(JsonValue::Object(out))
        }
    }
}

fn eval_string(s: &str, ctx: &Context) -> Result<JsonValue, EvalError> {
    let tpl = parse_template(s)?;
    if tpl.is_literal() {
        return Ok(JsonValue::String(s.to_string()));
    }
    if let Some(path) = tpl.as_single_expr() {
        return ctx
            .lookup(path)
            .cloned()
            .ok_or_else(|| EvalError::Missing(path.to_string()));
    }

    let mut out = String::new();
    for seg in &tpl.segments {
        match seg {
            Segment::Literal(l) => out.push_str(l),
            Segment::Expr(path) => {
                let v = ctx
                    .lookup(path)
                    .ok_or_else(|| EvalError::Missing(path.to_string()))?;
                match v {
                    JsonValue::String(s) => out.push_str(s),
                    JsonValue::Null => {}
                    other => out.push_str(&other.to_string()),
                }
            }
        }
    }
    Ok(JsonValue::String(out))
}

/// Condition truthiness used by `switch`.
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !(s.is_empty() || s.eq_ignore_ascii_case("false")),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}
