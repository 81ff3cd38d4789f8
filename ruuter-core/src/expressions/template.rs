use super::path::{parse_path, ContextPath, PathError};
use crate::types::AnyValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Expr(ContextPath),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    /// Returns the path when the whole template is one `${...}` reference.
    pub fn as_single_expr(&self) -> Option<&ContextPath> {
        match self.segments.as_slice() {
            [Segment::Expr(p)] => Some(p),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Literal(_)))
    }
}

pub fn parse_template(input: &str) -> Result<Template, TemplateError> {
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        buf.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        // No nesting support: the first `}` closes the expression.
        let Some(end) = after.find('}') else {
            return Err(TemplateError::UnclosedExpression);
        };
        let path = parse_path(&after[..end]).map_err(TemplateError::InvalidPath)?;
        if !buf.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut buf)));
        }
        segments.push(Segment::Expr(path));
        rest = &after[end + 1..];
    }
    buf.push_str(rest);

    if !buf.is_empty() {
        segments.push(Segment::Literal(buf));
    }

    Ok(Template { segments })
}

pub fn validate_value_expressions(value: &AnyValue) -> Result<(), TemplateError> {
    match value {
        AnyValue::Null | AnyValue::Bool(_) | AnyValue::Number(_) => Ok(()),
        AnyValue::String(s) => parse_template(s).map(|_| ()),
        AnyValue::Array(arr) => {
            for v in arr {
                validate_value_expressions(v)?;
            }
            Ok(())
        }
        AnyValue::Object(map) => {
            for v in map.values() {
                validate_value_expressions(v)?;
            }
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("invalid context path: {0}")]
    InvalidPath(#[from] PathError),
    #[error("unclosed embedded expression (missing '}}')")]
    UnclosedExpression,
}
