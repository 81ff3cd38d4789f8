use crate::error::ParseError;
use crate::types::{AnyValue, Declaration, StepDef, DECLARE_CALL};

/// Key under which the declaration is conventionally written.
pub const DECLARATION_KEY: &str = "declaration";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDocument {
    pub name: String,
    pub declaration: Option<Declaration>,
    pub steps: Vec<StepDef>,
}

impl PipelineDocument {
    /// Splits a parsed mapping into the declaration and the ordered step list.
    ///
    /// The entry keyed `declaration` wins; otherwise the first entry whose `call` is
    /// `declare` is used. Any further `declare` entries stay in the step list, where
    /// validation reports them.
    pub fn from_value(name: impl Into<String>, value: AnyValue) -> Result<Self, ParseError> {
        let AnyValue::Object(entries) = value else {
            return Err(ParseError::NotAMapping);
        };

        let declaration_key = if entries.contains_key(DECLARATION_KEY) {
            Some(DECLARATION_KEY.to_string())
        } else {
            entries
                .iter()
                .find(|(_, body)| is_declare(body))
                .map(|(k, _)| k.clone())
        };

        let mut declaration = None;
        let mut steps = Vec::with_capacity(entries.len());
        for (key, body) in entries {
            if declaration_key.as_deref() == Some(key.as_str()) {
                let decl = serde_json::from_value::<Declaration>(body)
                    .map_err(ParseError::InvalidDeclaration)?;
                declaration = Some(decl);
                continue;
            }
            let AnyValue::Object(body) = body else {
                return Err(ParseError::InvalidStep {
                    step: key,
                    reason: "step body must be a mapping".to_string(),
                });
            };
            let step = StepDef::new(key.clone(), body)
                .map_err(|reason| ParseError::InvalidStep { step: key, reason })?;
            steps.push(step);
        }

        Ok(Self {
            name: name.into(),
            declaration,
            steps,
        })
    }

    pub fn step(&self, name: &str) -> Option<&StepDef> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn step_index(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.name == name)
    }
}

fn is_declare(body: &AnyValue) -> bool {
    body.get("call").and_then(|c| c.as_str()) == Some(DECLARE_CALL)
}
