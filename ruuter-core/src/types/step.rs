use crate::types::Mapping;

/// Reserved `next` target that completes the pipeline.
pub const END_STEP: &str = "end";

/// Step body keys that identify a kind when no `call` is present, in priority order.
pub const SHAPE_KINDS: [&str; 4] = ["assign", "switch", "return", "script"];

/// One node of a pipeline document. `parameters` is opaque to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDef {
    pub name: String,
    pub kind: Option<String>,
    pub next: Option<String>,
    pub parameters: Mapping,
}

impl StepDef {
    pub fn new(name: impl Into<String>, mut body: Mapping) -> Result<Self, String> {
        let next = match body.remove("next") {
            None => None,
            Some(serde_json::Value::String(s)) => Some(s),
            Some(other) => return Err(format!("`next` must be a string, got {other}")),
        };
        let kind = resolve_kind(&body);
        Ok(Self {
            name: name.into(),
            kind,
            next,
            parameters: body,
        })
    }

    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("")
    }

    pub fn param(&self, key: &str) -> Option<&serde_json::Value> {
        self.parameters.get(key)
    }
}

pub fn resolve_kind(body: &Mapping) -> Option<String> {
    if let Some(call) = body.get("call") {
        return call.as_str().map(|s| s.trim().to_string());
    }
    SHAPE_KINDS
        .iter()
        .find(|k| body.contains_key(**k))
        .map(|k| (*k).to_string())
}
