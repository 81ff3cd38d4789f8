use ruuter_core::types::{HttpMethod, Mapping};
use serde_json::Value;

/// Raw inputs of one call to a pipeline route, before allowlist filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingRequest {
    pub method: HttpMethod,
    pub body: Value,
    pub params: Mapping,
}

impl IncomingRequest {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            body: Value::Null,
            params: Mapping::new(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), Value::String(value.into()));
        self
    }

    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in params {
            self.params.insert(k.into(), Value::String(v.into()));
        }
        self
    }
}
