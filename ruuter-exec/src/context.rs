use ruuter_core::expressions::ContextPath;
use ruuter_core::types::{AllowedField, Declaration, Mapping};
use serde_json::Value;

use crate::executor::IncomingRequest;

/// Context entry holding the filtered request inputs.
pub const INCOMING: &str = "incoming";

/// Request-scoped variable store threaded through one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    vars: Mapping,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the initial context of a run.
    ///
    /// Only fields named in the declaration's allowlist reach the context: body fields
    /// under `incoming.body`, query parameters under `incoming.params`. Declared fields
    /// absent from the request stay absent.
    pub fn from_request(declaration: &Declaration, request: &IncomingRequest) -> Self {
        let body = match &request.body {
            Value::Object(map) => filter_fields(map, declaration.body_fields()),
            _ => Mapping::new(),
        };
        let params = filter_fields(&request.params, declaration.param_fields());

        let mut incoming = Mapping::new();
        incoming.insert("body".to_string(), Value::Object(body));
        incoming.insert("params".to_string(), Value::Object(params));

        let mut ctx = Self::new();
        ctx.set(INCOMING, Value::Object(incoming));
        ctx
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.vars.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn lookup(&self, path: &ContextPath) -> Option<&Value> {
        path.lookup_in(&self.vars)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.vars.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.vars)
    }
}

fn filter_fields(source: &Mapping, allowed: &[AllowedField]) -> Mapping {
    let mut out = Mapping::new();
    for name in allowed.iter().filter_map(|f| f.field.as_deref()) {
        if let Some(v) = source.get(name) {
            out.insert(name.to_string(), v.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruuter_core::types::{AllowedField, Allowlist, HttpMethod};
    use serde_json::json;

    fn declaration() -> Declaration {
        Declaration {
            call: None,
            version: None,
            description: None,
            method: HttpMethod::Post,
            accepts: None,
            returns: None,
            namespace: "ns".into(),
            allowlist: Some(Allowlist {
                body: Some(vec![
                    AllowedField::new("name", "string", ""),
                    AllowedField::new("age", "number", ""),
                ]),
                params: Some(vec![AllowedField::new("lang", "string", "")]),
            }),
        }
    }

    #[test]
    fn keeps_only_allowlisted_fields() {
        let req = IncomingRequest::new(HttpMethod::Post)
            .with_body(json!({"name": "Mari", "admin": true}))
            .with_param("lang", "et")
            .with_param("debug", "1");
        let ctx = Context::from_request(&declaration(), &req);

        assert_eq!(ctx.len(), 1);
        assert_eq!(
            ctx.get(INCOMING),
            Some(&json!({"body": {"name": "Mari"}, "params": {"lang": "et"}}))
        );
    }

    #[test]
    fn non_object_body_contributes_nothing() {
        let req = IncomingRequest::new(HttpMethod::Post).with_body(json!([1, 2, 3]));
        let ctx = Context::from_request(&declaration(), &req);
        assert_eq!(ctx.get(INCOMING).unwrap()["body"], json!({}));
    }

    #[test]
    fn set_overwrites_and_returns_previous() {
        let mut ctx = Context::new();
        assert!(ctx.set("a", json!(1)).is_none());
        assert_eq!(ctx.set("a", json!(2)), Some(json!(1)));
        assert_eq!(ctx.get("a"), Some(&json!(2)));
    }
}
