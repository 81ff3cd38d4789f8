use std::fmt;
use std::str::FromStr;

use crate::types::AnyValue;

/// The `call` value that marks an entry as the route declaration.
pub const DECLARE_CALL: &str = "declare";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = UnknownMethod;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(value: HttpMethod) -> Self {
        value.as_str().to_string()
    }
}

/// Static per-route contract: method, namespace, accepted inputs and documentation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Declaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<AnyValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub method: HttpMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepts: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,

    #[serde(default)]
    pub namespace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<Allowlist>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Allowlist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<AllowedField>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<AllowedField>>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AllowedField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AllowedField {
    pub fn new(field: &str, field_type: &str, description: &str) -> Self {
        Self {
            field: Some(field.to_string()),
            field_type: Some(field_type.to_string()),
            description: Some(description.to_string()),
        }
    }
}

impl Declaration {
    pub fn body_fields(&self) -> &[AllowedField] {
        self.allowlist
            .as_ref()
            .and_then(|a| a.body.as_deref())
            .unwrap_or(&[])
    }

    pub fn param_fields(&self) -> &[AllowedField] {
        self.allowlist
            .as_ref()
            .and_then(|a| a.params.as_deref())
            .unwrap_or(&[])
    }

    /// Public path of the route: `/<namespace>/<route_path>`.
    pub fn route(&self, route_path: &str) -> String {
        format!("/{}/{}", self.namespace, route_path.trim_start_matches('/'))
    }
}
