use std::sync::Arc;

use ruuter_core::types::HttpMethod;
use ruuter_core::{parse_pipeline_str, DocumentFormat};
use ruuter_exec::steps::{register_builtins, HttpStepConfig};
use ruuter_exec::{Pipeline, RouteTable, StepRegistry};

mod support {
    use std::time::Duration;

    use async_trait::async_trait;
    use ruuter_exec::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts};

    pub struct Offline;

    #[async_trait]
    impl HttpClient for Offline {
        async fn send(
            &self,
            _req: HttpRequestParts,
            _timeout: Duration,
            _max: usize,
        ) -> Result<HttpResponseParts, HttpError> {
            Err(HttpError::Network("offline".into()))
        }
    }
}

fn pipeline(name: &str, method: &str, namespace: &str) -> Arc<Pipeline> {
    let source = format!(
        "declaration:\n  call: declare\n  method: {method}\n  namespace: {namespace}\nanswer:\n  return: ok\n"
    );
    let mut registry = StepRegistry::new();
    register_builtins(&mut registry, Arc::new(support::Offline), HttpStepConfig::default());
    let parsed = parse_pipeline_str(&source, DocumentFormat::Yaml, name).unwrap();
    Arc::new(Pipeline::bind(&parsed.document, &registry).unwrap())
}

#[test]
fn routes_match_on_method_and_normalized_path() {
    let mut table = RouteTable::new();
    table.insert(pipeline("users/create", "post", "api"));
    table.insert(pipeline("users/list", "get", "api"));

    assert_eq!(table.len(), 2);
    let hit = table.match_route(HttpMethod::Post, "/api/users/create").unwrap();
    assert_eq!(hit.name(), "users/create");
    assert!(table.match_route(HttpMethod::Post, "/api/users/create/").is_some());
    assert!(table.match_route(HttpMethod::Get, "/api/users/create").is_none());
    assert!(table.match_route(HttpMethod::Get, "/api/users/list").is_some());
    assert!(table.has_path("/api/users/create"));
    assert!(!table.has_path("/api/users/delete"));
}

#[test]
fn same_route_and_method_replaces_previous() {
    let mut table = RouteTable::new();
    assert!(table.insert(pipeline("ping", "get", "svc")).is_none());
    let previous = table.insert(pipeline("ping", "get", "svc"));
    assert!(previous.is_some());
    assert_eq!(table.len(), 1);

    let listed: Vec<_> = table.iter().map(|(m, p, _)| (m, p.to_string())).collect();
    assert_eq!(listed, [(HttpMethod::Get, "/svc/ping".to_string())]);
}
