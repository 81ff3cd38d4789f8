use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ruuter_core::types::HttpMethod;
use ruuter_core::{parse_pipeline_str, DocumentFormat};
use ruuter_exec::executor::{CompositeEventSink, Event, EventSink};
use ruuter_exec::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts};
use ruuter_exec::steps::{register_builtins, HttpStepConfig};
use ruuter_exec::{
    CauseCode, Engine, EngineConfig, IncomingRequest, Pipeline, RunState, StepRegistry,
};
use serde_json::json;

struct Collect(Arc<tokio::sync::Mutex<Vec<Event>>>);

#[async_trait]
impl EventSink for Collect {
    async fn emit(&self, event: Event) {
        self.0.lock().await.push(event);
    }
}

struct Offline;

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

fn pipeline(steps: &str) -> Pipeline {
    let source = format!(
        "declaration:\n  call: declare\n  method: get\n  namespace: demo\n{steps}"
    );
    let mut registry = StepRegistry::new();
    register_builtins(&mut registry, Arc::new(Offline), HttpStepConfig::default());
    let parsed = parse_pipeline_str(&source, DocumentFormat::Yaml, "flow").unwrap();
    Pipeline::bind(&parsed.document, &registry).unwrap()
}

#[tokio::test]
async fn composite_sink_sees_full_lifecycle() {
    let first = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let second = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let mut sink = CompositeEventSink::new();
    sink.add(Box::new(Collect(first.clone())));
    sink.add(Box::new(Collect(second.clone())));

    let pipeline = pipeline(
        r#"
route:
  switch:
    - condition: true
      next: answer
skipped:
  return: never
answer:
  return: done
"#,
    );
    let engine = Engine::new(EngineConfig::default(), Arc::new(sink));
    let report = engine.run(&pipeline, &IncomingRequest::new(HttpMethod::Get)).await;
    assert_eq!(report.state, RunState::Completed);

    let kinds: Vec<_> = first.lock().await.iter().map(Event::kind).collect();
    assert_eq!(
        kinds,
        [
            "run.started",
            "step.started",
            "step.succeeded",
            "step.branched",
            "step.started",
            "step.succeeded",
            "run.finished"
        ]
    );
    assert_eq!(first.lock().await.len(), second.lock().await.len());
    assert!(first.lock().await.iter().all(|e| e.run_id() == report.run_id));
}

#[tokio::test]
async fn failed_step_event_carries_cause() {
    let events = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let pipeline = pipeline(
        r#"
answer:
  return: ${nothing.here}
"#,
    );
    let engine = Engine::new(EngineConfig::default(), Arc::new(Collect(events.clone())));
    engine.run(&pipeline, &IncomingRequest::new(HttpMethod::Get)).await;

    let events = events.lock().await;
    assert!(events.iter().any(|e| matches!(
        e,
        Event::StepFailed { step, cause_code: CauseCode::Null, .. } if step == "answer"
    )));
    let last = events.last().unwrap().to_json();
    assert_eq!(last["type"], json!("run.finished"));
    assert_eq!(last["state"], json!("failed"));
    assert_eq!(last["steps"], json!(1));
}
