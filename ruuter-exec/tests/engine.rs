use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ruuter_core::types::{HttpMethod, StepDef};
use ruuter_core::{parse_pipeline_str, DocumentFormat};
use ruuter_exec::executor::NoOpEventSink;
use ruuter_exec::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts};
use ruuter_exec::steps::{register_builtins, HttpStepConfig};
use ruuter_exec::{
    CauseCode, Context, ControlSignal, Engine, EngineConfig, Failure, IncomingRequest, Pipeline,
    RunState, Step, StepRegistry,
};
use serde_json::{json, Value};

const DECLARATION: &str = r#"
declaration:
  call: declare
  method: post
  namespace: test
  returns: json
  allowlist:
    body:
      - field: name
        type: string
      - field: age
        type: number
    params:
      - field: lang
        type: string
"#;

struct Offline;

#[async_trait]
impl HttpClient for Offline {
    async fn send(
        &self,
        _req: HttpRequestParts,
        _timeout: Duration,
        _max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        Err(HttpError::Network("offline".into()))
    }
}

type Log = Arc<Mutex<Vec<String>>>;

/// Appends its own name to the shared log and continues.
struct Record {
    name: String,
    log: Log,
}

#[async_trait]
impl Step for Record {
    async fn execute(&self, mut ctx: Context) -> Result<ControlSignal, Failure> {
        self.log.lock().unwrap().push(self.name.clone());
        ctx.set(self.name.clone(), json!(true));
        Ok(ControlSignal::Continue(ctx))
    }
}

struct Fail(Failure);

#[async_trait]
impl Step for Fail {
    async fn execute(&self, _ctx: Context) -> Result<ControlSignal, Failure> {
        Err(self.0.clone())
    }
}

struct BranchTo(String);

#[async_trait]
impl Step for BranchTo {
    async fn execute(&self, ctx: Context) -> Result<ControlSignal, Failure> {
        Ok(ControlSignal::branch(self.0.clone(), ctx))
    }
}

struct Sleep {
    network: bool,
}

#[async_trait]
impl Step for Sleep {
    async fn execute(&self, ctx: Context) -> Result<ControlSignal, Failure> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(ControlSignal::Continue(ctx))
    }

    fn is_network_bound(&self) -> bool {
        self.network
    }
}

fn registry(log: &Log) -> StepRegistry {
    let mut registry = StepRegistry::new();
    register_builtins(&mut registry, Arc::new(Offline), HttpStepConfig::default());

    let log = Arc::clone(log);
    registry.register("test.record", move |def: &StepDef| {
        Ok(Arc::new(Record {
            name: def.name.clone(),
            log: Arc::clone(&log),
        }) as Arc<dyn Step>)
    });
    registry.register("test.fail", |def: &StepDef| {
        let failure = match def.param("kind").and_then(Value::as_str) {
            Some("missing") => Failure::missing_value("value absent"),
            Some("script") => Failure::script("script blew up"),
            _ => Failure::network("connection refused"),
        };
        Ok(Arc::new(Fail(failure)) as Arc<dyn Step>)
    });
    registry.register("test.branch", |def: &StepDef| {
        let target = def.param("to").and_then(Value::as_str).unwrap_or_default();
        Ok(Arc::new(BranchTo(target.to_string())) as Arc<dyn Step>)
    });
    registry.register("test.sleep", |def: &StepDef| {
        let network = def.param("network").and_then(Value::as_bool).unwrap_or(false);
        Ok(Arc::new(Sleep { network }) as Arc<dyn Step>)
    });
    registry
}

fn bind(steps: &str, registry: &StepRegistry) -> Pipeline {
    let source = format!("{DECLARATION}{steps}");
    let parsed = parse_pipeline_str(&source, DocumentFormat::Yaml, "flow").unwrap();
    Pipeline::bind(&parsed.document, registry).unwrap()
}

fn engine() -> Engine {
    Engine::new(EngineConfig::default(), Arc::new(NoOpEventSink))
}

fn post(body: Value) -> IncomingRequest {
    IncomingRequest::new(HttpMethod::Post).with_body(body)
}

fn logged(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn only_allowlisted_fields_reach_steps() {
    let log = Log::default();
    let pipeline = bind(
        r#"
answer:
  return: ${incoming}
"#,
        &registry(&log),
    );
    let req = post(json!({"name": "Mari", "admin": true, "age": 41}))
        .with_param("lang", "et")
        .with_param("debug", "1");

    let out = engine().execute(&pipeline, &req).await.unwrap();
    assert!(out.terminated);
    assert_eq!(
        out.body,
        json!({"body": {"name": "Mari", "age": 41}, "params": {"lang": "et"}})
    );
}

#[tokio::test]
async fn declared_but_absent_field_is_missing_not_null() {
    let log = Log::default();
    let pipeline = bind(
        r#"
answer:
  return: ${incoming.body.age}
"#,
        &registry(&log),
    );

    let err = engine()
        .execute(&pipeline, &post(json!({"name": "Mari"})))
        .await
        .unwrap_err();
    assert_eq!(err.cause_code, CauseCode::Null);
    assert_eq!(err.step_name, "answer");
    assert_eq!(err.http_status(), 400);
}

#[tokio::test]
async fn steps_run_in_declaration_order_and_context_is_the_body() {
    let log = Log::default();
    let pipeline = bind(
        r#"
first:
  call: test.record
second:
  call: test.record
third:
  call: test.record
"#,
        &registry(&log),
    );

    let report = engine().run(&pipeline, &post(json!({}))).await;
    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.visited, ["first", "second", "third"]);
    assert_eq!(logged(&log), ["first", "second", "third"]);

    let out = report.result.unwrap();
    assert!(!out.terminated);
    assert_eq!(out.body["first"], json!(true));
    assert_eq!(out.body["third"], json!(true));
    assert!(out.body.get("incoming").is_some());
}

#[tokio::test]
async fn static_next_jumps_and_end_completes() {
    let log = Log::default();
    let pipeline = bind(
        r#"
first:
  call: test.record
  next: third
second:
  call: test.record
third:
  call: test.record
  next: end
fourth:
  call: test.record
"#,
        &registry(&log),
    );

    let report = engine().run(&pipeline, &post(json!({}))).await;
    assert_eq!(report.state, RunState::Completed);
    assert_eq!(logged(&log), ["first", "third"]);
}

#[tokio::test]
async fn switch_branches_to_named_step() {
    let log = Log::default();
    let pipeline = bind(
        r#"
check:
  switch:
    - condition: ${incoming.params}
      next: named
anonymous:
  call: test.record
named:
  call: test.record
"#,
        &registry(&log),
    );

    let report = engine()
        .run(&pipeline, &post(json!({})).with_param("lang", "et"))
        .await;
    assert_eq!(report.visited, ["check", "named"]);
    assert_eq!(logged(&log), ["named"]);

    log.lock().unwrap().clear();
    let report = engine().run(&pipeline, &post(json!({}))).await;
    assert_eq!(report.visited, ["check", "anonymous", "named"]);
}

#[tokio::test]
async fn branch_to_missing_step_is_an_integrity_failure() {
    let log = Log::default();
    let pipeline = bind(
        r#"
jump:
  call: test.branch
  to: nowhere
after:
  call: test.record
"#,
        &registry(&log),
    );

    let report = engine().run(&pipeline, &post(json!({}))).await;
    assert_eq!(report.state, RunState::Failed);
    let err = report.result.unwrap_err();
    assert_eq!(err.cause_code, CauseCode::PipelineIntegrity);
    assert_eq!(err.step_name, "jump");
    assert_eq!(err.dsl_name, "flow");
    assert!(logged(&log).is_empty());
}

#[tokio::test]
async fn branch_to_end_completes() {
    let log = Log::default();
    let pipeline = bind(
        r#"
jump:
  call: test.branch
  to: end
after:
  call: test.record
"#,
        &registry(&log),
    );

    let report = engine().run(&pipeline, &post(json!({}))).await;
    assert_eq!(report.state, RunState::Completed);
    assert!(logged(&log).is_empty());
}

#[tokio::test]
async fn first_failure_stops_the_run() {
    let log = Log::default();
    let pipeline = bind(
        r#"
before:
  call: test.record
broken:
  call: test.fail
  kind: script
after:
  call: test.record
"#,
        &registry(&log),
    );

    let report = engine().run(&pipeline, &post(json!({}))).await;
    assert_eq!(report.state, RunState::Failed);
    assert_eq!(report.visited, ["before", "broken"]);
    assert_eq!(logged(&log), ["before"]);

    let err = report.result.unwrap_err();
    assert_eq!(err.cause_code, CauseCode::Script);
    assert_eq!(err.step_name, "broken");
    assert_eq!(err.message.as_deref(), Some("script blew up"));
}

#[tokio::test]
async fn http_transport_failure_is_network_cause() {
    let log = Log::default();
    let pipeline = bind(
        r#"
call_out:
  call: http.post
  args:
    url: http://upstream.invalid/users
    body:
      name: ${incoming.body.name}
  result: created
"#,
        &registry(&log),
    );

    let err = engine()
        .execute(&pipeline, &post(json!({"name": "Mari"})))
        .await
        .unwrap_err();
    assert_eq!(err.cause_code, CauseCode::Network);
    assert_eq!(err.http_status(), 502);
}

#[tokio::test]
async fn step_budget_stops_cycles() {
    let log = Log::default();
    let pipeline = bind(
        r#"
ping:
  call: test.record
  next: pong
pong:
  call: test.record
  next: ping
"#,
        &registry(&log),
    );
    let engine = Engine::new(
        EngineConfig {
            max_steps: 10,
            run_timeout: None,
        },
        Arc::new(NoOpEventSink),
    );

    let report = engine.run(&pipeline, &post(json!({}))).await;
    assert_eq!(report.visited.len(), 10);
    assert_eq!(
        report.result.unwrap_err().cause_code,
        CauseCode::PipelineIntegrity
    );
}

#[tokio::test(start_paused = true)]
async fn deadline_on_network_step_is_network_cause() {
    let log = Log::default();
    let pipeline = bind(
        r#"
wait:
  call: test.sleep
  network: true
"#,
        &registry(&log),
    );
    let engine = Engine::new(
        EngineConfig {
            max_steps: 10,
            run_timeout: Some(Duration::from_secs(1)),
        },
        Arc::new(NoOpEventSink),
    );

    let err = engine.execute(&pipeline, &post(json!({}))).await.unwrap_err();
    assert_eq!(err.cause_code, CauseCode::Network);
    assert_eq!(err.step_name, "wait");
}

#[tokio::test(start_paused = true)]
async fn deadline_on_local_step_is_unknown_cause() {
    let log = Log::default();
    let pipeline = bind(
        r#"
wait:
  call: test.sleep
"#,
        &registry(&log),
    );

    let deadline = tokio::time::Instant::now() + Duration::from_millis(500);
    let report = engine()
        .run_until(&pipeline, &post(json!({})), Some(deadline))
        .await;
    assert_eq!(report.result.unwrap_err().cause_code, CauseCode::Unknown);
}

/// Parks the run until every other run has reached the same point.
struct Rendezvous(Arc<tokio::sync::Barrier>);

#[async_trait]
impl Step for Rendezvous {
    async fn execute(&self, ctx: Context) -> Result<ControlSignal, Failure> {
        self.0.wait().await;
        tokio::task::yield_now().await;
        Ok(ControlSignal::Continue(ctx))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_do_not_share_context() {
    const RUNS: usize = 64;
    let log = Log::default();
    let barrier = Arc::new(tokio::sync::Barrier::new(RUNS));
    let mut registry = registry(&log);
    let shared = Arc::clone(&barrier);
    registry.register("test.rendezvous", move |_: &StepDef| {
        Ok(Arc::new(Rendezvous(Arc::clone(&shared))) as Arc<dyn Step>)
    });
    let pipeline = Arc::new(bind(
        r#"
stash:
  assign:
    mine: ${incoming.body.name}
meet:
  call: test.rendezvous
answer:
  return:
    name: ${mine}
"#,
        &registry,
    ));
    let engine = engine();

    let runs = (0..RUNS).map(|i| {
        let engine = engine.clone();
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            let out = engine
                .execute(&pipeline, &post(json!({"name": format!("user-{i}")})))
                .await
                .unwrap();
            (i, out.body)
        })
    });

    // Every run writes `mine` before any run reads it back.
    for joined in futures_util::future::join_all(runs).await {
        let (i, body) = joined.unwrap();
        assert_eq!(body, json!({"name": format!("user-{i}")}));
    }
}
