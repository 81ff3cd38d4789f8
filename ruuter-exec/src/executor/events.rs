use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::executor::RunState;
use crate::failure::CauseCode;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    RunStarted {
        run_id: Uuid,
        pipeline: String,
    },
    RunFinished {
        run_id: Uuid,
        state: RunState,
        steps: usize,
    },
    StepStarted {
        run_id: Uuid,
        step: String,
    },
    StepSucceeded {
        run_id: Uuid,
        step: String,
    },
    StepFailed {
        run_id: Uuid,
        step: String,
        cause_code: CauseCode,
    },
    Branched {
        run_id: Uuid,
        from: String,
        to: String,
    },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::RunStarted { .. } => "run.started",
            Event::RunFinished { .. } => "run.finished",
            Event::StepStarted { .. } => "step.started",
            Event::StepSucceeded { .. } => "step.succeeded",
            Event::StepFailed { .. } => "step.failed",
            Event::Branched { .. } => "step.branched",
        }
    }

    pub fn run_id(&self) -> Uuid {
        match self {
            Event::RunStarted { run_id, .. }
            | Event::RunFinished { run_id, .. }
            | Event::StepStarted { run_id, .. }
            | Event::StepSucceeded { run_id, .. }
            | Event::StepFailed { run_id, .. }
            | Event::Branched { run_id, .. } => *run_id,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let run_id = self.run_id().to_string();
        let kind = self.kind();
        match self {
            Event::RunStarted { pipeline, .. } => {
                json!({ "type": kind, "run_id": run_id, "pipeline": pipeline })
            }
            Event::RunFinished { state, steps, .. } => {
                json!({ "type": kind, "run_id": run_id, "state": state.as_str(), "steps": steps })
            }
            Event::StepStarted { step, .. } | Event::StepSucceeded { step, .. } => {
                json!({ "type": kind, "run_id": run_id, "step": step })
            }
            Event::StepFailed { step, cause_code, .. } => {
                json!({
                    "type": kind,
                    "run_id": run_id,
                    "step": step,
                    "cause_code": cause_code.as_str(),
                })
            }
            Event::Branched { from, to, .. } => {
                json!({ "type": kind, "run_id": run_id, "from": from, "to": to })
            }
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// Writes each event as one JSON line on stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        println!("{}", serde_json::to_string(&event.to_json()).unwrap_or_default());
    }
}

/// Forwards events to `tracing`. Failures are logged at `warn`, everything else at `debug`.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        match &event {
            Event::RunStarted { run_id, pipeline } => {
                tracing::info!(%run_id, pipeline = %pipeline, "run started");
            }
            Event::RunFinished { run_id, state, steps } => {
                tracing::info!(%run_id, state = state.as_str(), steps, "run finished");
            }
            Event::StepStarted { run_id, step } => {
                tracing::debug!(%run_id, step = %step, "step started");
            }
            Event::StepSucceeded { run_id, step } => {
                tracing::debug!(%run_id, step = %step, "step succeeded");
            }
            Event::StepFailed {
                run_id,
                step,
                cause_code,
            } => {
                tracing::warn!(%run_id, step = %step, cause = cause_code.as_str(), "step failed");
            }
            Event::Branched { run_id, from, to } => {
                tracing::debug!(%run_id, from = %from, to = %to, "branched");
            }
        }
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
