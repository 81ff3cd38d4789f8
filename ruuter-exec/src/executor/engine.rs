use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ruuter_core::types::END_STEP;
use serde_json::Value;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::context::Context;
use crate::executor::events::{Event, EventSink, TracingEventSink};
use crate::executor::IncomingRequest;
use crate::failure::{Failure, PipelineExecutionError, StepExecutionError};
use crate::pipeline::{BoundStep, Pipeline};
use crate::step::ControlSignal;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on step invocations in one run. Guards against branch cycles.
    pub max_steps: usize,
    pub run_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_steps: 1000,
            run_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initializing,
    Running,
    Completed,
    Failed,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Initializing => "initializing",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response payload of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub body: Value,
    /// `true` when a step terminated the run explicitly, `false` when it ran off the end.
    pub terminated: bool,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub state: RunState,
    /// Names of the invoked steps, in invocation order.
    pub visited: Vec<String>,
    pub result: Result<RunOutput, PipelineExecutionError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Drives one pipeline run at a time per call. Holds no per-run state, so a single
/// engine serves any number of concurrent runs.
#[derive(Clone)]
pub struct Engine {
    config: EngineConfig,
    events: Arc<dyn EventSink>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default(), Arc::new(TracingEventSink))
    }
}

impl Engine {
    pub fn new(config: EngineConfig, events: Arc<dyn EventSink>) -> Self {
        Self { config, events }
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::new(config, Arc::new(TracingEventSink))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn execute(
        &self,
        pipeline: &Pipeline,
        request: &IncomingRequest,
    ) -> Result<RunOutput, PipelineExecutionError> {
        self.run(pipeline, request).await.result
    }

    pub async fn run(&self, pipeline: &Pipeline, request: &IncomingRequest) -> RunReport {
        let deadline = self.config.run_timeout.map(|t| Instant::now() + t);
        self.run_until(pipeline, request, deadline).await
    }

    /// Runs the pipeline, abandoning the in-flight step once `deadline` passes.
    pub async fn run_until(
        &self,
        pipeline: &Pipeline,
        request: &IncomingRequest,
        deadline: Option<Instant>,
    ) -> RunReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline_run", %run_id, pipeline = pipeline.name());
        self.drive(run_id, pipeline, request, deadline)
            .instrument(span)
            .await
    }

    async fn drive(
        &self,
        run_id: Uuid,
        pipeline: &Pipeline,
        request: &IncomingRequest,
        deadline: Option<Instant>,
    ) -> RunReport {
        let mut run = RunReport {
            run_id,
            state: RunState::Initializing,
            visited: Vec::new(),
            result: Ok(RunOutput {
                body: Value::Null,
                terminated: false,
            }),
        };

        self.events
            .emit(Event::RunStarted {
                run_id,
                pipeline: pipeline.name().to_string(),
            })
            .await;

        let mut ctx = Context::from_request(pipeline.declaration(), request);
        run.state = RunState::Running;

        let mut cursor = 0usize;
        let outcome = loop {
            let Some(step) = pipeline.step_at(cursor) else {
                break Ok(RunOutput {
                    body: ctx.into_value(),
                    terminated: false,
                });
            };

            if run.visited.len() >= self.config.max_steps {
                let failure = Failure::integrity(format!(
                    "step budget of {} invocations exhausted",
                    self.config.max_steps
                ));
                break Err(self.fail(run_id, pipeline, step, failure).await);
            }
            run.visited.push(step.name.clone());

            self.events
                .emit(Event::StepStarted {
                    run_id,
                    step: step.name.clone(),
                })
                .await;

            let signal = match self.invoke(step, std::mem::take(&mut ctx), deadline).await {
                Ok(signal) => signal,
                Err(failure) => break Err(self.fail(run_id, pipeline, step, failure).await),
            };

            self.events
                .emit(Event::StepSucceeded {
                    run_id,
                    step: step.name.clone(),
                })
                .await;

            let target = match signal {
                ControlSignal::Terminate(body) => {
                    break Ok(RunOutput {
                        body,
                        terminated: true,
                    });
                }
                ControlSignal::Continue(next_ctx) => {
                    ctx = next_ctx;
                    match step.next.as_deref() {
                        Some(target) => target.to_string(),
                        None => {
                            cursor += 1;
                            continue;
                        }
                    }
                }
                ControlSignal::Branch { target, context } => {
                    ctx = context;
                    self.events
                        .emit(Event::Branched {
                            run_id,
                            from: step.name.clone(),
                            to: target.clone(),
                        })
                        .await;
                    target
                }
            };

            if target == END_STEP {
                break Ok(RunOutput {
                    body: ctx.into_value(),
                    terminated: false,
                });
            }
            match pipeline.position(&target) {
                Some(idx) => cursor = idx,
                None => {
                    let failure = Failure::integrity(format!("unknown step `{target}`"));
                    break Err(self.fail(run_id, pipeline, step, failure).await);
                }
            }
        };

        run.state = if outcome.is_ok() {
            RunState::Completed
        } else {
            RunState::Failed
        };
        run.result = outcome;

        self.events
            .emit(Event::RunFinished {
                run_id,
                state: run.state,
                steps: run.visited.len(),
            })
            .await;
        run
    }

    async fn invoke(
        &self,
        step: &BoundStep,
        ctx: Context,
        deadline: Option<Instant>,
    ) -> Result<ControlSignal, Failure> {
        let fut = step.handler.execute(ctx);
        let Some(deadline) = deadline else {
            return fut.await;
        };
        match tokio::time::timeout_at(deadline, fut).await {
            Ok(result) => result,
            Err(_) if step.handler.is_network_bound() => {
                Err(Failure::network("deadline exceeded while awaiting a remote call"))
            }
            Err(_) => Err(Failure::cancelled("deadline exceeded")),
        }
    }

    async fn fail(
        &self,
        run_id: Uuid,
        pipeline: &Pipeline,
        step: &BoundStep,
        failure: Failure,
    ) -> PipelineExecutionError {
        let err = StepExecutionError::new(step.name.clone(), failure)
            .into_pipeline_error(pipeline.name());
        tracing::debug!(
            step = %step.name,
            cause = %err.cause_code,
            message = ?err.message,
            "pipeline failed"
        );
        self.events
            .emit(Event::StepFailed {
                run_id,
                step: step.name.clone(),
                cause_code: err.cause_code,
            })
            .await;
        err
    }
}
