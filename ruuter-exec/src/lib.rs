#![forbid(unsafe_code)]

//! Runtime engine for Ruuter DSL pipelines.
//!
//! Parsing and validation of pipeline documents live in `ruuter-core`; this crate binds
//! documents to step implementations and runs them against incoming requests.

pub mod context;
pub mod eval;
pub mod executor;
pub mod failure;
pub mod http;
pub mod pipeline;
pub mod registry;
pub mod retry;
pub mod routes;
pub mod step;
pub mod steps;

pub use crate::context::Context;
pub use crate::executor::{Engine, EngineConfig, IncomingRequest, RunOutput, RunReport, RunState};
pub use crate::failure::{
    classify, CauseCode, ErrorObject, Failure, FailureKind, PipelineExecutionError,
    StepExecutionError,
};
pub use crate::pipeline::{BoundStep, Pipeline, PipelineBindError};
pub use crate::registry::{StepFactory, StepRegistry};
pub use crate::routes::RouteTable;
pub use crate::step::{ControlSignal, Step};
