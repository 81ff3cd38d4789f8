mod engine;
pub mod events;
mod request;

pub use engine::{Engine, EngineConfig, RunOutput, RunReport, RunState};
pub use events::{
    CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink, TracingEventSink,
};
pub use request::IncomingRequest;
