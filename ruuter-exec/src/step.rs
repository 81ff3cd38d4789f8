use async_trait::async_trait;
use serde_json::Value;

use crate::context::Context;
use crate::failure::Failure;

/// Outcome of one step invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlSignal {
    /// Proceed to the next step in sequence (or the step's static `next`).
    Continue(Context),
    /// Jump to the named step of the same pipeline.
    Branch { target: String, context: Context },
    /// Stop the pipeline and respond with the payload.
    Terminate(Value),
}

impl ControlSignal {
    pub fn branch(target: impl Into<String>, context: Context) -> Self {
        ControlSignal::Branch {
            target: target.into(),
            context,
        }
    }
}

/// The contract every step kind implements.
///
/// A step receives the run context by value and hands it back inside the signal, so a
/// step that fails cannot leave partial writes behind for later steps.
#[async_trait]
pub trait Step: Send + Sync {
    async fn execute(&self, ctx: Context) -> Result<ControlSignal, Failure>;

    /// Whether the step awaits outbound network calls. Used to classify deadline expiry.
    fn is_network_bound(&self) -> bool {
        false
    }
}
