//! Failure taxonomy.
//!
//! A step raises a [`Failure`] tagged with a structural [`FailureKind`] at the point of
//! origin. The engine wraps it with the step name ([`StepExecutionError`]) and then
//! classifies it into a [`CauseCode`] for the caller ([`PipelineExecutionError`]).
//! Classification looks at the kind only, never at the message.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A required value was absent.
    MissingValue,
    /// The scripting subsystem failed.
    Script,
    /// An outbound call failed: connection, timeout or malformed response.
    Network,
    /// The pipeline itself is malformed (unknown branch target, exhausted step budget).
    Integrity,
    /// The run was abandoned while a non-network operation was pending.
    Cancelled,
    Other,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::MissingValue => "missing value",
            FailureKind::Script => "script",
            FailureKind::Network => "network",
            FailureKind::Integrity => "pipeline integrity",
            FailureKind::Cancelled => "cancelled",
            FailureKind::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} failure: {}", message.as_deref().unwrap_or("(no detail)"))]
pub struct Failure {
    pub kind: FailureKind,
    pub message: Option<String>,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    pub fn bare(kind: FailureKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn missing_value(message: impl Into<String>) -> Self {
        Self::new(FailureKind::MissingValue, message)
    }

    pub fn script(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Script, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, message)
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Integrity, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Cancelled, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Other, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CauseCode {
    #[serde(rename = "E_null")]
    Null,
    #[serde(rename = "E_script")]
    Script,
    #[serde(rename = "E_network")]
    Network,
    #[serde(rename = "E_pipeline_integrity")]
    PipelineIntegrity,
    #[serde(rename = "E_unknown")]
    Unknown,
}

impl CauseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CauseCode::Null => "E_null",
            CauseCode::Script => "E_script",
            CauseCode::Network => "E_network",
            CauseCode::PipelineIntegrity => "E_pipeline_integrity",
            CauseCode::Unknown => "E_unknown",
        }
    }

    /// HTTP status returned to the caller for a run that failed with this cause.
    pub fn http_status(&self) -> u16 {
        match self {
            CauseCode::Null => 400,
            CauseCode::Network => 502,
            CauseCode::Script | CauseCode::PipelineIntegrity | CauseCode::Unknown => 500,
        }
    }
}

impl fmt::Display for CauseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(kind: FailureKind) -> CauseCode {
    match kind {
        FailureKind::MissingValue => CauseCode::Null,
        FailureKind::Script => CauseCode::Script,
        FailureKind::Network => CauseCode::Network,
        FailureKind::Integrity => CauseCode::PipelineIntegrity,
        FailureKind::Cancelled | FailureKind::Other => CauseCode::Unknown,
    }
}

/// Attribution of a failure to the step that raised it. The cause is not reclassified here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("error executing: {step_name}")]
pub struct StepExecutionError {
    pub step_name: String,
    #[source]
    pub failure: Failure,
}

impl StepExecutionError {
    pub fn new(step_name: impl Into<String>, failure: Failure) -> Self {
        Self {
            step_name: step_name.into(),
            failure,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.failure.message.as_deref()
    }

    pub fn into_pipeline_error(self, dsl_name: impl Into<String>) -> PipelineExecutionError {
        PipelineExecutionError {
            dsl_name: dsl_name.into(),
            cause_code: classify(self.failure.kind),
            step_name: self.step_name,
            message: self.failure.message,
        }
    }
}

/// The only error record surfaced to the caller of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pipeline `{dsl_name}` failed at step `{step_name}` with {cause_code}")]
pub struct PipelineExecutionError {
    pub dsl_name: String,
    pub step_name: String,
    pub cause_code: CauseCode,
    pub message: Option<String>,
}

impl PipelineExecutionError {
    pub fn http_status(&self) -> u16 {
        self.cause_code.http_status()
    }

    pub fn error_object(&self) -> ErrorObject {
        ErrorObject {
            dsl_name: self.dsl_name.clone(),
            step_name: self.step_name.clone(),
            cause_code: self.cause_code,
            message: self.message.clone(),
        }
    }
}

/// Wire shape of a failed run: `{dslName, stepName, causeCode, message}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorObject {
    pub dsl_name: String,
    pub step_name: String,
    pub cause_code: CauseCode,
    pub message: Option<String>,
}
