use std::path::Path;
use std::sync::Arc;

use ruuter_core::{load_dir, validate_pipeline, LoadError, LoadedPipeline, ValidationError};
use ruuter_exec::http::{HttpError, ReqwestHttpClient};
use ruuter_exec::steps::register_builtins;
use ruuter_exec::{Pipeline, PipelineBindError, StepRegistry};

use crate::HttpArgs;

#[derive(Debug, thiserror::Error)]
pub enum PipelineSetError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("{route}: {source}")]
    Invalid {
        route: String,
        #[source]
        source: ValidationError,
    },
    #[error("{route}: {source}")]
    Bind {
        route: String,
        #[source]
        source: PipelineBindError,
    },
}

impl PipelineSetError {
    /// Violation lines for `Invalid`, the error itself otherwise.
    pub fn details(&self) -> Vec<String> {
        match self {
            PipelineSetError::Invalid { route, source } => source
                .violations
                .iter()
                .map(|v| format!("{route}: {v}"))
                .collect(),
            other => vec![other.to_string()],
        }
    }
}

/// Registry with the built-in step kinds wired to a reqwest client.
pub fn builtin_registry(http: &HttpArgs) -> Result<StepRegistry, HttpError> {
    let client = ReqwestHttpClient::new()?;
    let mut registry = StepRegistry::new();
    register_builtins(&mut registry, Arc::new(client), http.step_config());
    Ok(registry)
}

pub fn bind(
    loaded: &LoadedPipeline,
    registry: &StepRegistry,
) -> Result<Pipeline, PipelineSetError> {
    let doc = &loaded.parsed.document;
    validate_pipeline(doc).map_err(|source| PipelineSetError::Invalid {
        route: loaded.route_path.clone(),
        source,
    })?;
    Pipeline::bind(doc, registry).map_err(|source| PipelineSetError::Bind {
        route: loaded.route_path.clone(),
        source,
    })
}

/// Loads, validates and binds every pipeline under `dir`.
pub fn bind_dir(
    dir: &Path,
    registry: &StepRegistry,
) -> Result<Vec<Arc<Pipeline>>, PipelineSetError> {
    load_dir(dir)?
        .iter()
        .map(|loaded| bind(loaded, registry).map(Arc::new))
        .collect()
}
