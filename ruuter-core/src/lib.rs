#![forbid(unsafe_code)]

pub mod error;
pub mod expressions;
pub mod loader;
pub mod openapi;
pub mod parser;
pub mod types;
pub mod validate;

pub use crate::error::{DslError, LoadError, ParseError, ValidationError, Violation};
pub use crate::loader::{load_dir, load_file, LoadedPipeline};
pub use crate::openapi::{project_routes, OpenApiDocument};
pub use crate::parser::{parse_pipeline_str, DocumentFormat, ParsedPipeline};
pub use crate::types::{AllowedField, Allowlist, Declaration, HttpMethod, PipelineDocument, StepDef};
pub use crate::validate::{validate_pipeline, Validate};
