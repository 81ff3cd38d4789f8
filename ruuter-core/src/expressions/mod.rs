//! `${...}` references into the run context.
//!
//! A reference is a dot-separated path with optional `[index]` suffixes, for example
//! `${created.response.body.items[0].id}`.

mod path;
mod template;

pub use path::{parse_path, ContextPath, PathError, PathSegment};
pub use template::{parse_template, validate_value_expressions, Segment, Template, TemplateError};
