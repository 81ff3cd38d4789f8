use crate::error::ParseError;
use crate::types::{AnyValue, PipelineDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Auto,
}

impl DocumentFormat {
    /// Picks a format from a file extension, falling back to auto-detection.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("json") => DocumentFormat::Json,
            Some("yml" | "yaml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Auto,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedPipeline {
    pub document: PipelineDocument,
    pub format: DocumentFormat,
}

pub fn parse_pipeline_str(
    input: &str,
    format: DocumentFormat,
    name: &str,
) -> Result<ParsedPipeline, ParseError> {
    let (value, format) = match format {
        DocumentFormat::Json => (serde_json::from_str::<AnyValue>(input)?, format),
        DocumentFormat::Yaml => (serde_yaml::from_str::<AnyValue>(input)?, format),
        DocumentFormat::Auto => parse_value_auto(input)?,
    };
    Ok(ParsedPipeline {
        document: PipelineDocument::from_value(name, value)?,
        format,
    })
}

fn parse_value_auto(input: &str) -> Result<(AnyValue, DocumentFormat), ParseError> {
    // JSON always starts with `{` or `[` after trimming.
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return Err(ParseError::UnknownFormat);
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return match serde_json::from_str::<AnyValue>(input) {
            Ok(v) => Ok((v, DocumentFormat::Json)),
            Err(e) => match serde_yaml::from_str::<AnyValue>(input) {
                Ok(v) => Ok((v, DocumentFormat::Yaml)),
                Err(_) => Err(ParseError::Json(e)),
            },
        };
    }

    match serde_yaml::from_str::<AnyValue>(input) {
        Ok(v) => Ok((v, DocumentFormat::Yaml)),
        Err(e) => {
            if let Ok(v) = serde_json::from_str::<AnyValue>(input) {
                return Ok((v, DocumentFormat::Json));
            }
            Err(ParseError::Yaml(e))
        }
    }
}
