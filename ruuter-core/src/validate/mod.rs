mod rules;
mod validator;

use crate::error::ValidationError;
use crate::types::PipelineDocument;
use validator::Validator;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for PipelineDocument {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_pipeline(self)
    }
}

pub fn validate_pipeline(doc: &PipelineDocument) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.validate_pipeline(doc);
    v.finish()
}
