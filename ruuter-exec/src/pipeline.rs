use std::collections::HashMap;
use std::sync::Arc;

use ruuter_core::types::{Declaration, PipelineDocument, END_STEP};

use crate::registry::StepRegistry;
use crate::step::Step;

/// A step definition bound to its implementation.
#[derive(Clone)]
pub struct BoundStep {
    pub name: String,
    pub kind: String,
    pub next: Option<String>,
    pub handler: Arc<dyn Step>,
}

impl std::fmt::Debug for BoundStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundStep")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineBindError {
    #[error("pipeline `{0}` has no declaration")]
    MissingDeclaration(String),
    #[error("pipeline `{0}` has no steps")]
    Empty(String),
    #[error("step `{step}` has no kind")]
    MissingKind { step: String },
    #[error("step `{step}` uses unknown kind `{kind}`")]
    UnknownKind { step: String, kind: String },
    #[error("duplicate step name `{0}`")]
    DuplicateStep(String),
    #[error("step `{step}` names unknown next step `{target}`")]
    UnknownNext { step: String, target: String },
    #[error("step `{step}` ({kind}) could not be built: {reason}")]
    Build {
        step: String,
        kind: String,
        reason: String,
    },
}

/// Executable form of one pipeline document. Immutable once bound and shared between runs.
#[derive(Debug)]
pub struct Pipeline {
    name: String,
    declaration: Declaration,
    steps: Vec<BoundStep>,
    index: HashMap<String, usize>,
}

impl Pipeline {
    pub fn bind(
        doc: &PipelineDocument,
        registry: &StepRegistry,
    ) -> Result<Self, PipelineBindError> {
        let declaration = doc
            .declaration
            .clone()
            .ok_or_else(|| PipelineBindError::MissingDeclaration(doc.name.clone()))?;
        if doc.steps.is_empty() {
            return Err(PipelineBindError::Empty(doc.name.clone()));
        }

        let mut index = HashMap::with_capacity(doc.steps.len());
        for (i, def) in doc.steps.iter().enumerate() {
            if index.insert(def.name.clone(), i).is_some() {
                return Err(PipelineBindError::DuplicateStep(def.name.clone()));
            }
        }

        let mut steps = Vec::with_capacity(doc.steps.len());
        for def in &doc.steps {
            if let Some(target) = def.next.as_deref() {
                if target != END_STEP && !index.contains_key(target) {
                    return Err(PipelineBindError::UnknownNext {
                        step: def.name.clone(),
                        target: target.to_string(),
                    });
                }
            }
            let handler = registry.build(def)?;
            steps.push(BoundStep {
                name: def.name.clone(),
                kind: def.kind().to_string(),
                next: def.next.clone(),
                handler,
            });
        }

        Ok(Self {
            name: doc.name.clone(),
            declaration,
            steps,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// Public route of the pipeline, `/<namespace>/<name>`.
    pub fn route(&self) -> String {
        self.declaration.route(&self.name)
    }

    pub fn steps(&self) -> &[BoundStep] {
        &self.steps
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn step_at(&self, idx: usize) -> Option<&BoundStep> {
        self.steps.get(idx)
    }
}
