use std::collections::HashMap;
use std::sync::Arc;

use ruuter_core::types::StepDef;

use crate::pipeline::PipelineBindError;
use crate::step::Step;

/// Builds a step implementation from its document definition.
pub trait StepFactory: Send + Sync {
    fn build(&self, def: &StepDef) -> Result<Arc<dyn Step>, String>;
}

impl<F> StepFactory for F
where
    F: Fn(&StepDef) -> Result<Arc<dyn Step>, String> + Send + Sync,
{
    fn build(&self, def: &StepDef) -> Result<Arc<dyn Step>, String> {
        self(def)
    }
}

/// Lookup table from step kind (`assign`, `http.post`, ...) to its factory.
#[derive(Default, Clone)]
pub struct StepRegistry {
    factories: HashMap<String, Arc<dyn StepFactory>>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: impl Into<String>,
        factory: impl StepFactory + 'static,
    ) -> &mut Self {
        self.factories.insert(kind.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn build(&self, def: &StepDef) -> Result<Arc<dyn Step>, PipelineBindError> {
        let kind = def
            .kind
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| PipelineBindError::MissingKind {
                step: def.name.clone(),
            })?;
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| PipelineBindError::UnknownKind {
                step: def.name.clone(),
                kind: kind.to_string(),
            })?;
        factory.build(def).map_err(|reason| PipelineBindError::Build {
            step: def.name.clone(),
            kind: kind.to_string(),
            reason,
        })
    }
}
