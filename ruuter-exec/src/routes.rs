use std::collections::BTreeMap;
use std::sync::Arc;

use ruuter_core::types::HttpMethod;

use crate::pipeline::Pipeline;

/// Dispatch table from `(method, path)` to a bound pipeline. Built once at startup.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    routes: BTreeMap<(HttpMethod, String), Arc<Pipeline>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the pipeline under its declared method and route.
    /// Returns the pipeline previously registered there, if any.
    pub fn insert(&mut self, pipeline: Arc<Pipeline>) -> Option<Arc<Pipeline>> {
        let key = (pipeline.declaration().method, normalize(&pipeline.route()));
        self.routes.insert(key, pipeline)
    }

    pub fn match_route(&self, method: HttpMethod, path: &str) -> Option<&Arc<Pipeline>> {
        self.routes.get(&(method, normalize(path)))
    }

    /// Whether any pipeline is registered at `path`, for any method.
    pub fn has_path(&self, path: &str) -> bool {
        let path = normalize(path);
        self.routes.keys().any(|(_, p)| *p == path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HttpMethod, &str, &Arc<Pipeline>)> {
        self.routes.iter().map(|((m, p), pl)| (*m, p.as_str(), pl))
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
