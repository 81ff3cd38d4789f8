use std::sync::Arc;

use ruuter_core::OpenApiDocument;
use ruuter_exec::{Engine, RouteTable};

use crate::version::HeartbeatInfo;

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    pub routes: Arc<RouteTable>,
    pub openapi: Arc<OpenApiDocument>,
    pub heartbeat: Arc<HeartbeatInfo>,
}

impl AppState {
    pub fn new(
        engine: Engine,
        routes: RouteTable,
        openapi: OpenApiDocument,
        heartbeat: HeartbeatInfo,
    ) -> Self {
        Self {
            engine,
            routes: Arc::new(routes),
            openapi: Arc::new(openapi),
            heartbeat: Arc::new(heartbeat),
        }
    }
}
