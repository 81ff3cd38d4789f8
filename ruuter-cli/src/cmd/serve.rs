use std::sync::Arc;

use ruuter_core::openapi::{project_routes, Info};
use ruuter_exec::{Engine, RouteTable};

use crate::exit_codes;
use crate::pipelines::{bind_dir, builtin_registry};
use crate::server::{serve, AppState};
use crate::version::{HeartbeatInfo, PackageVersion};
use crate::{logging, EngineArgs, HttpArgs, LogArgs, ServerArgs};

pub async fn serve_cmd(
    server: ServerArgs,
    engine: EngineArgs,
    http: HttpArgs,
    log: LogArgs,
) -> i32 {
    logging::init(&log);
    let started_at = chrono::Utc::now();

    let package = match PackageVersion::load(&server.version_file) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, "cannot read package version");
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let heartbeat = HeartbeatInfo::new(&server.app_name, &package, started_at);

    let registry = match builtin_registry(&http) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "cannot create HTTP client");
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let pipelines = match bind_dir(&server.dsl_dir, &registry) {
        Ok(p) => p,
        Err(e) => {
            for line in e.details() {
                tracing::error!(dsl_dir = %server.dsl_dir.display(), "{line}");
            }
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let mut routes = RouteTable::new();
    for pipeline in &pipelines {
        let method = pipeline.declaration().method;
        if let Some(previous) = routes.insert(Arc::clone(pipeline)) {
            tracing::warn!(
                %method,
                route = %pipeline.route(),
                replaced = previous.name(),
                "two pipelines declare the same route; the later one wins"
            );
        }
        tracing::debug!(%method, route = %pipeline.route(), "route registered");
    }

    let openapi = project_routes(
        Info::new(server.app_name.clone(), heartbeat.version()),
        pipelines.iter().map(|p| (p.declaration(), p.name())),
    );

    tracing::info!(
        pipelines = pipelines.len(),
        routes = routes.len(),
        version = heartbeat.version(),
        "pipelines loaded"
    );

    let state = AppState::new(
        Engine::with_config(engine.engine_config()),
        routes,
        openapi,
        heartbeat,
    );
    match serve(server.listen, state).await {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, addr = %server.listen, "server error");
            exit_codes::RUNTIME_ERROR
        }
    }
}
