use std::path::Path;
use ruuter_core::load_file;
use ruuter_exec::{Engine, IncomingRequest};
use serde_json::Value;

use crate::exit_codes;
use crate::output::{print_error, print_result};
use crate::pipelines::{bind, builtin_registry};
use crate::{logging, EngineArgs, EventsTarget, HttpArgs, LogArgs, OutputArgs};

#[allow(clippy::too_many_arguments)]
pub async fn run_cmd(
    file: &Path,
    body: Option<&str>,
    params: &[String],
    events: EventsTarget,
    engine: EngineArgs,
    http: HttpArgs,
    log: LogArgs,
    output: OutputArgs,
) -> i32 {
    logging::init(&log);

    let body = match body.map(serde_json::from_str::<Value>).transpose() {
        Ok(b) => b.unwrap_or(Value::Null),
        Err(e) => {
            print_error(output.format, output.quiet, &format!("invalid --body JSON: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let params = match parse_params(params) {
        Ok(p) => p,
        Err(msg) => {
            print_error(output.format, output.quiet, &msg);
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let root = file.parent().unwrap_or(Path::new(""));
    let loaded = match load_file(root, file) {
        Ok(l) => l,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };
    let registry = match builtin_registry(&http) {
        Ok(r) => r,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let pipeline = match bind(&loaded, &registry) {
        Ok(p) => p,
        Err(e) => {
            for line in e.details() {
                print_error(output.format, output.quiet, &line);
            }
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let request = IncomingRequest::new(pipeline.declaration().method)
        .with_body(body)
        .with_params(params);
    let engine = Engine::new(engine.engine_config(), events.sink());

    match engine.execute(&pipeline, &request).await {
        Ok(out) => {
            print_result(output.format, output.quiet, &out.body);
            exit_codes::SUCCESS
        }
        Err(err) => {
            print_result(output.format, output.quiet, &err.error_object());
            exit_codes::RUN_FAILED
        }
    }
}

fn parse_params(raw: &[String]) -> Result<Vec<(String, String)>, String> {
    raw.iter()
        .map(|kv| {
            kv.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| format!("invalid --param `{kv}`, expected KEY=VALUE"))
        })
        .collect()
}
