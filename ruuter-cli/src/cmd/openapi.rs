use std::path::Path;

use ruuter_core::openapi::{project_routes, Info};
use ruuter_core::{load_dir, validate_pipeline};

use crate::exit_codes;
use crate::output::{print_error, print_result};
use crate::OutputArgs;

/// Projects the declarations under `dir`. Only validated documents contribute.
pub fn openapi_cmd(dir: &Path, title: &str, api_version: &str, output: OutputArgs) -> i32 {
    let loaded = match load_dir(dir) {
        Ok(l) => l,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let mut invalid = Vec::new();
    let mut routes = Vec::new();
    for pipeline in &loaded {
        let doc = &pipeline.parsed.document;
        match (validate_pipeline(doc), doc.declaration.as_ref()) {
            (Ok(()), Some(decl)) => routes.push((decl, pipeline.route_path.as_str())),
            _ => invalid.push(pipeline.route_path.clone()),
        }
    }
    if !invalid.is_empty() {
        print_error(
            output.format,
            output.quiet,
            &format!("invalid pipelines: {}", invalid.join(", ")),
        );
        return exit_codes::VALIDATION_FAILED;
    }

    let doc = project_routes(Info::new(title, api_version), routes);
    print_result(output.format, output.quiet, &doc);
    exit_codes::SUCCESS
}
