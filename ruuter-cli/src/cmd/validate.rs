use std::path::Path;

use ruuter_core::{load_dir, load_file, validate_pipeline, LoadedPipeline};
use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::OutputArgs;

#[derive(Serialize)]
struct FileResult {
    route: String,
    file: String,
    valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

#[derive(Serialize)]
struct ValidateResult {
    valid: bool,
    files: Vec<FileResult>,
}

pub fn validate_cmd(path: &Path, output: OutputArgs) -> i32 {
    let loaded = if path.is_dir() {
        load_dir(path)
    } else {
        let root = path.parent().unwrap_or(Path::new(""));
        load_file(root, path).map(|p| vec![p])
    };
    let loaded = match loaded {
        Ok(l) => l,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let files: Vec<FileResult> = loaded.iter().map(check).collect();
    let result = ValidateResult {
        valid: files.iter().all(|f| f.valid),
        files,
    };

    if output.format == OutputFormat::Text && !output.quiet {
        for f in &result.files {
            if f.valid {
                println!("ok: {} ({})", f.route, f.file);
            } else {
                eprintln!("error: {} ({}) failed validation", f.route, f.file);
                for e in &f.errors {
                    eprintln!("- {e}");
                }
            }
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }

    if result.valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::VALIDATION_FAILED
    }
}

fn check(loaded: &LoadedPipeline) -> FileResult {
    let errors = match validate_pipeline(&loaded.parsed.document) {
        Ok(()) => Vec::new(),
        Err(err) => err.violations.iter().map(ToString::to_string).collect(),
    };
    FileResult {
        route: loaded.route_path.clone(),
        file: loaded.file.display().to_string(),
        valid: errors.is_empty(),
        errors,
    }
}
