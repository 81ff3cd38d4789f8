use std::path::{Component, Path, PathBuf};

use crate::error::LoadError;
use crate::parser::{parse_pipeline_str, DocumentFormat, ParsedPipeline};

const EXTENSIONS: [&str; 3] = ["yml", "yaml", "json"];

/// A pipeline document read from the DSL directory.
#[derive(Debug, Clone)]
pub struct LoadedPipeline {
    /// Path relative to the DSL root, without extension, `/`-separated.
    pub route_path: String,
    pub file: PathBuf,
    pub parsed: ParsedPipeline,
}

/// Reads every pipeline document under `root`, sorted by file path.
pub fn load_dir(root: &Path) -> Result<Vec<LoadedPipeline>, LoadError> {
    let mut files = Vec::new();
    collect_files(root, &mut files)?;
    files.sort();

    files.iter().map(|f| load_file(root, f)).collect()
}

pub fn load_file(root: &Path, file: &Path) -> Result<LoadedPipeline, LoadError> {
    let route_path = route_path_for(root, file)?;
    let content = std::fs::read_to_string(file).map_err(|source| LoadError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    let format = DocumentFormat::from_extension(file.extension().and_then(|e| e.to_str()));
    let parsed =
        parse_pipeline_str(&content, format, &route_path).map_err(|source| LoadError::Parse {
            path: file.to_path_buf(),
            source,
        })?;

    Ok(LoadedPipeline {
        route_path,
        file: file.to_path_buf(),
        parsed,
    })
}

pub fn route_path_for(root: &Path, file: &Path) -> Result<String, LoadError> {
    let rel = file
        .strip_prefix(root)
        .map_err(|_| LoadError::OutsideRoot {
            path: file.to_path_buf(),
        })?
        .with_extension("");

    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else if has_pipeline_extension(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn has_pipeline_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}
