use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::{AnyValue, Mapping};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl ContextPath {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Name of the context entry the path starts at.
    pub fn root(&self) -> &str {
        match self.segments.first() {
            Some(PathSegment::Key(k)) => k,
            _ => "",
        }
    }

    pub fn lookup<'a>(&self, root: &'a AnyValue) -> Option<&'a AnyValue> {
        walk(root, &self.segments)
    }

    /// Looks the path up in a set of named variables; the first segment picks the variable.
    pub fn lookup_in<'a>(&self, vars: &'a Mapping) -> Option<&'a AnyValue> {
        let (PathSegment::Key(first), rest) = self.segments.split_first()? else {
            return None;
        };
        walk(vars.get(first)?, rest)
    }
}

fn walk<'a>(mut cur: &'a AnyValue, segments: &[PathSegment]) -> Option<&'a AnyValue> {
    for seg in segments {
        cur = match seg {
            PathSegment::Key(k) => cur.as_object()?.get(k)?,
            PathSegment::Index(i) => cur.as_array()?.get(*i)?,
        };
    }
    Some(cur)
}

impl fmt::Display for ContextPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

pub fn parse_path(input: &str) -> Result<ContextPath, PathError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(PathError::Empty);
    }

    let mut segments = Vec::new();
    for part in raw.split('.') {
        let (name, mut rest) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };
        if name.is_empty() {
            return Err(PathError::EmptySegment(raw.to_string()));
        }
        if !NAME_RE.is_match(name) {
            return Err(PathError::InvalidName(name.to_string()));
        }
        segments.push(PathSegment::Key(name.to_string()));

        while !rest.is_empty() {
            let Some(inner) = rest.strip_prefix('[') else {
                return Err(PathError::InvalidIndex(part.to_string()));
            };
            let Some(close) = inner.find(']') else {
                return Err(PathError::InvalidIndex(part.to_string()));
            };
            let idx = inner[..close]
                .trim()
                .parse::<usize>()
                .map_err(|_| PathError::InvalidIndex(part.to_string()))?;
            segments.push(PathSegment::Index(idx));
            rest = &inner[close + 1..];
        }
    }

    Ok(ContextPath {
        raw: raw.to_string(),
        segments,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("context path must not be empty")]
    Empty,
    #[error("context path `{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("invalid name segment: {0}")]
    InvalidName(String),
    #[error("invalid index in segment: {0}")]
    InvalidIndex(String),
}
