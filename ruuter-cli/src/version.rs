use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read version file {path}: {source}")]
    VersionFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Build metadata read from the package version file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageVersion {
    pub release: Option<String>,
    pub build_time: Option<String>,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub patch: Option<String>,
}

impl PackageVersion {
    /// Reads `KEY=VALUE` entries from `path`. A missing file yields empty metadata.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no version file; using crate version");
            return Ok(Self::default());
        }
        let entries = dotenvy::from_path_iter(path).map_err(|source| ConfigError::VersionFile {
            path: path.to_path_buf(),
            source,
        })?;

        let mut version = Self::default();
        for entry in entries {
            let (key, value) = entry.map_err(|source| ConfigError::VersionFile {
                path: path.to_path_buf(),
                source,
            })?;
            let slot = match key.as_str() {
                "RELEASE" => &mut version.release,
                "BUILDTIME" => &mut version.build_time,
                "MAJOR" => &mut version.major,
                "MINOR" => &mut version.minor,
                "PATCH" => &mut version.patch,
                _ => continue,
            };
            *slot = Some(value);
        }
        Ok(version)
    }

    /// `v<major>.<minor>.<patch>`; absent parts come from the crate version.
    pub fn version_string(&self) -> String {
        let mut crate_parts = env!("CARGO_PKG_VERSION").split('.');
        let mut part = |value: &Option<String>| {
            let fallback = crate_parts.next().unwrap_or("0");
            value.clone().unwrap_or_else(|| fallback.to_string())
        };
        let major = part(&self.major);
        let minor = part(&self.minor);
        let patch = part(&self.patch);
        format!("v{major}.{minor}.{patch}")
    }
}

/// Body of `GET /healthz`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Heartbeat {
    pub app_name: String,
    pub version: String,
    pub packaging_time: Option<String>,
    pub app_start_time: i64,
    pub server_time: i64,
}

/// The startup-time part of the heartbeat, computed once.
#[derive(Debug, Clone)]
pub struct HeartbeatInfo {
    app_name: String,
    version: String,
    packaging_time: Option<String>,
    started_at: DateTime<Utc>,
}

impl HeartbeatInfo {
    pub fn new(
        app_name: impl Into<String>,
        package: &PackageVersion,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            version: package.version_string(),
            packaging_time: package.build_time.clone(),
            started_at,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn at(&self, now: DateTime<Utc>) -> Heartbeat {
        Heartbeat {
            app_name: self.app_name.clone(),
            version: self.version.clone(),
            packaging_time: self.packaging_time.clone(),
            app_start_time: self.started_at.timestamp_millis(),
            server_time: now.timestamp_millis(),
        }
    }
}
