use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use ruuter_exec::executor::{EventSink, NoOpEventSink, StdoutEventSink, TracingEventSink};
use ruuter_exec::retry::RetryConfig;
use ruuter_exec::steps::HttpStepConfig;
use ruuter_exec::EngineConfig;

use crate::output::OutputFormat;

/// Where `run` sends lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EventsTarget {
    None,
    Stdout,
    Log,
}

impl EventsTarget {
    pub fn sink(self) -> Arc<dyn EventSink> {
        match self {
            EventsTarget::None => Arc::new(NoOpEventSink),
            EventsTarget::Stdout => Arc::new(StdoutEventSink),
            EventsTarget::Log => Arc::new(TracingEventSink),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct LogArgs {
    /// Default filter when `RUST_LOG` is unset.
    #[arg(long, env = "RUUTER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long, env = "RUUTER_LOG_JSON")]
    pub log_json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ServerArgs {
    /// Directory holding the pipeline documents.
    #[arg(long, env = "RUUTER_DSL_DIR", default_value = "DSL")]
    pub dsl_dir: PathBuf,
    #[arg(long, env = "RUUTER_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,
    #[arg(long, env = "RUUTER_APP_NAME", default_value = "ruuter")]
    pub app_name: String,
    /// Package version file with RELEASE, BUILDTIME, MAJOR, MINOR and PATCH entries.
    #[arg(long, env = "RUUTER_VERSION_FILE", default_value = "/app/.env")]
    pub version_file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct EngineArgs {
    /// Deadline for one pipeline run, in milliseconds. 0 disables it.
    #[arg(long, env = "RUUTER_REQUEST_TIMEOUT_MS", default_value_t = 60_000)]
    pub request_timeout_ms: u64,
    #[arg(long, env = "RUUTER_MAX_STEPS", default_value_t = 1000)]
    pub max_steps: usize,
}

impl EngineArgs {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_steps: self.max_steps,
            run_timeout: (self.request_timeout_ms > 0)
                .then(|| Duration::from_millis(self.request_timeout_ms)),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct HttpArgs {
    /// Timeout of a single outbound call made by an `http.*` step, in milliseconds.
    #[arg(long, env = "RUUTER_HTTP_TIMEOUT_MS", default_value_t = 30_000)]
    pub http_timeout_ms: u64,
    #[arg(long, env = "RUUTER_HTTP_MAX_RESPONSE_BYTES", default_value_t = 10_485_760)]
    pub max_response_bytes: usize,
    /// Attempts per outbound call, including the first.
    #[arg(long, env = "RUUTER_RETRY_ATTEMPTS", default_value_t = 3)]
    pub retry_attempts: usize,
    /// Also retry POST and PATCH calls.
    #[arg(long, env = "RUUTER_RETRY_NON_IDEMPOTENT")]
    pub retry_non_idempotent: bool,
}

impl HttpArgs {
    pub fn step_config(&self) -> HttpStepConfig {
        HttpStepConfig {
            timeout: Duration::from_millis(self.http_timeout_ms),
            max_response_bytes: self.max_response_bytes,
            retry: RetryConfig {
                retry_non_idempotent: self.retry_non_idempotent,
                ..RetryConfig::default().with_max_attempts(self.retry_attempts)
            },
        }
    }
}
