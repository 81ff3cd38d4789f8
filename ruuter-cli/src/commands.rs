use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve every pipeline in the DSL directory over HTTP.
    Serve {
        #[command(flatten)]
        server: ServerArgs,
        #[command(flatten)]
        engine: EngineArgs,
        #[command(flatten)]
        http: HttpArgs,
        #[command(flatten)]
        log: LogArgs,
    },
    /// Parse and validate a pipeline file, or every pipeline under a directory.
    Validate {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the OpenAPI description of the pipelines under a directory.
    Openapi {
        dir: PathBuf,
        #[arg(long, default_value = "ruuter")]
        title: String,
        #[arg(long = "api-version", default_value = env!("CARGO_PKG_VERSION"))]
        api_version: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Execute one pipeline locally and print its response.
    Run {
        file: PathBuf,
        /// Request body as inline JSON.
        #[arg(long)]
        body: Option<String>,
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
        /// Where to send lifecycle events.
        #[arg(long, value_enum, default_value_t = EventsTarget::None)]
        events: EventsTarget,
        #[command(flatten)]
        engine: EngineArgs,
        #[command(flatten)]
        http: HttpArgs,
        #[command(flatten)]
        log: LogArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}
