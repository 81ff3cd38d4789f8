use clap::Parser;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod logging;
mod output;
mod pipelines;
mod server;
mod version;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "ruuter", version, about = "DSL pipeline orchestration server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Serve {
            server,
            engine,
            http,
            log,
        } => cmd::serve::serve_cmd(server, engine, http, log).await,
        Command::Validate { path, output } => cmd::validate::validate_cmd(&path, output),
        Command::Openapi {
            dir,
            title,
            api_version,
            output,
        } => cmd::openapi::openapi_cmd(&dir, &title, &api_version, output),
        Command::Run {
            file,
            body,
            params,
            events,
            engine,
            http,
            log,
            output,
        } => {
            cmd::run::run_cmd(
                &file,
                body.as_deref(),
                &params,
                events,
                engine,
                http,
                log,
                output,
            )
            .await
        }
    }
}
