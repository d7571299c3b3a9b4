//! ecscache: concurrent stress harness for the entity-component object cache.

use std::process::ExitCode;

use ecscache_lib::{app, config, errors};

fn main() -> ExitCode {
    let config = config::StressConfig::parse();

    // Logs go to stderr so `--json` output stays parseable.
    let level = if config.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match app::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(errors::exit_code_for(&err))
        }
    }
}
