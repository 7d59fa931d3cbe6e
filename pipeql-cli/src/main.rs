mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, OutputFormat, Verbosity};
use pipeql::{compile_with_options, CompileOptions, Pipeline};
use std::env;
use tracing::{event, instrument, Level};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

fn main() -> Result<()> {
    let mut cfg = Cli::parse();
    // command line arguments override configuration file
    if let Some(ref config) = cfg.config_file {
        let file_cfg: Cli = confy::load_path(config)
            .with_context(|| format!("Failed to load configuration file: {config}"))?;
        cfg = Cli::merge(cfg, file_cfg);
    }
    init_logger(cfg.verbosity);
    run_with_config(cfg)
}

/// Logs go to stderr so that stdout only carries the pipeline.
fn init_logger(verbosity: Option<Verbosity>) {
    let env_filter = match verbosity {
        Some(verbosity) => EnvFilter::default().add_directive(LevelFilter::from(verbosity).into()),
        None => EnvFilter::new(env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".into())),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[instrument(skip_all)]
fn run_with_config(cfg: Cli) -> Result<()> {
    event!(Level::DEBUG, "{:?}", cfg);

    let Some(query) = cfg.query else {
        bail!("No query provided");
    };
    let options = match cfg.collection {
        Some(collection) => CompileOptions::new(collection),
        None => CompileOptions::default(),
    };
    let pipeline = compile_with_options(&query, &options)?;
    println!("{}", render(&pipeline, cfg.format.unwrap_or_default())?);
    Ok(())
}

fn render(pipeline: &Pipeline, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Mql => pipeline
            .to_documents()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => pipeline.to_bson().into_relaxed_extjson().to_string(),
        OutputFormat::Pretty => {
            serde_json::to_string_pretty(&pipeline.to_bson().into_relaxed_extjson())?
        }
    })
}
