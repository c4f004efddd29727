mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use engine_logging::RunLog;
use log::LevelFilter;
use renderer_engine::{Pipeline, SettingsOverrides, DEFAULT_SETTINGS_FILE};

use crate::logging::LogDestination;

/// Render a plain-text article as an HTML fragment with a chat-completion model
#[derive(Parser, Debug)]
#[command(name = "article-html", version, long_about = None)]
struct Args {
    /// JSON settings document
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    /// Article to read (overrides `input_file`)
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// HTML file to write (overrides `output_file`)
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Model identifier (overrides `openai_model`)
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Also write the log to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(LogDestination::from_option(args.log_file.clone()), level);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let overrides = SettingsOverrides {
        input_file: args.input,
        output_file: args.output,
        model: args.model,
    };
    let pipeline = Pipeline::new(RunLog::new("article-html")).with_overrides(overrides);
    pipeline
        .run_blocking(&args.config)
        .with_context(|| format!("rendering with settings {:?} failed", args.config))?;
    Ok(())
}
